//! Snapshot export files

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use application::{SnapshotExport, WeatherController};
use domain::WeatherSnapshot;
use tracing::info;

/// Write the displayed snapshot into `directory`, named for today's date
pub async fn write_export(
    controller: &WeatherController,
    directory: &Path,
) -> anyhow::Result<PathBuf> {
    let today = chrono::Local::now().date_naive();
    let export = controller
        .export(today)
        .ok_or_else(|| anyhow!("No weather data to export"))?;

    tokio::fs::create_dir_all(directory)
        .await
        .with_context(|| format!("Failed to create {}", directory.display()))?;
    let path = directory.join(&export.file_name);
    tokio::fs::write(&path, &export.contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "Snapshot exported");
    Ok(path)
}

/// Read a previously exported snapshot
pub async fn read_export(path: &Path) -> anyhow::Result<WeatherSnapshot> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    SnapshotExport::parse(&contents).with_context(|| format!("Invalid export {}", path.display()))
}

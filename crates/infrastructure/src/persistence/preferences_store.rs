//! JSON file implementation of PreferencesStore
//!
//! The document lives in a single file. Writes go to a sibling temporary
//! file which is then renamed over the original, so a crash mid-write
//! leaves the previous document intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::PreferencesStore;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

/// File name of the stored document
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Preferences stored as `preferences.json` in a directory
#[derive(Debug, Clone)]
pub struct JsonFilePreferencesStore {
    path: PathBuf,
}

impl JsonFilePreferencesStore {
    /// Store inside `directory`; the directory is created on first save
    #[must_use]
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            path: directory.as_ref().join(PREFERENCES_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

fn persistence_error(action: &str, path: &Path, err: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Persistence(format!("Failed to {action} {}: {err}", path.display()))
}

#[async_trait]
impl PreferencesStore for JsonFilePreferencesStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load_raw(&self) -> Result<Option<Value>, ApplicationError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No preferences file");
                return Ok(None);
            },
            Err(e) => return Err(persistence_error("read", &self.path, e)),
        };

        let document = serde_json::from_str(&contents)
            .map_err(|e| persistence_error("parse", &self.path, e))?;
        Ok(Some(document))
    }

    #[instrument(skip(self, document), fields(path = %self.path.display()))]
    async fn save_raw(&self, document: &Value) -> Result<(), ApplicationError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| persistence_error("create", parent, e))?;
        }

        let contents = serde_json::to_string_pretty(document)
            .map_err(|e| persistence_error("encode", &self.path, e))?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, contents)
            .await
            .map_err(|e| persistence_error("write", &temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| persistence_error("replace", &self.path, e))?;

        debug!("Preferences saved");
        Ok(())
    }
}

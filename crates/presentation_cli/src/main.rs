//! Weathervane CLI
//!
//! Current conditions and a five-day forecast for a place name, postal
//! code, coordinates, or your current position.

#![allow(clippy::print_stdout)]

mod app;
mod export;
mod interactive;
mod render;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, init_logging};

use crate::app::App;
use crate::render::{
    render_favorites, render_preferences, render_snapshot, render_state, render_suggestions,
};

/// Weathervane CLI
#[derive(Parser)]
#[command(name = "weathervane")]
#[command(author, version, about = "Weather forecasts in your terminal", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./weathervane.toml if present)
    #[arg(short, long, env = "WEATHERVANE_CONFIG")]
    config: Option<PathBuf>,

    /// Print the snapshot as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Weather for a place name or postal code
    ///
    /// Example: weathervane search "San Francisco"
    /// Example: weathervane search 94103
    Search {
        /// Place name or postal code
        query: String,
    },

    /// Weather for coordinates
    Coords {
        /// Latitude (-90 to 90)
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        /// Longitude (-180 to 180)
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },

    /// Weather at your current position
    Locate {
        /// Keep tracking the position, refreshing every N seconds
        #[arg(long, value_name = "SECONDS")]
        watch: Option<u64>,
    },

    /// List places matching partial input
    Suggest {
        /// Partial place name
        query: String,
    },

    /// Type queries and commands line by line
    Interactive,

    /// Save the snapshot for a place as a JSON file
    ///
    /// The file is named weather-data-<location>-<date>.json.
    Export {
        /// Place name or postal code
        query: String,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Display a previously exported snapshot
    Show {
        /// Exported JSON file
        file: PathBuf,
    },

    /// Manage favorite locations
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },

    /// Show or change display preferences
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites (default)
    List,
    /// Add a location (moves it to the front if already present)
    Add { location: String },
    /// Remove a location
    Remove { location: String },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Show preferences (default)
    Show,
    /// Switch between light and dark
    ToggleTheme,
    /// Switch between °C and °F
    ToggleUnit,
}

fn print_state(app: &App, state: &domain::SessionState, json: bool) -> anyhow::Result<()> {
    match (&state.snapshot, json) {
        (Some(snapshot), true) => println!("{}", snapshot.to_export_json()?),
        _ => print!("{}", render_state(state, app.unit())),
    }
    Ok(())
}

fn warn_if_unsaved(app: &App) {
    if let Some(error) = app.preferences.error() {
        tracing::warn!(error = %error, "Preferences were not saved");
    }
}

/// Run `work` unless `interrupt` completes first
async fn unless_interrupted<T>(
    work: impl Future<Output = T>,
    interrupt: impl Future,
) -> Option<T> {
    tokio::select! {
        output = work => Some(output),
        _ = interrupt => None,
    }
}

async fn watch_position(app: &App, every: Duration, json: bool) -> anyhow::Result<()> {
    let handle = app.geolocation()?.watch(every);
    let mut updates = handle.updates();

    loop {
        let Some(changed) = unless_interrupted(updates.changed(), tokio::signal::ctrl_c()).await
        else {
            break;
        };
        if changed.is_err() {
            break;
        }

        let update = updates.borrow_and_update().clone();
        match update {
            Some(Ok(location)) => {
                let search = app.search_coordinates(location.latitude(), location.longitude());
                match unless_interrupted(search, tokio::signal::ctrl_c()).await {
                    Some(Ok(state)) => print_state(app, &state, json)?,
                    Some(Err(e)) => println!("⚠️  {e}"),
                    None => break,
                }
            },
            Some(Err(e)) => println!("⚠️  {e}"),
            None => {},
        }
        if !handle.is_active() {
            break;
        }
    }

    handle.stop();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config =
        AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    let logging = config.logging.clone().with_verbosity(cli.verbose);
    init_logging(&logging)?;

    let app = App::build(config).await?;

    let command = match cli.command {
        Some(command) => command,
        None => match app.config.default_location.clone() {
            Some(query) => Commands::Search { query },
            None => bail!(
                "No location given. Try `weathervane search <place>` or set default_location"
            ),
        },
    };

    match command {
        Commands::Search { query } => {
            let state = app.search(&query).await?;
            print_state(&app, &state, cli.json)?;
        },

        Commands::Coords {
            latitude,
            longitude,
        } => {
            let state = app.search_coordinates(latitude, longitude).await?;
            print_state(&app, &state, cli.json)?;
        },

        Commands::Locate { watch: None } => {
            let state = app.locate().await?;
            print_state(&app, &state, cli.json)?;
        },

        Commands::Locate {
            watch: Some(seconds),
        } => {
            watch_position(&app, Duration::from_secs(seconds), cli.json).await?;
        },

        Commands::Suggest { query } => {
            let candidates = app.controller.suggestions(&query).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&candidates)?);
            } else {
                print!("{}", render_suggestions(&candidates));
            }
        },

        Commands::Interactive => interactive::run(&app).await?,

        Commands::Export { query, output } => {
            app.search(&query).await?;
            let path = export::write_export(&app.controller, &output).await?;
            println!("💾 Saved {}", path.display());
        },

        Commands::Show { file } => {
            let snapshot = export::read_export(&file).await?;
            if cli.json {
                println!("{}", snapshot.to_export_json()?);
            } else {
                print!("{}", render_snapshot(&snapshot, app.unit()));
            }
        },

        Commands::Favorites { action } => match action.unwrap_or(FavoritesAction::List) {
            FavoritesAction::List => print!("{}", render_favorites(&app.preferences.preferences())),
            FavoritesAction::Add { location } => {
                let prefs = app.preferences.add_favorite(&location).await;
                warn_if_unsaved(&app);
                print!("{}", render_favorites(&prefs));
            },
            FavoritesAction::Remove { location } => {
                if !app.preferences.remove_favorite(&location).await {
                    bail!("{location} is not a favorite");
                }
                warn_if_unsaved(&app);
                print!("{}", render_favorites(&app.preferences.preferences()));
            },
        },

        Commands::Prefs { action } => match action.unwrap_or(PrefsAction::Show) {
            PrefsAction::Show => print!("{}", render_preferences(&app.preferences.preferences())),
            PrefsAction::ToggleTheme => {
                let prefs = app.preferences.toggle_theme().await;
                warn_if_unsaved(&app);
                println!("Theme: {}", prefs.theme);
            },
            PrefsAction::ToggleUnit => {
                let prefs = app.preferences.toggle_temperature_unit().await;
                warn_if_unsaved(&app);
                println!(
                    "Units: {} ({}, {})",
                    prefs.temperature_unit,
                    prefs.temperature_unit.symbol(),
                    prefs.temperature_unit.speed_label()
                );
            },
        },
    }

    Ok(())
}

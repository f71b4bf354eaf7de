//! Line-based interactive session
//!
//! Each line typed is treated like the contents of a search box: it is
//! debounced, so pasting several lines fetches only the last one. Lines
//! starting with `:` are commands.

use std::path::PathBuf;
use std::time::Duration;

use domain::FetchPhase;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::App;
use crate::export::write_export;
use crate::render::{render_favorites, render_preferences, render_state, render_suggestions};

const HELP: &str = "\
Type a place name or postal code to see its weather.
Commands:
  :suggest <text>  list matching places
  :locate          weather at your position
  :unit            toggle °C / °F
  :theme           toggle light / dark
  :fav             add the shown location to favorites
  :unfav <name>    remove a favorite
  :favs            list favorites
  :export [dir]    save the shown snapshot as JSON
  :prefs           show preferences
  :help            this text
  :quit            leave
";

/// Commands understood in interactive mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    Suggest(String),
    Locate,
    ToggleUnit,
    ToggleTheme,
    Favorite,
    Unfavorite(String),
    Favorites,
    Export(Option<PathBuf>),
    Preferences,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Some(Self::Query(line.to_string()));
        };

        let (name, argument) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(name, argument)| (name, argument.trim()));
        let command = match name {
            "suggest" | "s" => Self::Suggest(argument.to_string()),
            "locate" | "l" => Self::Locate,
            "unit" | "u" => Self::ToggleUnit,
            "theme" | "t" => Self::ToggleTheme,
            "fav" => Self::Favorite,
            "unfav" => Self::Unfavorite(argument.to_string()),
            "favs" => Self::Favorites,
            "export" | "e" => {
                Self::Export((!argument.is_empty()).then(|| PathBuf::from(argument)))
            },
            "prefs" => Self::Preferences,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        };
        Some(command)
    }
}

/// Print every finished fetch as it lands
fn spawn_printer(app: &App) -> JoinHandle<()> {
    let mut updates = app.controller.subscribe();
    let preferences = std::sync::Arc::clone(&app.preferences);

    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            let unit = preferences.preferences().temperature_unit;
            match state.phase {
                FetchPhase::Pending if state.retry_count > 0 => {
                    print!("{}", render_state(&state, unit));
                },
                FetchPhase::Succeeded | FetchPhase::Failed => {
                    println!();
                    print!("{}", render_state(&state, unit));
                },
                FetchPhase::Idle | FetchPhase::Pending => {},
            }
        }
        debug!("State printer stopped");
    })
}

async fn handle(app: &App, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Query(text) => {
            app.controller.on_query_change(&text);
        },
        Command::Suggest(text) => {
            print!("{}", render_suggestions(&app.controller.suggestions(&text).await));
        },
        Command::Locate => {
            let location = app.geolocation()?.locate().await?;
            app.controller
                .fetch_by_coordinates(location.latitude(), location.longitude())
                .await;
        },
        Command::ToggleUnit => {
            let prefs = app.preferences.toggle_temperature_unit().await;
            println!("Units: {}", prefs.temperature_unit);
            let state = app.controller.state();
            if state.has_data() {
                print!("{}", render_state(&state, prefs.temperature_unit));
            }
        },
        Command::ToggleTheme => {
            let prefs = app.preferences.toggle_theme().await;
            println!("Theme: {}", prefs.theme);
        },
        Command::Favorite => match app.controller.state().snapshot {
            Some(snapshot) => {
                let prefs = app.preferences.add_favorite(&snapshot.location().name).await;
                print!("{}", render_favorites(&prefs));
            },
            None => println!("Nothing shown yet"),
        },
        Command::Unfavorite(name) => {
            if app.preferences.remove_favorite(&name).await {
                println!("Removed {name}");
            } else {
                println!("{name} is not a favorite");
            }
        },
        Command::Favorites => print!("{}", render_favorites(&app.preferences.preferences())),
        Command::Export(directory) => {
            let directory = directory.unwrap_or_else(|| PathBuf::from("."));
            let path = write_export(&app.controller, &directory).await?;
            println!("Saved {}", path.display());
        },
        Command::Preferences => print!("{}", render_preferences(&app.preferences.preferences())),
        Command::Help => print!("{HELP}"),
        Command::Quit => return Ok(false),
        Command::Unknown(name) => println!("Unknown command :{name} (try :help)"),
    }
    if let Some(error) = app.preferences.error() {
        println!("⚠️  Preferences could not be saved: {error}");
    }
    Ok(true)
}

/// Run until `:quit` or end of input
pub async fn run(app: &App) -> anyhow::Result<()> {
    print!("{HELP}");
    let printer = spawn_printer(app);

    if let Some(location) = &app.config.default_location {
        app.controller.fetch_by_text(location).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            continue;
        };
        match handle(app, command).await {
            Ok(true) => {},
            Ok(false) => break,
            Err(e) => println!("⚠️  {e}"),
        }
    }

    // let a query typed just before end of input finish
    let poll = Duration::from_millis(50);
    while app.controller.has_pending_query() {
        tokio::time::sleep(poll).await;
    }
    tokio::time::sleep(poll).await;
    while app.controller.state().is_loading {
        tokio::time::sleep(poll).await;
    }
    printer.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_query() {
        assert_eq!(
            Command::parse("  New York "),
            Some(Command::Query("New York".to_string()))
        );
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn commands_take_arguments() {
        assert_eq!(
            Command::parse(":suggest San"),
            Some(Command::Suggest("San".to_string()))
        );
        assert_eq!(
            Command::parse(":unfav  New York"),
            Some(Command::Unfavorite("New York".to_string()))
        );
        assert_eq!(Command::parse(":export"), Some(Command::Export(None)));
        assert_eq!(
            Command::parse(":e /tmp"),
            Some(Command::Export(Some(PathBuf::from("/tmp"))))
        );
    }

    #[test]
    fn short_aliases_and_unknowns() {
        assert_eq!(Command::parse(":q"), Some(Command::Quit));
        assert_eq!(Command::parse(":u"), Some(Command::ToggleUnit));
        assert_eq!(
            Command::parse(":frobnicate"),
            Some(Command::Unknown("frobnicate".to_string()))
        );
    }
}

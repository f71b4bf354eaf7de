//! Logging and local storage settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "weathervane=debug,reqwest=warn"
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Raise the level by `verbosity` steps (`-v`, `-vv`, ...)
    ///
    /// Custom directives are left alone.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

        if verbosity == 0 {
            return self;
        }
        if let Some(current) = LEVELS.iter().position(|l| self.level.eq_ignore_ascii_case(l)) {
            let raised = (current + usize::from(verbosity)).min(LEVELS.len() - 1);
            self.level = LEVELS[raised].to_string();
        }
        self
    }
}

/// `[preferences]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Directory holding `preferences.json`
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".weathervane")
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

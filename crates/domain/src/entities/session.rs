//! Session state entity
//!
//! What the presentation layer reads: the location being shown, the latest
//! snapshot, and the progress of the current fetch.

use serde::{Deserialize, Serialize};

use super::snapshot::WeatherSnapshot;

/// Progress of the most recent fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPhase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// Session state of one controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Display string for the location being searched or shown
    pub location: String,
    pub snapshot: Option<WeatherSnapshot>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Number of retries made by the current or last fetch
    pub retry_count: u32,
    pub phase: FetchPhase,
}

impl SessionState {
    /// State for a session starting at the given location
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// Whether anything can be displayed
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Enter the pending phase, keeping whatever snapshot is displayed
    pub fn begin_fetch(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.retry_count = 0;
        self.phase = FetchPhase::Pending;
    }

    /// Replace the displayed snapshot after a successful fetch or cache hit
    pub fn succeed(&mut self, snapshot: WeatherSnapshot) {
        self.snapshot = Some(snapshot);
        self.is_loading = false;
        self.error = None;
        self.phase = FetchPhase::Succeeded;
    }

    /// Record a final failure
    ///
    /// `fallback` replaces the displayed snapshot when given; otherwise the
    /// current snapshot stays. The snapshot is never cleared here.
    pub fn fail(&mut self, message: impl Into<String>, fallback: Option<WeatherSnapshot>) {
        if let Some(snapshot) = fallback {
            self.snapshot = Some(snapshot);
        }
        self.is_loading = false;
        self.error = Some(message.into());
        self.phase = FetchPhase::Failed;
    }
}

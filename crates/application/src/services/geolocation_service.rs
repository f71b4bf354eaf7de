//! Geolocation service
//!
//! Wraps a [`GeolocationPort`] with retry and periodic tracking. Transient
//! failures (no fix, timeout) are retried with exponential backoff; a
//! denied permission or missing capability is final.

use std::sync::Arc;
use std::time::Duration;

use domain::GeoLocation;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{GeolocationPort, PositionOptions};

/// Geolocation tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// Prefer an accurate fix (default: true)
    #[serde(default = "default_true")]
    pub high_accuracy: bool,

    /// Per-request timeout in milliseconds (default: 5000)
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Accept cached positions up to this age in milliseconds (default: 0)
    #[serde(default)]
    pub maximum_age_ms: u64,

    /// Retries after a transient failure (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds (default: 1000)
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Upper bound for any retry delay in milliseconds (default: 10000)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

const fn default_true() -> bool {
    true
}

const fn default_timeout() -> u64 {
    5000
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_delay() -> u64 {
    1000
}

const fn default_max_delay() -> u64 {
    10_000
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: default_true(),
            timeout_ms: default_timeout(),
            maximum_age_ms: 0,
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

impl GeolocationConfig {
    #[must_use]
    pub const fn position_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_millis(self.timeout_ms),
            maximum_age: Duration::from_millis(self.maximum_age_ms),
        }
    }

    /// Backoff before retry number `attempt + 1`: `initial * 2^attempt`, capped
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1_u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let delay = self
            .initial_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms);
        Duration::from_millis(delay)
    }
}

/// One position report from a watch
pub type PositionUpdate = Result<GeoLocation, ApplicationError>;

/// Handle to a running position watch
///
/// Dropping the handle stops the watch.
#[derive(Debug)]
pub struct WatchHandle {
    updates: watch::Receiver<Option<PositionUpdate>>,
    task: JoinHandle<()>,
}

impl WatchHandle {
    /// Receiver for position reports; `None` until the first report
    #[must_use]
    pub fn updates(&self) -> watch::Receiver<Option<PositionUpdate>> {
        self.updates.clone()
    }

    /// Latest report, if any
    #[must_use]
    pub fn latest(&self) -> Option<PositionUpdate> {
        self.updates.borrow().clone()
    }

    /// Whether the watch is still running
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop receiving updates
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Locates the user through a [`GeolocationPort`]
#[derive(Clone)]
pub struct GeolocationService {
    port: Arc<dyn GeolocationPort>,
    config: GeolocationConfig,
}

impl std::fmt::Debug for GeolocationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeolocationService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeolocationService {
    #[must_use]
    pub fn new(port: Arc<dyn GeolocationPort>, config: GeolocationConfig) -> Self {
        Self { port, config }
    }

    #[must_use]
    pub const fn config(&self) -> &GeolocationConfig {
        &self.config
    }

    /// Get the current position once, retrying transient failures
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::PermissionDenied` when access is denied,
    /// otherwise the last geolocation error once retries are exhausted.
    #[instrument(skip(self))]
    pub async fn locate(&self) -> Result<GeoLocation, ApplicationError> {
        let options = self.config.position_options();
        let mut attempt = 0;

        loop {
            match self.port.current_position(options).await {
                Ok(location) => {
                    debug!(%location, attempt = attempt + 1, "Position acquired");
                    return Ok(location);
                },
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    let delay = self.config.delay_for_attempt(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "Position unavailable, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                },
                Err(e) => {
                    warn!(attempt = attempt + 1, error = %e, "Geolocation failed");
                    return Err(e.into());
                },
            }
        }
    }

    /// Report the position every `interval` until the handle is dropped
    ///
    /// The first report is made immediately and intervals below one second
    /// are raised to one second. A permission denial ends the watch after it
    /// has been reported. Must be called from within a Tokio runtime.
    #[must_use]
    pub fn watch(&self, interval: Duration) -> WatchHandle {
        let (sender, updates) = watch::channel(None);
        let service = self.clone();
        let interval = interval.max(Duration::from_secs(1));

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let update = service.locate().await;
                let terminal = matches!(update, Err(ApplicationError::PermissionDenied));
                if sender.send(Some(update)).is_err() {
                    debug!("Position watch has no receivers");
                    break;
                }
                if terminal {
                    info!("Position watch ended by permission denial");
                    break;
                }
            }
        });

        WatchHandle { updates, task }
    }
}

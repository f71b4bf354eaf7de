//! Fetch/cache/retry controller
//!
//! Owns the session state for one view of the weather. Every request goes
//! through the same pipeline:
//!
//! 1. a live cache entry for the request key is shown at once, without
//!    calling the port;
//! 2. otherwise the port is called up to `1 + max_retries` times with a
//!    fixed delay between attempts, and each result must pass the
//!    snapshot validation gate;
//! 3. a valid result is cached and shown; after the last failed attempt
//!    the error is shown next to whatever snapshot was already displayed.
//!
//! Typing is debounced so that only the last query in a burst is fetched.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use domain::{GeoLocation, PlaceCandidate, SessionState, WeatherSnapshot};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::debouncer::Debouncer;
use super::export::SnapshotExport;
use super::snapshot_cache::{SnapshotCache, coordinates_key, text_key};
use crate::error::ApplicationError;
use crate::ports::WeatherFetchPort;

/// Controller tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// How long a fetched snapshot is reused (default: 300)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Retries after the first failed attempt (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed wait between attempts (default: 1000)
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// Quiet period before a typed query is fetched (default: 500)
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Drop results of requests that a later request has superseded
    #[serde(default)]
    pub discard_superseded: bool,
}

const fn default_cache_ttl() -> u64 {
    300
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_retry_delay() -> u64 {
    1000
}

const fn default_debounce() -> u64 {
    500
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay(),
            debounce_ms: default_debounce(),
            discard_superseded: false,
        }
    }
}

impl ControllerConfig {
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    #[must_use]
    pub const fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Total attempts per request
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

#[derive(Debug, Clone)]
enum FetchRequest {
    Query(String),
    Coordinates(GeoLocation),
}

impl FetchRequest {
    /// Coordinate requests take their display name from the snapshot
    const fn renames_location(&self) -> bool {
        matches!(self, Self::Coordinates(_))
    }
}

/// State shared with debounced tasks
struct Inner {
    port: Arc<dyn WeatherFetchPort>,
    cache: SnapshotCache,
    state: RwLock<SessionState>,
    updates: watch::Sender<SessionState>,
    generation: AtomicU64,
    config: ControllerConfig,
}

impl Inner {
    fn update(&self, change: impl FnOnce(&mut SessionState)) {
        let published = {
            let mut state = self.state.write();
            change(&mut state);
            state.clone()
        };
        self.updates.send_replace(published);
    }

    fn show(&self, snapshot: WeatherSnapshot, request: &FetchRequest) {
        let rename = request.renames_location();
        self.update(|state| {
            if rename {
                state.location.clone_from(&snapshot.location().name);
            }
            state.succeed(snapshot);
        });
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.config.discard_superseded && self.generation.load(Ordering::SeqCst) != generation
    }

    async fn fetch_by_text(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.update(|state| query.clone_into(&mut state.location));
        self.run(text_key(query), FetchRequest::Query(query.to_string()))
            .await;
    }

    async fn fetch_by_coordinates(&self, latitude: f64, longitude: f64) {
        match GeoLocation::new(latitude, longitude) {
            Ok(location) => {
                self.run(
                    coordinates_key(latitude, longitude),
                    FetchRequest::Coordinates(location),
                )
                .await;
            },
            Err(e) => {
                warn!(%latitude, %longitude, "Rejected coordinates");
                let message = ApplicationError::InvalidInput(e.to_string()).to_string();
                self.update(|state| state.fail(message, None));
            },
        }
    }

    async fn fetch_once(&self, request: &FetchRequest) -> Result<WeatherSnapshot, ApplicationError> {
        let snapshot = match request {
            FetchRequest::Query(query) => self.port.fetch_by_query(query).await?,
            FetchRequest::Coordinates(location) => {
                self.port.fetch_by_coordinates(*location).await?
            },
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    #[instrument(skip(self, request))]
    async fn run(&self, key: String, request: FetchRequest) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(snapshot) = self.cached(&key) {
            debug!("Cache hit");
            self.show(snapshot, &request);
            return;
        }

        self.update(SessionState::begin_fetch);
        let max_attempts = self.config.max_attempts();
        let mut last_error = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                self.update(|state| state.retry_count = attempt);
                tokio::time::sleep(self.config.retry_delay()).await;
            }
            if self.is_superseded(generation) {
                debug!("Request superseded before attempt");
                return;
            }

            let result = self.fetch_once(&request).await;
            if self.is_superseded(generation) {
                debug!("Discarding superseded result");
                return;
            }

            match result {
                Ok(snapshot) => {
                    info!(
                        attempt = attempt + 1,
                        location = %snapshot.location().name,
                        "Weather fetched"
                    );
                    self.cache.insert(key.clone(), snapshot.clone());
                    self.show(snapshot, &request);
                    return;
                },
                Err(e) => {
                    warn!(
                        attempt = attempt + 1,
                        max_attempts,
                        error = %e,
                        "Weather fetch failed"
                    );
                    last_error = Some(e);
                },
            }
        }

        let message = last_error.map_or_else(
            || "Failed to fetch weather data".to_string(),
            |e| e.to_string(),
        );
        let fallback = self.cached(&key);
        self.update(|state| state.fail(message, fallback));
    }

    /// Live cache entry for `key` that still passes the validation gate
    fn cached(&self, key: &str) -> Option<WeatherSnapshot> {
        let snapshot = self.cache.get(key)?;
        match snapshot.validate() {
            Ok(()) => Some(snapshot),
            Err(e) => {
                warn!(key, error = %e, "Dropping invalid cache entry");
                self.cache.remove(key);
                None
            },
        }
    }
}

/// Fetch/cache/retry controller for one weather view
pub struct WeatherController {
    inner: Arc<Inner>,
    debouncer: Debouncer,
}

impl std::fmt::Debug for WeatherController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherController")
            .field("config", &self.inner.config)
            .field("state", &*self.inner.state.read())
            .finish_non_exhaustive()
    }
}

impl WeatherController {
    #[must_use]
    pub fn new(port: Arc<dyn WeatherFetchPort>, config: ControllerConfig) -> Self {
        let (updates, _) = watch::channel(SessionState::default());
        let debouncer = Debouncer::new(config.debounce_delay());
        Self {
            inner: Arc::new(Inner {
                port,
                cache: SnapshotCache::new(config.cache_ttl()),
                state: RwLock::new(SessionState::default()),
                updates,
                generation: AtomicU64::new(0),
                config,
            }),
            debouncer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// Copy of the current session state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.state.read().clone()
    }

    /// Receiver that sees every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.updates.subscribe()
    }

    #[must_use]
    pub fn cache(&self) -> &SnapshotCache {
        &self.inner.cache
    }

    /// Fetch weather for a place name or postal code
    ///
    /// A blank query does nothing.
    pub async fn fetch_by_text(&self, query: &str) {
        self.inner.fetch_by_text(query).await;
    }

    /// Fetch weather for coordinates
    ///
    /// Out-of-range coordinates are reported in the state without a request.
    pub async fn fetch_by_coordinates(&self, latitude: f64, longitude: f64) {
        self.inner.fetch_by_coordinates(latitude, longitude).await;
    }

    /// Record typed text and fetch it once typing pauses
    ///
    /// Must be called from within a Tokio runtime.
    pub fn on_query_change(&self, text: &str) {
        self.inner.update(|state| text.clone_into(&mut state.location));
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        self.debouncer.schedule(async move {
            inner.fetch_by_text(&text).await;
        });
    }

    /// Whether a typed query is waiting for its debounce delay
    #[must_use]
    pub fn has_pending_query(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Place suggestions for partial input; failures yield none
    pub async fn suggestions(&self, query: &str) -> Vec<PlaceCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        match self.inner.port.suggest(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "Suggestions unavailable");
                Vec::new()
            },
        }
    }

    /// Downloadable copy of the displayed snapshot, if there is one
    #[must_use]
    pub fn export(&self, date: NaiveDate) -> Option<SnapshotExport> {
        let snapshot = self.inner.state.read().snapshot.clone()?;
        match SnapshotExport::from_snapshot(&snapshot, date) {
            Ok(export) => Some(export),
            Err(e) => {
                warn!(error = %e, "Snapshot export failed");
                None
            },
        }
    }
}

//! Preferences service
//!
//! Keeps the user's preferences in memory and writes every change through
//! to a [`PreferencesStore`]. Storage problems never reach the caller: they
//! are logged and exposed through [`PreferencesService::error`] while the
//! in-memory preferences keep working.

use std::sync::Arc;

use domain::{PREFERENCES_VERSION, UserPreferences};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::ports::PreferencesStore;

pub struct PreferencesService {
    store: Arc<dyn PreferencesStore>,
    current: RwLock<UserPreferences>,
    error: RwLock<Option<String>>,
}

impl std::fmt::Debug for PreferencesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferencesService")
            .field("current", &*self.current.read())
            .field("error", &*self.error.read())
            .finish_non_exhaustive()
    }
}

impl PreferencesService {
    /// Service starting from defaults; call [`Self::load`] to read the store
    #[must_use]
    pub fn new(store: Arc<dyn PreferencesStore>) -> Self {
        Self {
            store,
            current: RwLock::new(UserPreferences::default()),
            error: RwLock::new(None),
        }
    }

    /// Read and migrate the stored document
    ///
    /// Documents from older versions are rewritten in the current shape.
    #[instrument(skip(self))]
    pub async fn load(&self) -> UserPreferences {
        let raw = match self.store.load_raw().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Could not read preferences, using defaults");
                self.set_error(Some(e.to_string()));
                return self.replace(UserPreferences::default());
            },
        };

        let Some(document) = raw else {
            debug!("No stored preferences");
            self.set_error(None);
            return self.replace(UserPreferences::default());
        };

        let outcome = UserPreferences::migrate(&document);
        if let Some(reason) = &outcome.error {
            warn!(reason = %reason, "Stored preferences are invalid, using defaults");
        }
        self.set_error(outcome.error.clone());
        let preferences = self.replace(outcome.preferences);

        if outcome.error.is_none() && outcome.source_version < PREFERENCES_VERSION {
            info!(
                from = outcome.source_version,
                to = PREFERENCES_VERSION,
                "Migrated preferences"
            );
            self.persist(&preferences).await;
        }
        preferences
    }

    /// Current preferences
    #[must_use]
    pub fn preferences(&self) -> UserPreferences {
        self.current.read().clone()
    }

    /// Last load or save problem, cleared by the next successful save
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.error.read().clone()
    }

    pub async fn toggle_theme(&self) -> UserPreferences {
        self.mutate(UserPreferences::toggle_theme).await
    }

    pub async fn toggle_temperature_unit(&self) -> UserPreferences {
        self.mutate(UserPreferences::toggle_temperature_unit).await
    }

    pub async fn add_favorite(&self, location: &str) -> UserPreferences {
        self.mutate(|p| p.add_favorite(location)).await
    }

    /// Remove a favorite; returns whether it was present
    pub async fn remove_favorite(&self, location: &str) -> bool {
        let mut removed = false;
        self.mutate(|p| removed = p.remove_favorite(location)).await;
        removed
    }

    fn replace(&self, preferences: UserPreferences) -> UserPreferences {
        *self.current.write() = preferences.clone();
        preferences
    }

    fn set_error(&self, error: Option<String>) {
        *self.error.write() = error;
    }

    async fn mutate(&self, change: impl FnOnce(&mut UserPreferences)) -> UserPreferences {
        let updated = {
            let mut current = self.current.write();
            change(&mut current);
            current.clone()
        };
        self.persist(&updated).await;
        updated
    }

    async fn persist(&self, preferences: &UserPreferences) {
        let document = match serde_json::to_value(preferences) {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "Could not encode preferences");
                self.set_error(Some(e.to_string()));
                return;
            },
        };
        match self.store.save_raw(&document).await {
            Ok(()) => self.set_error(None),
            Err(e) => {
                warn!(error = %e, "Could not save preferences");
                self.set_error(Some(e.to_string()));
            },
        }
    }
}

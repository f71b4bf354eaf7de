//! Composition root
//!
//! Wires configuration into the adapters and services the commands use.

use std::sync::Arc;

use anyhow::{Context, bail};
use application::{GeolocationService, PreferencesService, WeatherController};
use domain::{SessionState, TemperatureUnit};
use infrastructure::{
    AppConfig, JsonFilePreferencesStore, OpenWeatherAdapter, geolocation_from_config,
};
use tracing::{info, warn};

pub struct App {
    pub config: AppConfig,
    pub controller: Arc<WeatherController>,
    pub preferences: Arc<PreferencesService>,
}

impl App {
    /// Build the services and load stored preferences
    pub async fn build(config: AppConfig) -> anyhow::Result<Self> {
        let adapter = OpenWeatherAdapter::new(&config.provider)
            .context("Failed to create weather client")?;
        let controller = WeatherController::new(Arc::new(adapter), config.controller.clone());

        let store = JsonFilePreferencesStore::new(&config.preferences.directory);
        let preferences = PreferencesService::new(Arc::new(store));
        preferences.load().await;
        if let Some(error) = preferences.error() {
            warn!(error = %error, "Using default preferences");
        }

        info!(
            base_url = %config.provider.base_url,
            preferences = %config.preferences.directory.display(),
            "Weathervane ready"
        );

        Ok(Self {
            config,
            controller: Arc::new(controller),
            preferences: Arc::new(preferences),
        })
    }

    /// Geolocation service for the configured source
    pub fn geolocation(&self) -> anyhow::Result<GeolocationService> {
        let port = geolocation_from_config(&self.config.geolocation)?;
        Ok(GeolocationService::new(
            port,
            self.config.geolocation.options.clone(),
        ))
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.preferences.preferences().temperature_unit
    }

    /// Fetch by text and return the resulting state
    ///
    /// Fails only when there is nothing to show.
    pub async fn search(&self, query: &str) -> anyhow::Result<SessionState> {
        if query.trim().is_empty() {
            bail!("Please enter a location");
        }
        self.controller.fetch_by_text(query).await;
        Self::displayable(self.controller.state())
    }

    pub async fn search_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> anyhow::Result<SessionState> {
        self.controller.fetch_by_coordinates(latitude, longitude).await;
        Self::displayable(self.controller.state())
    }

    /// Locate the user once and fetch weather there
    pub async fn locate(&self) -> anyhow::Result<SessionState> {
        let location = self.geolocation()?.locate().await?;
        self.search_coordinates(location.latitude(), location.longitude())
            .await
    }

    fn displayable(state: SessionState) -> anyhow::Result<SessionState> {
        match (&state.snapshot, &state.error) {
            (None, Some(error)) => bail!("{error}"),
            _ => Ok(state),
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("controller", &self.controller)
            .field("preferences", &self.preferences)
            .finish_non_exhaustive()
    }
}

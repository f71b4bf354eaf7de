//! Preferences storage port
//!
//! Stores deal in raw JSON so that migration of old or damaged documents
//! stays in one place.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde_json::Value;

use crate::error::ApplicationError;

/// Port for persisting the preferences document
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    /// Load the stored document, `None` if nothing has been saved yet
    async fn load_raw(&self) -> Result<Option<Value>, ApplicationError>;

    /// Replace the stored document
    async fn save_raw(&self, document: &Value) -> Result<(), ApplicationError>;
}

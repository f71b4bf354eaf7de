//! Application layer - Use cases and orchestration
//!
//! Holds the fetch/cache/retry controller, the geolocation and preferences
//! services, and the ports their adapters implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;

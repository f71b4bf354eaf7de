//! Domain layer for weathervane
//!
//! Contains the weather snapshot model, unit conversion, condition mapping,
//! user preferences and session state. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;

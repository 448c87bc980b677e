//! HealthPal Core - Domain entities, services, and traits.
//!
//! This crate contains the treatment funding ledger's business rules and the
//! care services around it (consultations, medications, alerts, mental-health
//! chat, medical missions). It is database-agnostic and defines traits that
//! are implemented by the `storage-sqlite` crate.

pub mod alerts;
pub mod constants;
pub mod consultations;
pub mod donations;
pub mod errors;
pub mod medications;
pub mod mental_health;
pub mod missions;
pub mod transparency;
pub mod treatments;
pub mod users;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

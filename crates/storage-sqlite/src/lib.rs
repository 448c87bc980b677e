//! SQLite storage implementation for HealthPal.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `healthpal-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor that serializes every write
//! - Repository implementations and their Diesel row types
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!   core (domain)      server (HTTP)
//!         │                 │
//!         └────────┬────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod alerts;
pub mod consultations;
pub mod donations;
pub mod medications;
pub mod mental_health;
pub mod missions;
pub mod treatments;
pub mod users;

#[cfg(test)]
mod testing;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, ping, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from healthpal-core for convenience
pub use healthpal_core::errors::{DatabaseError, Error, Result};

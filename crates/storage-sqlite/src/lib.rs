//! SQLite metadata cache for BaseVault.
//!
//! This crate is the only place in the client where Diesel dependencies
//! exist. It implements the `GoalMetadataStore` trait from `basevault-core`
//! on top of a pooled SQLite database:
//! - Connection pooling and embedded migrations
//! - A single-writer actor serializing all cache writes
//! - The address-keyed JSON record store for goal metadata

pub mod db;
pub mod errors;
pub mod metadata;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, run_migrations, spawn_writer, DbConnection, DbPool, WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from basevault-core for convenience
pub use basevault_core::errors::{DatabaseError, Error, Result};

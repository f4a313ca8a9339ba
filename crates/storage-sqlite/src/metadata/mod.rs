//! SQLite implementation of the goal metadata cache.

mod model;
mod repository;

pub use model::GoalMetadataDB;
pub use repository::MetadataRepository;

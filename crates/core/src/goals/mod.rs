//! Goals module - domain models, metadata cache, and the goal view builder.

mod goals_model;
#[cfg(test)]
mod goals_model_tests;
mod goals_service;
mod goals_traits;
mod memory_store;

pub use goals_model::{Goal, GoalMetadata, NewGoalDraft, Protocol};
pub use goals_service::{merge_goal, GoalService};
pub use goals_traits::{GoalMetadataStore, GoalServiceTrait};
pub use memory_store::MemoryMetadataStore;

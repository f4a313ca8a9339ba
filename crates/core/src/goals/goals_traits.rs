use async_trait::async_trait;

use crate::chain::Address;
use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalMetadata};

/// Trait for the local metadata cache.
///
/// At most one record per address; keys are canonical lower-cased addresses
/// (guaranteed by [`Address`]). Writes are unconditional and optimistic;
/// deletion is the caller's responsibility and happens only after a
/// confirmed withdrawal.
#[async_trait]
pub trait GoalMetadataStore: Send + Sync {
    async fn get(&self, address: &Address) -> Result<Option<GoalMetadata>>;
    async fn put(&self, address: &Address, metadata: &GoalMetadata) -> Result<()>;
    async fn remove(&self, address: &Address) -> Result<()>;
}

/// Trait for goal view operations.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    /// The currently active goal for the address, if any.
    async fn active_goal(&self, address: &Address) -> Result<Option<Goal>>;
}

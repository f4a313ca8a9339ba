//! In-memory metadata store for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::goals_model::GoalMetadata;
use super::goals_traits::GoalMetadataStore;
use crate::chain::Address;
use crate::errors::Result;

#[derive(Default)]
pub struct MemoryMetadataStore {
    entries: RwLock<HashMap<String, GoalMetadata>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

#[async_trait]
impl GoalMetadataStore for MemoryMetadataStore {
    async fn get(&self, address: &Address) -> Result<Option<GoalMetadata>> {
        Ok(self.entries.read().unwrap().get(address.as_str()).cloned())
    }

    async fn put(&self, address: &Address, metadata: &GoalMetadata) -> Result<()> {
        self.entries
            .write()
            .unwrap()
            .insert(address.as_str().to_string(), metadata.clone());
        Ok(())
    }

    async fn remove(&self, address: &Address) -> Result<()> {
        self.entries.write().unwrap().remove(address.as_str());
        Ok(())
    }
}

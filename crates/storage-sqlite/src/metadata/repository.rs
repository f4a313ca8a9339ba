use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;

use basevault_core::chain::Address;
use basevault_core::goals::{GoalMetadata, GoalMetadataStore};
use basevault_core::Result;

use super::model::GoalMetadataDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::goal_metadata;

/// Persisted metadata cache: at most one row per lower-cased address.
///
/// Reads use the pool; writes go through the single-writer actor. Writes
/// are unconditional upserts, matching the optimistic write-then-confirm
/// flow of the orchestrator.
pub struct MetadataRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MetadataRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        MetadataRepository { pool, writer }
    }
}

#[async_trait]
impl GoalMetadataStore for MetadataRepository {
    async fn get(&self, address: &Address) -> Result<Option<GoalMetadata>> {
        let mut conn = get_connection(&self.pool)?;
        let row = goal_metadata::table
            .find(address.as_str())
            .first::<GoalMetadataDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(GoalMetadataDB::into_domain).transpose()
    }

    async fn put(&self, address: &Address, metadata: &GoalMetadata) -> Result<()> {
        let record = GoalMetadataDB::from_domain(address.as_str(), metadata)?;
        debug!("Caching goal metadata for {}", address);
        self.writer
            .exec(move |conn| {
                diesel::replace_into(goal_metadata::table)
                    .values(&record)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn remove(&self, address: &Address) -> Result<()> {
        let key = address.as_str().to_string();
        debug!("Removing cached goal metadata for {}", key);
        self.writer
            .exec(move |conn| {
                diesel::delete(goal_metadata::table.find(key))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}

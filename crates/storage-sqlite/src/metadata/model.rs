//! Database model for cached goal metadata.

use diesel::prelude::*;

use basevault_core::goals::GoalMetadata;
use basevault_core::Result;

use crate::errors::StorageError;

/// One cached record: the lower-cased account address and the serialized
/// JSON payload (`name`, `targetAmount`, `duration`, `protocol`,
/// `createdAt`).
#[derive(Queryable, Insertable, Identifiable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::goal_metadata)]
#[diesel(primary_key(address))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalMetadataDB {
    pub address: String,
    pub payload: String,
}

impl GoalMetadataDB {
    pub fn from_domain(address: &str, metadata: &GoalMetadata) -> Result<Self> {
        let payload = serde_json::to_string(metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        Ok(Self {
            address: address.to_string(),
            payload,
        })
    }

    pub fn into_domain(self) -> Result<GoalMetadata> {
        Ok(serde_json::from_str(&self.payload)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?)
    }
}

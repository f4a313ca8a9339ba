//! Goal domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::SECONDS_PER_DAY;
use crate::errors::{Error, Result, ValidationError};

/// Yield strategy the deposit is routed to.
///
/// Stored and serialized lower-case, matching the persisted record format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Aave,
    Symbiotic,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Aave => "aave",
            Protocol::Symbiotic => "symbiotic",
        }
    }
}

/// User-entered goal descriptors the chain does not retain.
///
/// Persisted as a JSON object keyed by the lower-cased account address.
/// Written optimistically when a create/extend action is initiated and
/// removed only after a withdrawal confirms, so a cache hit with zero
/// on-chain amount is inconclusive, not proof of an active goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalMetadata {
    pub name: String,
    pub target_amount: Decimal,
    /// Lock duration in days.
    #[serde(rename = "duration")]
    pub duration_days: u32,
    pub protocol: Protocol,
    /// Creation instant, epoch milliseconds.
    pub created_at: i64,
}

impl GoalMetadata {
    /// Copy of this record with the lock duration extended.
    pub fn extended(&self, extend_days: u32) -> Self {
        Self {
            duration_days: self.duration_days + extend_days,
            ..self.clone()
        }
    }

    pub fn created_date(&self) -> Result<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at).ok_or_else(|| {
            ValidationError::InvalidInput(format!(
                "cached createdAt {} is not a valid timestamp",
                self.created_at
            ))
            .into()
        })
    }
}

/// Input model for creating a new goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoalDraft {
    pub name: String,
    pub target_amount: Decimal,
    pub initial_deposit: Decimal,
    pub duration_days: u32,
    pub protocol: Protocol,
}

impl NewGoalDraft {
    /// Validates the draft before anything is written or submitted.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if self.target_amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::AmountOutOfRange(
                "target amount must be positive".to_string(),
            )));
        }
        if self.initial_deposit <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::AmountOutOfRange(
                "initial deposit must be positive".to_string(),
            )));
        }
        if self.duration_days == 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "duration must be at least one day".to_string(),
            )));
        }
        Ok(())
    }

    /// Metadata record for the cache, stamped with the given instant.
    pub fn into_metadata(self, created_at_millis: i64) -> GoalMetadata {
        GoalMetadata {
            name: self.name,
            target_amount: self.target_amount,
            duration_days: self.duration_days,
            protocol: self.protocol,
            created_at: created_at_millis,
        }
    }
}

/// The presentable goal entity, merged from on-chain position and cached
/// metadata. Never persisted; computed fresh on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: Decimal,
    /// Authoritative on-chain amount, in display units.
    pub current_amount: Decimal,
    pub target_date: DateTime<Utc>,
    pub created_date: DateTime<Utc>,
    pub is_active: bool,
    pub protocol: Protocol,
}

impl Goal {
    /// Progress toward the target, in percent, capped at 100.
    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ONE_HUNDRED;
        }
        let percent = self.current_amount / self.target_amount * Decimal::ONE_HUNDRED;
        percent.min(Decimal::ONE_HUNDRED)
    }

    /// Whole days until the target date, rounded up, never negative.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> u64 {
        let secs = (self.target_date - now).num_seconds();
        if secs <= 0 {
            return 0;
        }
        (secs as u64).div_ceil(SECONDS_PER_DAY)
    }

    /// Whether the goal's target date has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.target_date
    }
}

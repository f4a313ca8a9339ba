//! Orchestrator state machine types.

use serde::{Deserialize, Serialize};

use crate::goals::GoalMetadata;

/// What a two-phase deposit sequence is doing to the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DepositKind {
    /// First deposit for the address; `draft` was written optimistically
    /// and is discarded if the sequence fails.
    Create { draft: GoalMetadata },

    /// Additional deposit into an existing goal; `prior` is the cache entry
    /// as it was before the optimistic extension, restored on failure.
    Extend { prior: Option<GoalMetadata> },
}

/// Phase of the in-flight transaction sequence for one session.
///
/// `Idle → AwaitingApproval → ApprovalConfirmed → AwaitingDeposit → Idle`,
/// with an error edge from any non-idle state back to `Idle` on failure.
/// A withdrawal occupies the machine too so that only one sequence is ever
/// in flight per account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PendingTransactionState {
    Idle,
    AwaitingApproval {
        amount_units: u128,
        kind: DepositKind,
    },
    ApprovalConfirmed {
        amount_units: u128,
        kind: DepositKind,
    },
    AwaitingDeposit {
        amount_units: u128,
        kind: DepositKind,
    },
    AwaitingWithdrawal,
}

impl PendingTransactionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, PendingTransactionState::Idle)
    }

    /// Short phase name for logs and the in-flight rejection error.
    pub fn describe(&self) -> &'static str {
        match self {
            PendingTransactionState::Idle => "idle",
            PendingTransactionState::AwaitingApproval { .. } => "awaiting approval",
            PendingTransactionState::ApprovalConfirmed { .. } => "approval confirmed",
            PendingTransactionState::AwaitingDeposit { .. } => "awaiting deposit",
            PendingTransactionState::AwaitingWithdrawal => "awaiting withdrawal",
        }
    }
}

impl Default for PendingTransactionState {
    fn default() -> Self {
        PendingTransactionState::Idle
    }
}

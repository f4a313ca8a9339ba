//! Transaction orchestration - approval/deposit sequencing and withdrawal.

mod orchestrator_model;
mod orchestrator_service;
mod session;

pub use orchestrator_model::{DepositKind, PendingTransactionState};
pub use orchestrator_service::TransactionOrchestrator;
pub use session::VaultSession;

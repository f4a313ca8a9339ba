//! Chain gateway module - models, typed calls, traits, and snapshot service.

mod chain_calls;
mod chain_model;
mod chain_traits;
mod snapshot_service;

pub use chain_calls::WriteCall;
pub use chain_model::{Address, TxHash, TxReceipt, TxStatus, UserPosition, VaultSnapshot};
pub use chain_traits::{ChainReadGateway, WalletGateway};
pub use snapshot_service::SnapshotService;

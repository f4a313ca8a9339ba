//! Gateway traits implemented by the transport crate.

use async_trait::async_trait;

use super::chain_calls::WriteCall;
use super::chain_model::{Address, TxHash, TxReceipt, UserPosition};
use crate::errors::Result;

/// Read-only queries against the token and vault contracts.
///
/// Every read reflects current chain state at call time; callers re-read
/// after a transaction confirms rather than patching cached values.
#[async_trait]
pub trait ChainReadGateway: Send + Sync {
    /// Chain id the gateway is connected to.
    async fn chain_id(&self) -> Result<u64>;

    /// The vault's per-account position record.
    async fn position(&self, address: &Address) -> Result<UserPosition>;

    /// Stablecoin balance of the account, in micro-units.
    async fn token_balance(&self, address: &Address) -> Result<u128>;

    /// Stablecoin allowance granted by `owner` to the vault, in micro-units.
    async fn allowance(&self, owner: &Address) -> Result<u128>;

    /// Contract-wide minimum staking duration, in seconds.
    async fn min_staking_time(&self) -> Result<u64>;
}

/// Transaction submission through the connected wallet.
#[async_trait]
pub trait WalletGateway: Send + Sync {
    /// Signs and broadcasts the call, returning its hash.
    async fn submit(&self, call: WriteCall) -> Result<TxHash>;

    /// Waits until the transaction is mined and returns its receipt.
    async fn wait_for_receipt(&self, tx_hash: &TxHash) -> Result<TxReceipt>;
}

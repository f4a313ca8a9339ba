//! Shared test doubles for the gateway traits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::chain::{
    Address, ChainReadGateway, TxHash, TxReceipt, TxStatus, UserPosition, WalletGateway,
    WriteCall,
};
use crate::errors::{ChainError, Result};

/// Chain-read stub with settable values.
pub(crate) struct StubChainGateway {
    chain_id: u64,
    position: Mutex<UserPosition>,
    balance: Mutex<u128>,
    allowance: Mutex<u128>,
    min_staking_secs: Mutex<u64>,
}

impl StubChainGateway {
    pub(crate) fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            position: Mutex::new(UserPosition::default()),
            balance: Mutex::new(0),
            allowance: Mutex::new(0),
            min_staking_secs: Mutex::new(60),
        }
    }

    pub(crate) fn set_position(&self, position: UserPosition) {
        *self.position.lock().unwrap() = position;
    }

    pub(crate) fn set_balance(&self, balance: u128) {
        *self.balance.lock().unwrap() = balance;
    }

    pub(crate) fn set_allowance(&self, allowance: u128) {
        *self.allowance.lock().unwrap() = allowance;
    }
}

#[async_trait]
impl ChainReadGateway for StubChainGateway {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }

    async fn position(&self, _address: &Address) -> Result<UserPosition> {
        Ok(*self.position.lock().unwrap())
    }

    async fn token_balance(&self, _address: &Address) -> Result<u128> {
        Ok(*self.balance.lock().unwrap())
    }

    async fn allowance(&self, _owner: &Address) -> Result<u128> {
        Ok(*self.allowance.lock().unwrap())
    }

    async fn min_staking_time(&self) -> Result<u64> {
        Ok(*self.min_staking_secs.lock().unwrap())
    }
}

type ReceiptHook = Box<dyn Fn(&str) + Send + Sync>;

/// Wallet double recording the exact submission/confirmation order.
///
/// The trace contains `submit:<call>` and `confirm:<call>` entries; tests
/// assert orderings on it. Individual calls can be made to fail at
/// submission, revert at confirmation, or block until released.
#[derive(Default)]
pub(crate) struct MockWallet {
    calls: Mutex<Vec<WriteCall>>,
    trace: Mutex<Vec<String>>,
    pending: Mutex<HashMap<String, &'static str>>,
    fail_submit_of: Mutex<Option<&'static str>>,
    revert_receipt_of: Mutex<Option<&'static str>>,
    gate: Mutex<Option<Arc<tokio::sync::Notify>>>,
    receipt_hook: Mutex<Option<ReceiptHook>>,
    next_hash: AtomicU64,
}

impl MockWallet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Submitted calls, in submission order.
    pub(crate) fn calls(&self) -> Vec<WriteCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Interleaved submit/confirm trace.
    pub(crate) fn trace(&self) -> Vec<String> {
        self.trace.lock().unwrap().clone()
    }

    /// Makes `submit` fail for the named call.
    pub(crate) fn fail_submit_of(&self, call_name: &'static str) {
        *self.fail_submit_of.lock().unwrap() = Some(call_name);
    }

    /// Makes the named call's receipt come back reverted.
    pub(crate) fn revert_receipt_of(&self, call_name: &'static str) {
        *self.revert_receipt_of.lock().unwrap() = Some(call_name);
    }

    /// Blocks every receipt wait until the returned handle is notified.
    pub(crate) fn gate_receipts(&self) -> Arc<tokio::sync::Notify> {
        let gate = Arc::new(tokio::sync::Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Runs the hook (with the call name) just before a receipt is
    /// returned, i.e. while the transaction is still unconfirmed.
    pub(crate) fn on_receipt<F: Fn(&str) + Send + Sync + 'static>(&self, hook: F) {
        *self.receipt_hook.lock().unwrap() = Some(Box::new(hook));
    }
}

#[async_trait]
impl WalletGateway for MockWallet {
    async fn submit(&self, call: WriteCall) -> Result<TxHash> {
        let name = call.name();
        if *self.fail_submit_of.lock().unwrap() == Some(name) {
            self.trace.lock().unwrap().push(format!("reject:{name}"));
            return Err(ChainError::SubmissionRejected(format!(
                "user rejected {name}"
            ))
            .into());
        }

        self.trace.lock().unwrap().push(format!("submit:{name}"));
        self.calls.lock().unwrap().push(call);

        let hash = format!("0xtx{}", self.next_hash.fetch_add(1, Ordering::SeqCst));
        self.pending.lock().unwrap().insert(hash.clone(), name);
        Ok(TxHash(hash))
    }

    async fn wait_for_receipt(&self, tx_hash: &TxHash) -> Result<TxReceipt> {
        let name = self
            .pending
            .lock()
            .unwrap()
            .get(&tx_hash.0)
            .copied()
            .unwrap_or("unknown");

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(hook) = self.receipt_hook.lock().unwrap().as_ref() {
            hook(name);
        }

        self.trace.lock().unwrap().push(format!("confirm:{name}"));

        let status = if *self.revert_receipt_of.lock().unwrap() == Some(name) {
            TxStatus::Reverted
        } else {
            TxStatus::Success
        };
        Ok(TxReceipt {
            tx_hash: tx_hash.clone(),
            status,
        })
    }
}

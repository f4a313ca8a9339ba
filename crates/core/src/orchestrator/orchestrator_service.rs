//! The transaction orchestrator - two-phase deposit sequencing, withdrawal,
//! and the cache writes/deletes they drive.

use std::sync::{Arc, Mutex};

use log::{debug, error};
use rust_decimal::Decimal;

use super::orchestrator_model::{DepositKind, PendingTransactionState};
use crate::chain::{
    Address, ChainReadGateway, TxHash, TxReceipt, TxStatus, WalletGateway, WriteCall,
};
use crate::constants::SECONDS_PER_DAY;
use crate::errors::{ChainError, Error, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink};
use crate::goals::{Goal, GoalMetadataStore, NewGoalDraft};
use crate::money;
use crate::utils::Clock;

/// Sequences the dependent on-chain operations for one account.
///
/// Constructed per active account with the expected chain id; holds the
/// session's [`PendingTransactionState`] and must be dropped (and rebuilt)
/// when the account or chain changes.
///
/// The vault requires a prior spend authorization at least equal to the
/// deposit amount, so the deposit is only ever submitted after the approval
/// receipt confirms - the two are never parallelized. Every deposit requests
/// a fresh exact-amount approval, even when the standing allowance would
/// already cover it.
pub struct TransactionOrchestrator {
    address: Address,
    vault: Address,
    expected_chain_id: u64,
    chain: Arc<dyn ChainReadGateway>,
    wallet: Arc<dyn WalletGateway>,
    cache: Arc<dyn GoalMetadataStore>,
    events: Arc<dyn DomainEventSink>,
    clock: Arc<dyn Clock>,
    state: Mutex<PendingTransactionState>,
}

impl TransactionOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        address: Address,
        vault: Address,
        expected_chain_id: u64,
        chain: Arc<dyn ChainReadGateway>,
        wallet: Arc<dyn WalletGateway>,
        cache: Arc<dyn GoalMetadataStore>,
        events: Arc<dyn DomainEventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            address,
            vault,
            expected_chain_id,
            chain,
            wallet,
            cache,
            events,
            clock,
            state: Mutex::new(PendingTransactionState::Idle),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Current phase of the in-flight sequence, for display.
    pub fn pending_state(&self) -> PendingTransactionState {
        self.state.lock().unwrap().clone()
    }

    /// Creates a goal: optimistic cache write, then approve, then deposit.
    ///
    /// Fails up front with a validation error (no submission, no cache
    /// write) when the draft is incomplete or the deposit exceeds the token
    /// balance. Returns the deposit transaction hash on success.
    pub async fn create_goal(&self, draft: NewGoalDraft) -> Result<TxHash> {
        self.ensure_expected_chain().await?;
        draft.validate()?;

        let amount_units = money::to_micro_units(draft.initial_deposit)?;
        self.ensure_balance_covers(amount_units).await?;

        let duration_days = draft.duration_days;
        let metadata = draft.into_metadata(self.clock.unix_millis());
        let kind = DepositKind::Create {
            draft: metadata.clone(),
        };

        self.begin(PendingTransactionState::AwaitingApproval {
            amount_units,
            kind: kind.clone(),
        })?;

        // Optimistic write so the UI can show provisional progress before
        // anything confirms. Discarded again if the sequence fails.
        if let Err(err) = self.cache.put(&self.address, &metadata).await {
            self.finish();
            return Err(err);
        }
        self.events
            .emit(DomainEvent::cache_updated(self.address.clone()));

        debug!(
            "Creating goal '{}' for {}: deposit {} micro-units over {} days",
            metadata.name, self.address, amount_units, duration_days
        );

        self.run_guarded_sequence(amount_units, duration_days, kind)
            .await
    }

    /// Additional deposit into the active goal, optionally extending the
    /// cached lock duration. Same two-phase sequence as goal creation.
    pub async fn deposit_more(
        &self,
        goal: &Goal,
        amount: Decimal,
        extend_days: Option<u32>,
    ) -> Result<TxHash> {
        self.ensure_expected_chain().await?;

        let amount_units = money::to_micro_units(amount)?;
        if amount_units == 0 {
            return Err(ValidationError::AmountOutOfRange(
                "deposit amount must be positive".to_string(),
            )
            .into());
        }
        self.ensure_balance_covers(amount_units).await?;

        let extend_days = extend_days.unwrap_or(0);
        let prior = self.cache.get(&self.address).await?;

        let base_duration_days = match &prior {
            Some(meta) => meta.duration_days,
            // Cache lost (other client, cleared storage): derive the window
            // from the goal view instead.
            None => (goal.target_date - goal.created_date).num_days().max(0) as u32,
        };
        let duration_days = base_duration_days + extend_days;

        // The cached duration is only touched for a real extension.
        let writes_cache = extend_days > 0 && prior.is_some();
        let kind = DepositKind::Extend {
            prior: if writes_cache { prior.clone() } else { None },
        };

        self.begin(PendingTransactionState::AwaitingApproval {
            amount_units,
            kind: kind.clone(),
        })?;

        if let (true, Some(meta)) = (writes_cache, &prior) {
            let extended = meta.extended(extend_days);
            if let Err(err) = self.cache.put(&self.address, &extended).await {
                self.finish();
                return Err(err);
            }
            self.events
                .emit(DomainEvent::cache_updated(self.address.clone()));
        }

        debug!(
            "Depositing {} micro-units into goal of {} (extend {} days)",
            amount_units, self.address, extend_days
        );

        self.run_guarded_sequence(amount_units, duration_days, kind)
            .await
    }

    /// Submits a redemption. The cache entry is deleted strictly after the
    /// receipt confirms, never optimistically.
    pub async fn withdraw(&self) -> Result<TxHash> {
        self.ensure_expected_chain().await?;
        self.begin(PendingTransactionState::AwaitingWithdrawal)?;

        let result = self.run_withdrawal().await;
        if let Err(err) = &result {
            error!("Withdrawal failed for {}: {}", self.address, err);
        }
        self.finish();
        result
    }

    /// Routes part of the position into the Symbiotic strategy contract.
    ///
    /// A plain pass-through submission: no goal lifecycle, no cache
    /// interaction.
    pub async fn invest_in_symbiotic(
        &self,
        amount: Decimal,
        target: Address,
        payload: Vec<u8>,
    ) -> Result<TxHash> {
        self.ensure_expected_chain().await?;

        let call = WriteCall::InvestInSymbiotic {
            amount: money::to_micro_units(amount)?,
            target,
            payload,
        };
        call.validate()?;

        let tx_hash = self.wallet.submit(call).await?;
        let receipt = self.wallet.wait_for_receipt(&tx_hash).await?;
        Self::ensure_success(receipt)?;
        Ok(tx_hash)
    }

    // === Sequence internals ===

    /// Runs the approve-then-deposit sequence, rolling back the optimistic
    /// cache write and returning to idle on any failure.
    async fn run_guarded_sequence(
        &self,
        amount_units: u128,
        duration_days: u32,
        kind: DepositKind,
    ) -> Result<TxHash> {
        match self
            .run_deposit_sequence(amount_units, duration_days, &kind)
            .await
        {
            Ok(tx_hash) => {
                self.finish();
                Ok(tx_hash)
            }
            Err(err) => {
                error!("Deposit sequence failed for {}: {}", self.address, err);
                self.rollback_cache(&kind).await;
                self.finish();
                Err(err)
            }
        }
    }

    async fn run_deposit_sequence(
        &self,
        amount_units: u128,
        duration_days: u32,
        kind: &DepositKind,
    ) -> Result<TxHash> {
        // Phase 1: exact-amount spend authorization.
        let approve = WriteCall::Approve {
            spender: self.vault.clone(),
            amount: amount_units,
        };
        approve.validate()?;
        let approval_hash = self.wallet.submit(approve).await?;
        let receipt = self.wallet.wait_for_receipt(&approval_hash).await?;
        Self::ensure_success(receipt)?;
        debug!("Approval {} confirmed for {}", approval_hash, self.address);

        self.set_state(PendingTransactionState::ApprovalConfirmed {
            amount_units,
            kind: kind.clone(),
        });
        self.events
            .emit(DomainEvent::allowance_updated(self.address.clone()));

        // Phase 2: the deposit. The lock window is derived from the clock
        // here, at submission time, so a slow approval confirmation does not
        // silently shrink it.
        let target_timestamp =
            self.clock.unix_secs() + u64::from(duration_days) * SECONDS_PER_DAY;
        let deposit = WriteCall::Deposit {
            assets: amount_units,
            receiver: self.address.clone(),
            target_timestamp,
        };
        deposit.validate()?;

        self.set_state(PendingTransactionState::AwaitingDeposit {
            amount_units,
            kind: kind.clone(),
        });
        let deposit_hash = self.wallet.submit(deposit).await?;
        let receipt = self.wallet.wait_for_receipt(&deposit_hash).await?;
        Self::ensure_success(receipt)?;
        debug!("Deposit {} confirmed for {}", deposit_hash, self.address);

        self.events.emit(DomainEvent::deposit_confirmed(
            self.address.clone(),
            deposit_hash.clone(),
        ));
        Ok(deposit_hash)
    }

    async fn run_withdrawal(&self) -> Result<TxHash> {
        let call = WriteCall::Redeem {
            receiver: self.address.clone(),
            owner: self.address.clone(),
        };
        let tx_hash = self.wallet.submit(call).await?;
        let receipt = self.wallet.wait_for_receipt(&tx_hash).await?;
        Self::ensure_success(receipt)?;
        debug!("Withdrawal {} confirmed for {}", tx_hash, self.address);

        // Only now is the metadata gone for good.
        self.cache.remove(&self.address).await?;
        self.events
            .emit(DomainEvent::cache_updated(self.address.clone()));
        self.events.emit(DomainEvent::withdrawal_confirmed(
            self.address.clone(),
            tx_hash.clone(),
        ));
        Ok(tx_hash)
    }

    /// Undoes the optimistic cache write of a failed sequence.
    async fn rollback_cache(&self, kind: &DepositKind) {
        let result = match kind {
            DepositKind::Create { .. } => self.cache.remove(&self.address).await,
            DepositKind::Extend { prior: Some(meta) } => {
                self.cache.put(&self.address, meta).await
            }
            DepositKind::Extend { prior: None } => return,
        };

        match result {
            Ok(()) => self
                .events
                .emit(DomainEvent::cache_updated(self.address.clone())),
            Err(err) => error!(
                "Failed to roll back cached metadata for {}: {}",
                self.address, err
            ),
        }
    }

    // === Preconditions ===

    async fn ensure_expected_chain(&self) -> Result<()> {
        let actual = self.chain.chain_id().await?;
        if actual != self.expected_chain_id {
            return Err(Error::ChainMismatch {
                expected: self.expected_chain_id,
                actual,
            });
        }
        Ok(())
    }

    async fn ensure_balance_covers(&self, amount_units: u128) -> Result<()> {
        let balance = self.chain.token_balance(&self.address).await?;
        if balance < amount_units {
            return Err(ValidationError::InsufficientBalance {
                required: money::from_micro_units(amount_units)?,
                available: money::from_micro_units(balance)?,
            }
            .into());
        }
        Ok(())
    }

    fn ensure_success(receipt: TxReceipt) -> Result<()> {
        match receipt.status {
            TxStatus::Success => Ok(()),
            TxStatus::Reverted => Err(ChainError::Reverted {
                tx_hash: receipt.tx_hash.0,
            }
            .into()),
        }
    }

    // === State machine ===

    /// Claims the machine for a new sequence; rejects re-entrant actions
    /// while another sequence is in flight.
    fn begin(&self, next: PendingTransactionState) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.is_idle() {
            return Err(Error::OperationInFlight(state.describe().to_string()));
        }
        *state = next;
        Ok(())
    }

    fn set_state(&self, next: PendingTransactionState) {
        *self.state.lock().unwrap() = next;
    }

    fn finish(&self) {
        self.set_state(PendingTransactionState::Idle);
    }
}

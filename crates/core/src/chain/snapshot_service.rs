//! Refreshable cache of chain reads.

use std::sync::{Arc, RwLock};

use log::debug;

use super::chain_model::{Address, VaultSnapshot};
use super::chain_traits::ChainReadGateway;
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};
use crate::utils::Clock;

/// Holds the latest [`VaultSnapshot`] and re-reads it on demand.
///
/// A refresh is forced after every confirmed transaction; consumers rebuild
/// their views from the stored snapshot instead of issuing their own reads.
/// Emits `PositionUpdated` / `AllowanceUpdated` when the respective values
/// actually changed.
pub struct SnapshotService {
    gateway: Arc<dyn ChainReadGateway>,
    events: Arc<dyn DomainEventSink>,
    clock: Arc<dyn Clock>,
    latest: RwLock<Option<VaultSnapshot>>,
}

impl SnapshotService {
    pub fn new(
        gateway: Arc<dyn ChainReadGateway>,
        events: Arc<dyn DomainEventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            events,
            clock,
            latest: RwLock::new(None),
        }
    }

    /// Re-reads all chain state for `address` and stores the result.
    pub async fn refresh(&self, address: &Address) -> Result<VaultSnapshot> {
        let (position, token_balance, allowance, min_staking_secs) = tokio::try_join!(
            self.gateway.position(address),
            self.gateway.token_balance(address),
            self.gateway.allowance(address),
            self.gateway.min_staking_time(),
        )?;

        let snapshot = VaultSnapshot {
            position,
            token_balance,
            allowance,
            min_staking_secs,
            fetched_at: self.clock.now(),
        };

        debug!(
            "Refreshed snapshot for {}: amount={}, balance={}, allowance={}",
            address, position.amount, token_balance, allowance
        );

        let previous = {
            let mut latest = self.latest.write().unwrap();
            latest.replace(snapshot.clone())
        };

        let position_changed = previous
            .as_ref()
            .map(|prev| prev.position != snapshot.position)
            .unwrap_or(true);
        let allowance_changed = previous
            .as_ref()
            .map(|prev| prev.allowance != snapshot.allowance)
            .unwrap_or(true);

        if position_changed {
            self.events
                .emit(DomainEvent::position_updated(address.clone()));
        }
        if allowance_changed {
            self.events
                .emit(DomainEvent::allowance_updated(address.clone()));
        }

        Ok(snapshot)
    }

    /// Last snapshot stored by [`refresh`](Self::refresh), if any.
    pub fn latest(&self) -> Option<VaultSnapshot> {
        self.latest.read().unwrap().clone()
    }
}

//! Goal view building - reconciling on-chain state with cached metadata.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};

use super::goals_model::{Goal, GoalMetadata};
use super::goals_traits::{GoalMetadataStore, GoalServiceTrait};
use crate::chain::{Address, ChainReadGateway};
use crate::constants::{FALLBACK_DURATION_DAYS, FALLBACK_GOAL_NAME, FALLBACK_TARGET_MULTIPLIER};
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};
use crate::money;
use crate::utils::Clock;

/// Merges an on-chain amount with cached metadata into a presentable goal.
///
/// The on-chain amount is authoritative for currency values; the cache only
/// contributes descriptive fields. With no cache entry, a fallback goal is
/// synthesized so the view stays usable; it is never written back.
pub fn merge_goal(
    address: &Address,
    amount_units: u128,
    metadata: Option<&GoalMetadata>,
    now: DateTime<Utc>,
) -> Result<Option<Goal>> {
    if amount_units == 0 {
        return Ok(None);
    }

    let current_amount = money::from_micro_units(amount_units)?;

    let goal = match metadata {
        Some(meta) => {
            let created_date = meta.created_date()?;
            Goal {
                id: address.as_str().to_string(),
                name: meta.name.clone(),
                target_amount: meta.target_amount,
                current_amount,
                target_date: created_date + Duration::days(i64::from(meta.duration_days)),
                created_date,
                is_active: true,
                protocol: meta.protocol,
            }
        }
        None => Goal {
            id: address.as_str().to_string(),
            name: FALLBACK_GOAL_NAME.to_string(),
            target_amount: current_amount * FALLBACK_TARGET_MULTIPLIER,
            current_amount,
            target_date: now + Duration::days(i64::from(FALLBACK_DURATION_DAYS)),
            created_date: now,
            is_active: true,
            protocol: Default::default(),
        },
    };

    Ok(Some(goal))
}

/// Service producing the goal view for an address.
pub struct GoalService {
    gateway: Arc<dyn ChainReadGateway>,
    cache: Arc<dyn GoalMetadataStore>,
    events: Arc<dyn DomainEventSink>,
    clock: Arc<dyn Clock>,
}

impl GoalService {
    pub fn new(
        gateway: Arc<dyn ChainReadGateway>,
        cache: Arc<dyn GoalMetadataStore>,
        events: Arc<dyn DomainEventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            cache,
            events,
            clock,
        }
    }
}

#[async_trait::async_trait]
impl GoalServiceTrait for GoalService {
    /// Rebuilds the goal view from current chain and cache state.
    ///
    /// A cache entry with zero on-chain amount is stale (the deposit never
    /// confirmed, or the funds were withdrawn from another client) and is
    /// cleared here rather than rendered.
    async fn active_goal(&self, address: &Address) -> Result<Option<Goal>> {
        let position = self.gateway.position(address).await?;
        let metadata = self.cache.get(address).await?;

        if position.amount == 0 {
            if metadata.is_some() {
                warn!("Clearing stale goal metadata for {address}");
                self.cache.remove(address).await?;
                self.events.emit(DomainEvent::cache_updated(address.clone()));
            }
            return Ok(None);
        }

        if metadata.is_none() {
            debug!("No cached metadata for {address}, synthesizing fallback goal");
        }

        merge_goal(address, position.amount, metadata.as_ref(), self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::UserPosition;
    use crate::events::MockDomainEventSink;
    use crate::goals::{MemoryMetadataStore, Protocol};
    use crate::testing::StubChainGateway;
    use crate::utils::SystemClock;
    use rust_decimal_macros::dec;

    fn addr() -> Address {
        Address::parse("0x3333333333333333333333333333333333333333").unwrap()
    }

    fn metadata() -> GoalMetadata {
        GoalMetadata {
            name: "Bike Vault".to_string(),
            target_amount: dec!(150),
            duration_days: 30,
            protocol: Protocol::Symbiotic,
            created_at: 1_700_000_000_000,
        }
    }

    fn service(
        gateway: Arc<StubChainGateway>,
        cache: Arc<MemoryMetadataStore>,
        sink: Arc<MockDomainEventSink>,
    ) -> GoalService {
        GoalService::new(gateway, cache, sink, Arc::new(SystemClock))
    }

    #[test]
    fn test_merge_prefers_cached_descriptors() {
        let meta = metadata();
        let goal = merge_goal(&addr(), 50_000_000, Some(&meta), Utc::now())
            .unwrap()
            .unwrap();

        assert_eq!(goal.name, "Bike Vault");
        assert_eq!(goal.target_amount, dec!(150));
        // Current amount always comes from the chain, not the cache.
        assert_eq!(goal.current_amount, dec!(50));
        assert_eq!(goal.protocol, Protocol::Symbiotic);
        assert_eq!(goal.created_date, meta.created_date().unwrap());
        assert_eq!(
            goal.target_date,
            meta.created_date().unwrap() + Duration::days(30)
        );
        assert!(goal.is_active);
    }

    #[test]
    fn test_merge_fallback_is_deterministic() {
        let now = Utc::now();
        let goal = merge_goal(&addr(), 100_000_000, None, now).unwrap().unwrap();

        assert_eq!(goal.name, FALLBACK_GOAL_NAME);
        assert_eq!(goal.current_amount, dec!(100));
        assert_eq!(goal.target_amount, dec!(200));
        assert_eq!(goal.protocol, Protocol::Aave);
        assert_eq!(goal.target_date, now + Duration::days(60));
    }

    #[test]
    fn test_merge_zero_amount_yields_no_goal() {
        let meta = metadata();
        assert!(merge_goal(&addr(), 0, Some(&meta), Utc::now())
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_active_goal_clears_stale_cache_entry() {
        let gateway = Arc::new(StubChainGateway::new(11155111));
        let cache = Arc::new(MemoryMetadataStore::new());
        let sink = Arc::new(MockDomainEventSink::new());
        cache.put(&addr(), &metadata()).await.unwrap();

        let service = service(gateway, cache.clone(), sink.clone());
        let goal = service.active_goal(&addr()).await.unwrap();

        assert!(goal.is_none());
        assert!(cache.get(&addr()).await.unwrap().is_none());
        assert!(matches!(
            sink.events().as_slice(),
            [DomainEvent::CacheUpdated { .. }]
        ));
    }

    #[tokio::test]
    async fn test_active_goal_does_not_write_fallback_back() {
        let gateway = Arc::new(StubChainGateway::new(11155111));
        gateway.set_position(UserPosition {
            amount: 100_000_000,
            ..Default::default()
        });
        let cache = Arc::new(MemoryMetadataStore::new());
        let sink = Arc::new(MockDomainEventSink::new());

        let service = service(gateway, cache.clone(), sink);
        let goal = service.active_goal(&addr()).await.unwrap().unwrap();

        assert_eq!(goal.target_amount, dec!(200));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_active_goal_uses_cached_metadata() {
        let gateway = Arc::new(StubChainGateway::new(11155111));
        gateway.set_position(UserPosition {
            amount: 75_000_000,
            ..Default::default()
        });
        let cache = Arc::new(MemoryMetadataStore::new());
        cache.put(&addr(), &metadata()).await.unwrap();
        let sink = Arc::new(MockDomainEventSink::new());

        let service = service(gateway, cache.clone(), sink.clone());
        let goal = service.active_goal(&addr()).await.unwrap().unwrap();

        assert_eq!(goal.name, "Bike Vault");
        assert_eq!(goal.current_amount, dec!(75));
        // Healthy cache entry stays put, no events fire.
        assert!(cache.get(&addr()).await.unwrap().is_some());
        assert!(sink.is_empty());
    }
}

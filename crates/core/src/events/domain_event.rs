//! Domain event types.

use serde::{Deserialize, Serialize};

use crate::chain::{Address, TxHash};

/// Domain events emitted after successful state changes.
///
/// Observers recompute deterministically from current values when one of
/// these fires (re-read the position, rebuild the goal view, restart the
/// countdown); events carry identities, not deltas.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// The on-chain position for the address changed.
    PositionUpdated { address: Address },

    /// The token allowance granted to the vault changed.
    AllowanceUpdated { address: Address },

    /// The cached goal metadata for the address was written or removed.
    CacheUpdated { address: Address },

    /// A deposit transaction confirmed on-chain.
    DepositConfirmed { address: Address, tx_hash: TxHash },

    /// A withdrawal transaction confirmed on-chain.
    WithdrawalConfirmed { address: Address, tx_hash: TxHash },
}

impl DomainEvent {
    pub fn position_updated(address: Address) -> Self {
        Self::PositionUpdated { address }
    }

    pub fn allowance_updated(address: Address) -> Self {
        Self::AllowanceUpdated { address }
    }

    pub fn cache_updated(address: Address) -> Self {
        Self::CacheUpdated { address }
    }

    pub fn deposit_confirmed(address: Address, tx_hash: TxHash) -> Self {
        Self::DepositConfirmed { address, tx_hash }
    }

    pub fn withdrawal_confirmed(address: Address, tx_hash: TxHash) -> Self {
        Self::WithdrawalConfirmed { address, tx_hash }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_event_serialization() {
        let address = Address::parse("0x1234567890abcdef1234567890abcdef12345678").unwrap();
        let event = DomainEvent::cache_updated(address.clone());

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("cache_updated"));

        let deserialized: DomainEvent = serde_json::from_str(&json).unwrap();
        match deserialized {
            DomainEvent::CacheUpdated { address: a } => assert_eq!(a, address),
            _ => panic!("Expected CacheUpdated"),
        }
    }

    #[test]
    fn test_confirmation_event_carries_tx_hash() {
        let address = Address::parse("0x1234567890abcdef1234567890abcdef12345678").unwrap();
        let event =
            DomainEvent::withdrawal_confirmed(address, TxHash("0xdeadbeef".to_string()));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: DomainEvent = serde_json::from_str(&json).unwrap();
        match deserialized {
            DomainEvent::WithdrawalConfirmed { tx_hash, .. } => {
                assert_eq!(tx_hash.0, "0xdeadbeef");
            }
            _ => panic!("Expected WithdrawalConfirmed"),
        }
    }
}

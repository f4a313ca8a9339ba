//! Enumerated write operations against the token and vault contracts.
//!
//! Each variant carries explicit typed arguments and is validated before
//! submission; the transport crate maps variants to fixed ABI signatures.

use super::chain_model::Address;
use crate::errors::{Result, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    /// `approve(spender, amount)` on the stablecoin token.
    Approve { spender: Address, amount: u128 },

    /// `deposit(assets, receiver, targetTimestamp)` on the vault.
    Deposit {
        assets: u128,
        receiver: Address,
        target_timestamp: u64,
    },

    /// `redeem(receiver, owner)` on the vault.
    Redeem { receiver: Address, owner: Address },

    /// `investInSymbiotic(amount, target, payload)` on the vault.
    ///
    /// The strategy contract itself is not modeled; the payload is passed
    /// through opaque.
    InvestInSymbiotic {
        amount: u128,
        target: Address,
        payload: Vec<u8>,
    },
}

impl WriteCall {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            WriteCall::Approve { .. } => "approve",
            WriteCall::Deposit { .. } => "deposit",
            WriteCall::Redeem { .. } => "redeem",
            WriteCall::InvestInSymbiotic { .. } => "investInSymbiotic",
        }
    }

    /// Validates arguments before submission.
    pub fn validate(&self) -> Result<()> {
        match self {
            WriteCall::Approve { amount, .. } if *amount == 0 => Err(
                ValidationError::AmountOutOfRange("approval amount must be nonzero".to_string())
                    .into(),
            ),
            WriteCall::Deposit {
                assets,
                target_timestamp,
                ..
            } => {
                if *assets == 0 {
                    return Err(ValidationError::AmountOutOfRange(
                        "deposit amount must be nonzero".to_string(),
                    )
                    .into());
                }
                if *target_timestamp == 0 {
                    return Err(ValidationError::InvalidInput(
                        "deposit target timestamp must be set".to_string(),
                    )
                    .into());
                }
                Ok(())
            }
            WriteCall::InvestInSymbiotic { amount, .. } if *amount == 0 => Err(
                ValidationError::AmountOutOfRange("invest amount must be nonzero".to_string())
                    .into(),
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> Address {
        Address::parse("0x1111111111111111111111111111111111111111").unwrap()
    }

    #[test]
    fn test_validate_rejects_zero_amounts() {
        assert!(WriteCall::Approve {
            spender: addr(),
            amount: 0
        }
        .validate()
        .is_err());

        assert!(WriteCall::Deposit {
            assets: 0,
            receiver: addr(),
            target_timestamp: 1_700_000_000
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_validate_accepts_well_formed_calls() {
        assert!(WriteCall::Approve {
            spender: addr(),
            amount: 50_000_000
        }
        .validate()
        .is_ok());

        assert!(WriteCall::Redeem {
            receiver: addr(),
            owner: addr()
        }
        .validate()
        .is_ok());
    }
}

//! Conversions between display amounts and on-chain micro-units.
//!
//! All monetary arguments on the wire are unsigned integers scaled by 10^6.
//! Display and cached amounts use `Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::constants::{MICRO_UNITS_PER_TOKEN, TOKEN_DECIMALS};
use crate::errors::{Result, ValidationError};

/// Converts a display amount to on-chain micro-units.
///
/// Rejects negative amounts and amounts with more than six fractional
/// digits; the contract has no representation for either.
pub fn to_micro_units(amount: Decimal) -> Result<u128> {
    if amount.is_sign_negative() {
        return Err(ValidationError::AmountOutOfRange(format!(
            "amount must not be negative, got {amount}"
        ))
        .into());
    }

    let scaled = amount
        .checked_mul(Decimal::from(MICRO_UNITS_PER_TOKEN as u64))
        .ok_or_else(|| {
            ValidationError::AmountOutOfRange(format!("amount {amount} is too large"))
        })?;

    if scaled.normalize().scale() != 0 {
        return Err(ValidationError::AmountOutOfRange(format!(
            "amount {amount} has more than {TOKEN_DECIMALS} fractional digits"
        ))
        .into());
    }

    scaled.to_u128().ok_or_else(|| {
        ValidationError::AmountOutOfRange(format!("amount {amount} is too large")).into()
    })
}

/// Converts on-chain micro-units to a display amount.
pub fn from_micro_units(units: u128) -> Result<Decimal> {
    let raw = i128::try_from(units).map_err(|_| {
        ValidationError::AmountOutOfRange(format!("on-chain amount {units} overflows"))
    })?;
    Ok(Decimal::from_i128_with_scale(raw, TOKEN_DECIMALS).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_micro_units_whole_amount() {
        assert_eq!(to_micro_units(dec!(50)).unwrap(), 50_000_000);
    }

    #[test]
    fn test_to_micro_units_fractional_amount() {
        assert_eq!(to_micro_units(dec!(0.5)).unwrap(), 500_000);
        assert_eq!(to_micro_units(dec!(1.000001)).unwrap(), 1_000_001);
    }

    #[test]
    fn test_to_micro_units_rejects_negative() {
        assert!(to_micro_units(dec!(-1)).is_err());
    }

    #[test]
    fn test_to_micro_units_rejects_excess_precision() {
        assert!(to_micro_units(dec!(1.0000001)).is_err());
    }

    #[test]
    fn test_from_micro_units() {
        assert_eq!(from_micro_units(100_000_000).unwrap(), dec!(100));
        assert_eq!(from_micro_units(1_500_000).unwrap(), dec!(1.5));
        assert_eq!(from_micro_units(0).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_round_trip() {
        let amount = dec!(123.456789);
        assert_eq!(
            from_micro_units(to_micro_units(amount).unwrap()).unwrap(),
            amount
        );
    }
}

//! Shared constants for the BaseVault client engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Number of fractional decimal digits in on-chain token amounts (USDC).
pub const TOKEN_DECIMALS: u32 = 6;

/// Scale factor between display units and on-chain micro-units.
pub const MICRO_UNITS_PER_TOKEN: u128 = 1_000_000;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Name used for a goal synthesized from on-chain state when no cached
/// metadata exists for the address.
pub const FALLBACK_GOAL_NAME: &str = "Active Vault Goal";

/// Target amount of a synthesized goal, as a multiple of the current amount.
pub const FALLBACK_TARGET_MULTIPLIER: Decimal = dec!(2);

/// Duration of a synthesized goal, counted from the moment it is built.
pub const FALLBACK_DURATION_DAYS: u32 = 60;

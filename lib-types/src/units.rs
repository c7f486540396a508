//! Fixed-point unit helpers
//!
//! All monetary values are base units with 18 fractional digits.

use crate::primitives::Amount;

/// Fractional digits of every amount on the ledger
pub const DECIMALS: u8 = 18;

/// One whole token in base units (10^18)
pub const ONE_TOKEN: Amount = 1_000_000_000_000_000_000;

/// Convert whole tokens to base units, saturating at `Amount::MAX`
pub const fn tokens(whole: u128) -> Amount {
    whole.saturating_mul(ONE_TOKEN)
}

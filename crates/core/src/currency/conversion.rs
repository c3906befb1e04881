//! Currency conversion and rounding.
//!
//! CRITICAL: Rounding strategy for the ledger:
//! - Round half up (away from zero on the midpoint), never banker's rounding
//! - Always pad to a fixed scale so `110` is stored as `110.0000`
//! - Results must be reproducible bit-for-bit across implementations

use rust_decimal::{Decimal, RoundingStrategy};

use super::money::MONEY_SCALE;
use crate::accounting::AccountingError;

/// Rounds `value` half-up to exactly `decimal_places` fractional digits.
#[must_use]
pub fn quantize(value: Decimal, decimal_places: u32) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimal_places);
    rounded
}

/// Converts an amount with a rate, rounding the product to the money scale.
///
/// # Errors
///
/// Returns `ArithmeticOverflow` if the product does not fit a `Decimal`.
pub fn convert_amount(amount: Decimal, rate: Decimal) -> Result<Decimal, AccountingError> {
    amount
        .checked_mul(rate)
        .map(|product| quantize(product, MONEY_SCALE))
        .ok_or(AccountingError::ArithmeticOverflow)
}

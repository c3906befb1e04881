//! Exchange rate value object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::conversion::quantize;
use crate::accounting::AccountingError;

/// Fractional digits kept on every exchange rate.
pub const RATE_SCALE: u32 = 6;

/// A strictly positive conversion factor: 1 unit of the source currency
/// equals `rate` units of the target currency.
///
/// Entries copy this value at creation, which freezes it: later changes to
/// market rates never reach an existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct ExchangeRate {
    rate: Decimal,
}

impl ExchangeRate {
    /// Creates a rate, quantizing it half-up to 6 places.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if the rate is not positive, or rounds to zero.
    pub fn new(rate: Decimal) -> Result<Self, AccountingError> {
        if rate <= Decimal::ZERO {
            return Err(AccountingError::InvalidAmount { amount: rate });
        }
        let quantized = quantize(rate, RATE_SCALE);
        if quantized.is_zero() {
            return Err(AccountingError::InvalidAmount { amount: rate });
        }
        Ok(Self { rate: quantized })
    }

    /// The rate with exactly 6 fractional digits.
    #[must_use]
    pub const fn rate(&self) -> Decimal {
        self.rate
    }

    /// Returns the rate for the opposite direction (`1 / rate`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` when the inverse rounds to zero at 6 places.
    pub fn inverse(&self) -> Result<Self, AccountingError> {
        Self::new(Decimal::ONE / self.rate)
    }
}

impl TryFrom<Decimal> for ExchangeRate {
    type Error = AccountingError;

    fn try_from(rate: Decimal) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

impl From<ExchangeRate> for Decimal {
    fn from(rate: ExchangeRate) -> Self {
        rate.rate
    }
}

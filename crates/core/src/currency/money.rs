//! Money value object.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` quantized to 4 decimal places.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::code::CurrencyCode;
use super::conversion::quantize;
use crate::accounting::AccountingError;

/// Fractional digits kept on every `Money` amount.
pub const MONEY_SCALE: u32 = 4;

/// A strictly positive monetary amount in one currency.
///
/// There is no zero or negative `Money`: direction is carried by the entry
/// type, never by the sign of the amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoneyRepr")]
pub struct Money {
    amount: Decimal,
    currency: CurrencyCode,
}

#[derive(Deserialize)]
struct MoneyRepr {
    amount: Decimal,
    currency: String,
}

impl TryFrom<MoneyRepr> for Money {
    type Error = AccountingError;

    fn try_from(repr: MoneyRepr) -> Result<Self, Self::Error> {
        Self::new(repr.amount, &repr.currency)
    }
}

impl Money {
    /// Creates a new Money instance, quantizing the amount half-up to 4 places.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the amount is not positive, or rounds to zero
    /// - `InvalidCurrencyCode` if the currency is not 3 ASCII letters
    pub fn new(amount: Decimal, currency: &str) -> Result<Self, AccountingError> {
        Self::ensure_positive(amount)?;
        let currency = CurrencyCode::parse(currency)?;
        Self::with_code(amount, currency)
    }

    /// Creates Money from an already-parsed currency code.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if the amount is not positive after rounding.
    pub fn with_code(amount: Decimal, currency: CurrencyCode) -> Result<Self, AccountingError> {
        Self::ensure_positive(amount)?;
        let quantized = quantize(amount, MONEY_SCALE);
        Self::ensure_positive(quantized)?;
        Ok(Self {
            amount: quantized,
            currency,
        })
    }

    fn ensure_positive(amount: Decimal) -> Result<(), AccountingError> {
        if amount <= Decimal::ZERO {
            return Err(AccountingError::InvalidAmount { amount });
        }
        Ok(())
    }

    /// The amount, always > 0 with exactly 4 fractional digits.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency.
    #[must_use]
    pub const fn currency(&self) -> &CurrencyCode {
        &self.currency
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

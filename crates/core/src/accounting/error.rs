//! Accounting error types.
//!
//! Every failure is raised synchronously where an entity is constructed or
//! mutated; there is no partially-constructed state. The core never
//! recovers from these itself.

use chrono::NaiveDate;
use mostratize_shared::AppError;
use mostratize_shared::types::{AccountId, SubBalanceId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::currency::CurrencyCode;

/// Errors that can occur during accounting operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountingError {
    // ========== Value Errors ==========
    /// Amount (or rate) is zero, negative, or rounds to zero.
    #[error("Amount must be greater than zero, got {amount}")]
    InvalidAmount {
        /// The rejected value.
        amount: Decimal,
    },

    /// Currency code is not exactly 3 letters.
    #[error("Invalid currency code (ISO 4217): {0:?}")]
    InvalidCurrencyCode(String),

    /// A computation exceeded the range of `Decimal`.
    #[error("Arithmetic overflow in monetary computation")]
    ArithmeticOverflow,

    // ========== Rule Errors ==========
    /// Entry currency differs from the base currency and no rate was given.
    #[error("Exchange rate not configured for this currency")]
    MissingExchangeRate,

    /// The operation would push the balance below its minimum.
    #[error("Minimum balance {minimum} cannot be violated: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// Balance before the operation.
        balance: Decimal,
        /// Amount the operation tried to withdraw.
        requested: Decimal,
        /// Configured minimum balance.
        minimum: Decimal,
    },

    /// Entry date lies after the current date.
    #[error("Entry date {entry_date} cannot be in the future (today is {today})")]
    FutureDatedEntry {
        /// The requested entry date.
        entry_date: NaiveDate,
        /// The current date according to the clock.
        today: NaiveDate,
    },

    // ========== Account Errors ==========
    /// Account settings are contradictory.
    #[error("Invalid account configuration: {0}")]
    InvalidAccountConfiguration(String),

    /// Account does not allow another sub-balance.
    #[error("Cash account supports only one sub-balance")]
    SubBalanceLimitExceeded,

    /// Account already holds a sub-balance in this currency.
    #[error("Sub-balance with currency {0} already exists for this account")]
    DuplicateCurrency(CurrencyCode),

    /// Account was deactivated and takes no new sub-balances or entries.
    #[error("Account {0} is inactive")]
    InactiveAccount(AccountId),

    // ========== Sub-balance Errors ==========
    /// Entry targets another sub-balance.
    #[error("Entry targets sub-balance {actual}, not {expected}")]
    SubBalanceMismatch {
        /// The sub-balance being updated.
        expected: SubBalanceId,
        /// The sub-balance named by the entry.
        actual: SubBalanceId,
    },

    /// Entry currency differs from the sub-balance currency.
    #[error("Entry currency {actual} does not match sub-balance currency {expected}")]
    CurrencyMismatch {
        /// The sub-balance currency.
        expected: CurrencyCode,
        /// The entry currency.
        actual: CurrencyCode,
    },

    /// Sub-balance was deactivated and takes no further entries.
    #[error("Sub-balance {0} is inactive")]
    InactiveSubBalance(SubBalanceId),

    // ========== Boundary Errors ==========
    /// Entry type string is neither an income nor an expense direction.
    #[error("Unsupported entry type: {0:?}")]
    UnsupportedEntryType(String),

    /// An enumeration string matched no known variant.
    #[error("Unknown {field}: {value:?}")]
    UnknownValue {
        /// Which enumeration was being parsed.
        field: &'static str,
        /// The rejected input.
        value: String,
    },
}

impl AccountingError {
    /// Returns the stable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InvalidCurrencyCode(_) => "INVALID_CURRENCY_CODE",
            Self::ArithmeticOverflow => "ARITHMETIC_OVERFLOW",
            Self::MissingExchangeRate => "MISSING_EXCHANGE_RATE",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::FutureDatedEntry { .. } => "FUTURE_DATED_ENTRY",
            Self::InvalidAccountConfiguration(_) => "INVALID_ACCOUNT_CONFIGURATION",
            Self::SubBalanceLimitExceeded => "SUB_BALANCE_LIMIT_EXCEEDED",
            Self::DuplicateCurrency(_) => "DUPLICATE_CURRENCY",
            Self::InactiveAccount(_) => "INACTIVE_ACCOUNT",
            Self::SubBalanceMismatch { .. } => "SUB_BALANCE_MISMATCH",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::InactiveSubBalance(_) => "INACTIVE_SUB_BALANCE",
            Self::UnsupportedEntryType(_) => "UNSUPPORTED_ENTRY_TYPE",
            Self::UnknownValue { .. } => "UNKNOWN_VALUE",
        }
    }

    /// Returns true if the caller can fix this by supplying more input,
    /// e.g. prompting for the missing exchange rate.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingExchangeRate)
    }

    /// Returns true for violations of a business rule, as opposed to
    /// malformed input.
    #[must_use]
    pub const fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingExchangeRate
                | Self::InsufficientBalance { .. }
                | Self::FutureDatedEntry { .. }
                | Self::SubBalanceLimitExceeded
                | Self::DuplicateCurrency(_)
                | Self::InactiveAccount(_)
                | Self::InactiveSubBalance(_)
        )
    }
}

impl From<AccountingError> for AppError {
    fn from(err: AccountingError) -> Self {
        match err {
            AccountingError::DuplicateCurrency(_) => Self::Conflict(err.to_string()),
            AccountingError::ArithmeticOverflow => Self::Internal(err.to_string()),
            _ if err.is_rule_violation() => Self::BusinessRule(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(AccountingError::MissingExchangeRate.error_code(), "MISSING_EXCHANGE_RATE");
        assert_eq!(
            AccountingError::SubBalanceLimitExceeded.error_code(),
            "SUB_BALANCE_LIMIT_EXCEEDED"
        );
        assert_eq!(
            AccountingError::InvalidAmount { amount: dec!(0) }.error_code(),
            "INVALID_AMOUNT"
        );
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(AccountingError::MissingExchangeRate.is_recoverable());
        assert!(!AccountingError::SubBalanceLimitExceeded.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = AccountingError::InsufficientBalance {
            balance: dec!(100),
            requested: dec!(150),
            minimum: dec!(0),
        };
        assert_eq!(
            err.to_string(),
            "Minimum balance 0 cannot be violated: balance 100, requested 150"
        );

        let err = AccountingError::FutureDatedEntry {
            entry_date: NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(),
            today: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Entry date 2025-01-16 cannot be in the future (today is 2025-01-15)"
        );
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = AccountingError::MissingExchangeRate.into();
        assert_eq!(app.error_code(), "BUSINESS_RULE_VIOLATION");

        let app: AppError = AccountingError::InactiveAccount(AccountId::new()).into();
        assert_eq!(app.status_code(), 422);

        let app: AppError = AccountingError::InvalidCurrencyCode("US".into()).into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");

        let code = crate::currency::CurrencyCode::parse("USD").unwrap();
        let app: AppError = AccountingError::DuplicateCurrency(code).into();
        assert_eq!(app.status_code(), 409);
    }
}

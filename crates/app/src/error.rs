//! Service-layer errors.

use mostratize_core::AccountingError;
use mostratize_core::currency::CurrencyCode;
use mostratize_shared::AppError;
use mostratize_shared::types::{AccountId, EntryId, SubBalanceId};
use thiserror::Error;

/// Errors returned by [`crate::LedgerService`] and the repositories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// A domain rule rejected the operation.
    #[error(transparent)]
    Accounting(#[from] AccountingError),

    /// Account does not exist.
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),

    /// Sub-balance does not exist.
    #[error("Sub-balance {0} not found")]
    SubBalanceNotFound(SubBalanceId),

    /// Entry does not exist.
    #[error("Entry {0} not found")]
    EntryNotFound(EntryId),

    /// A rate was registered from a currency to itself.
    #[error("Exchange rate from {0} to itself is meaningless")]
    SameCurrencyRate(CurrencyCode),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Accounting(inner) => inner.into(),
            ServiceError::AccountNotFound(_)
            | ServiceError::SubBalanceNotFound(_)
            | ServiceError::EntryNotFound(_) => Self::NotFound(err.to_string()),
            ServiceError::SameCurrencyRate(_) => Self::Validation(err.to_string()),
        }
    }
}

//! Standalone rule functions.
//!
//! These are pure predicates independent of entity state. Callers use them
//! for dry-run validation before committing an entry; the entities apply
//! the same rules on their own mutation paths.

use rust_decimal::Decimal;

use super::error::AccountingError;
use crate::currency::ExchangeRate;

/// Requires a rate to be present, returning it.
///
/// Invoke whenever the entry currency differs from the base currency.
///
/// # Errors
///
/// Returns `MissingExchangeRate` if `rate` is `None`.
pub fn ensure_exchange_rate(rate: Option<&ExchangeRate>) -> Result<&ExchangeRate, AccountingError> {
    rate.ok_or(AccountingError::MissingExchangeRate)
}

/// Checks that spending `expense_amount` keeps the balance at or above
/// `minimum_balance`. Passes when no minimum is set.
///
/// # Errors
///
/// Returns `InsufficientBalance` if `current_balance - expense_amount`
/// falls below the minimum.
pub fn ensure_minimum_balance(
    current_balance: Decimal,
    expense_amount: Decimal,
    minimum_balance: Option<Decimal>,
) -> Result<(), AccountingError> {
    let Some(minimum) = minimum_balance else {
        return Ok(());
    };

    let remaining = current_balance
        .checked_sub(expense_amount)
        .ok_or(AccountingError::ArithmeticOverflow)?;
    if remaining < minimum {
        return Err(AccountingError::InsufficientBalance {
            balance: current_balance,
            requested: expense_amount,
            minimum,
        });
    }
    Ok(())
}

//! Accounting ledger core.
//!
//! This module implements the ledger's domain rules:
//! - Accounts and their structural constraints on sub-balances
//! - Currency-scoped sub-balances holding the running balance
//! - Accounting entries with frozen exchange rates
//! - Standalone rule functions for dry-run validation
//! - Closed enumerations and the domain error type
//!
//! Control flow: build `Money` (and an `ExchangeRate` when the entry
//! currency is not the base currency), create an [`AccountingEntry`]
//! against a [`SubBalance`], then apply the entry to that sub-balance.

pub mod account;
pub mod entry;
pub mod error;
pub mod rules;
pub mod sub_balance;
pub mod types;

#[cfg(test)]
mod sub_balance_props;

pub use account::{Account, NewAccount};
pub use entry::{AccountingEntry, NewEntry};
pub use error::AccountingError;
pub use rules::{ensure_exchange_rate, ensure_minimum_balance};
pub use sub_balance::{NewSubBalance, SubBalance};
pub use types::{AccountPurpose, AccountType, AccountingType, EntryStatus, EntryType, MovementType};

/// Keeps at most `max_chars` characters of `text`.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

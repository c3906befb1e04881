//! Persistence and rate-lookup seams of the ledger service.
//!
//! Repositories hand out owned copies; callers mutate a copy and write it
//! back. Sub-balances are the exception: their running balance is only ever
//! changed through [`SubBalanceRepository::update_with`], which holds the
//! record's lock across the read-check-write of `update_balance`.

use std::collections::HashSet;

use chrono::NaiveDate;
use mostratize_core::accounting::{Account, AccountingEntry, AccountingError, SubBalance};
use mostratize_core::currency::{CurrencyCode, ExchangeRate};
use mostratize_shared::types::{AccountId, EntryId, SubBalanceId};

use crate::error::ServiceError;

/// Storage for accounts.
pub trait AccountRepository: Send + Sync {
    /// Stores a new account.
    fn insert(&self, account: Account);

    /// Loads an account.
    fn get(&self, id: AccountId) -> Option<Account>;

    /// Replaces a stored account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account was never inserted.
    fn update(&self, account: Account) -> Result<(), ServiceError>;
}

/// Mutation applied to a stored sub-balance under its lock.
pub type SubBalanceMutation<'a> = dyn FnMut(&mut SubBalance) -> Result<(), AccountingError> + 'a;

/// Builds a new sub-balance from the currencies its account already holds.
pub type SubBalanceFactory<'a> =
    dyn FnMut(&HashSet<CurrencyCode>) -> Result<SubBalance, AccountingError> + 'a;

/// Storage for sub-balances.
pub trait SubBalanceRepository: Send + Sync {
    /// Stores the sub-balance built by `factory`.
    ///
    /// Inserts for the same account are serialized: `factory` sees every
    /// sub-balance stored before it, including ones opened concurrently.
    ///
    /// # Errors
    ///
    /// Returns `Accounting` with whatever `factory` returned; nothing is
    /// stored in that case.
    fn insert_for_account(
        &self,
        account_id: AccountId,
        factory: &mut SubBalanceFactory<'_>,
    ) -> Result<SubBalance, ServiceError>;

    /// Loads a sub-balance.
    fn get(&self, id: SubBalanceId) -> Option<SubBalance>;

    /// Currencies of every sub-balance of an account, deactivated ones
    /// included.
    fn currencies_for(&self, account_id: AccountId) -> HashSet<CurrencyCode>;

    /// Runs `mutation` against the stored sub-balance while holding its lock.
    ///
    /// The mutation works on a draft; the stored record is replaced only if
    /// it succeeds. Returns the updated sub-balance.
    ///
    /// # Errors
    ///
    /// - `SubBalanceNotFound` if the sub-balance does not exist
    /// - `Accounting` with whatever the mutation returned
    fn update_with(
        &self,
        id: SubBalanceId,
        mutation: &mut SubBalanceMutation<'_>,
    ) -> Result<SubBalance, ServiceError>;
}

/// Storage for accounting entries.
pub trait EntryRepository: Send + Sync {
    /// Stores a new entry.
    fn insert(&self, entry: AccountingEntry);

    /// Loads an entry.
    fn get(&self, id: EntryId) -> Option<AccountingEntry>;

    /// Replaces a stored entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry was never inserted.
    fn update(&self, entry: AccountingEntry) -> Result<(), ServiceError>;

    /// Returns true if any entry targets `sub_balance_id`.
    fn has_entries(&self, sub_balance_id: SubBalanceId) -> bool;

    /// Entries of a sub-balance, ordered by entry date then creation time.
    fn list_for(&self, sub_balance_id: SubBalanceId) -> Vec<AccountingEntry>;
}

/// Source of the rate converting one unit of `from` into `to`, effective on
/// a given date.
pub trait ExchangeRateSource: Send + Sync {
    /// Looks up the rate. `None` when no rate is known.
    fn rate(&self, from: &CurrencyCode, to: &CurrencyCode, on: NaiveDate) -> Option<ExchangeRate>;
}

impl<F> ExchangeRateSource for F
where
    F: Fn(&CurrencyCode, &CurrencyCode, NaiveDate) -> Option<ExchangeRate> + Send + Sync,
{
    fn rate(&self, from: &CurrencyCode, to: &CurrencyCode, on: NaiveDate) -> Option<ExchangeRate> {
        self(from, to, on)
    }
}

//! Ledger service.
//!
//! Drives the core's control flow against the repositories: accounts and
//! sub-balances are opened, entries are built with a frozen rate and
//! applied to their sub-balance under the store's per-record lock.

use std::sync::Arc;

use mostratize_core::accounting::{
    Account, AccountingEntry, NewAccount, NewEntry, NewSubBalance, SubBalance,
    ensure_minimum_balance,
};
use mostratize_core::currency::CurrencyCode;
use mostratize_core::{Clock, Entity, IdGenerator, SystemClock, UuidV7Generator};
use mostratize_shared::types::{AccountId, EntryId, SubBalanceId};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use crate::error::ServiceError;
use crate::ports::{AccountRepository, EntryRepository, ExchangeRateSource, SubBalanceRepository};

/// Application service for the ledger.
pub struct LedgerService {
    accounts: Arc<dyn AccountRepository>,
    sub_balances: Arc<dyn SubBalanceRepository>,
    entries: Arc<dyn EntryRepository>,
    rates: Arc<dyn ExchangeRateSource>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    base_currency: CurrencyCode,
}

impl LedgerService {
    /// Creates a service over a store implementing all three repositories,
    /// using the system clock and UUID v7 identifiers.
    pub fn new<S>(
        store: Arc<S>,
        rates: Arc<dyn ExchangeRateSource>,
        base_currency: CurrencyCode,
    ) -> Self
    where
        S: AccountRepository + SubBalanceRepository + EntryRepository + 'static,
    {
        Self {
            accounts: store.clone(),
            sub_balances: store.clone(),
            entries: store,
            rates,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidV7Generator),
            base_currency,
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the identifier generator.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Currency every entry's base amount is expressed in.
    #[must_use]
    pub const fn base_currency(&self) -> &CurrencyCode {
        &self.base_currency
    }

    /// Opens an account.
    #[instrument(
        skip(self, input),
        fields(user_id = %input.user_id, account_type = %input.account_type)
    )]
    pub fn open_account(&self, input: NewAccount) -> Result<Account, ServiceError> {
        let account = Account::create(input, self.clock.as_ref(), self.ids.as_ref())
            .inspect_err(|err| warn!(error = %err, "Account rejected"))?;

        self.accounts.insert(account.clone());
        info!(account_id = %account.id(), "Account opened");
        Ok(account)
    }

    /// Soft-deletes an account.
    #[instrument(skip(self))]
    pub fn deactivate_account(&self, account_id: AccountId) -> Result<Account, ServiceError> {
        let mut account = self.account(account_id)?;
        account.deactivate(self.clock.as_ref());
        self.accounts.update(account.clone())?;

        info!("Account deactivated");
        Ok(account)
    }

    /// Opens a sub-balance under an account, enforcing the account's
    /// single-balance and distinct-currency rules against every sub-balance
    /// it has ever held.
    ///
    /// The check and the insert run under the store's per-account lock.
    #[instrument(skip(self, input), fields(currency = %input.currency))]
    pub fn open_sub_balance(
        &self,
        account_id: AccountId,
        input: NewSubBalance,
    ) -> Result<SubBalance, ServiceError> {
        let account = self.account(account_id)?;
        let currency = CurrencyCode::parse(&input.currency)?;
        let clock = self.clock.as_ref();
        let ids = self.ids.as_ref();

        let sub_balance = self
            .sub_balances
            .insert_for_account(account_id, &mut |existing| {
                account.ensure_active()?;
                account.can_add_sub_balance(&currency, existing)?;
                SubBalance::create(account_id, input.clone(), clock, ids)
            })
            .inspect_err(|err| warn!(error = %err, "Sub-balance rejected"))?;

        info!(
            sub_balance_id = %sub_balance.id(),
            initial_balance = %sub_balance.initial_balance(),
            "Sub-balance opened"
        );
        Ok(sub_balance)
    }

    /// Records an entry and applies it to its sub-balance. The owning
    /// account must still be active.
    ///
    /// A foreign-currency entry without a rate gets one from the rate source
    /// for its entry date. The rate is frozen into the entry. If the
    /// sub-balance rejects the movement, nothing is stored.
    #[instrument(
        skip(self, input),
        fields(
            sub_balance_id = %input.sub_balance_id,
            entry_type = %input.entry_type,
            amount = %input.money,
        )
    )]
    pub fn record_entry(&self, mut input: NewEntry) -> Result<AccountingEntry, ServiceError> {
        let sub_balance_id = input.sub_balance_id;
        let target = self.sub_balance(sub_balance_id)?;
        self.account(target.account_id())?
            .ensure_active()
            .inspect_err(|err| warn!(error = %err, "Entry rejected"))?;

        let currency = input.money.currency().clone();
        if currency != self.base_currency && input.exchange_rate.is_none() {
            input.exchange_rate = self.rates.rate(&currency, &self.base_currency, input.entry_date);
            debug!(found = input.exchange_rate.is_some(), "Looked up exchange rate");
        }

        let entry = AccountingEntry::create(
            input,
            &self.base_currency,
            self.clock.as_ref(),
            self.ids.as_ref(),
        )
        .inspect_err(|err| warn!(error = %err, "Entry rejected"))?;

        let clock = self.clock.as_ref();
        let updated = self
            .sub_balances
            .update_with(sub_balance_id, &mut |sub_balance| sub_balance.apply_entry(&entry, clock))
            .inspect_err(|err| warn!(error = %err, "Entry not applied"))?;

        self.entries.insert(entry.clone());
        info!(
            entry_id = %entry.id(),
            base_amount = %entry.base_amount(),
            balance = %updated.current_balance(),
            "Entry recorded"
        );
        Ok(entry)
    }

    /// Dry-runs an expense against the sub-balance's minimum without
    /// touching it.
    #[instrument(skip(self))]
    pub fn check_expense(
        &self,
        sub_balance_id: SubBalanceId,
        amount: Decimal,
    ) -> Result<(), ServiceError> {
        let sub_balance = self.sub_balance(sub_balance_id)?;
        ensure_minimum_balance(
            sub_balance.current_balance(),
            amount,
            sub_balance.minimum_balance(),
        )?;
        Ok(())
    }

    /// Confirms an entry.
    #[instrument(skip(self))]
    pub fn confirm_entry(&self, entry_id: EntryId) -> Result<AccountingEntry, ServiceError> {
        let mut entry = self
            .entries
            .get(entry_id)
            .ok_or(ServiceError::EntryNotFound(entry_id))?;
        entry.confirm(self.clock.as_ref());
        self.entries.update(entry.clone())?;
        Ok(entry)
    }

    /// Soft-deletes a sub-balance. Its entries stay in place.
    #[instrument(skip(self))]
    pub fn deactivate_sub_balance(
        &self,
        sub_balance_id: SubBalanceId,
    ) -> Result<SubBalance, ServiceError> {
        let has_entries = self.entries.has_entries(sub_balance_id);
        let clock = self.clock.as_ref();

        let sub_balance = self.sub_balances.update_with(sub_balance_id, &mut |sub_balance| {
            sub_balance.deactivate(has_entries, clock);
            Ok(())
        })?;

        info!(has_entries, "Sub-balance deactivated");
        Ok(sub_balance)
    }

    /// Running balance of a sub-balance.
    pub fn balance(&self, sub_balance_id: SubBalanceId) -> Result<Decimal, ServiceError> {
        Ok(self.sub_balance(sub_balance_id)?.current_balance())
    }

    /// Loads an account.
    pub fn account(&self, account_id: AccountId) -> Result<Account, ServiceError> {
        self.accounts
            .get(account_id)
            .ok_or(ServiceError::AccountNotFound(account_id))
    }

    /// Loads a sub-balance.
    pub fn sub_balance(&self, sub_balance_id: SubBalanceId) -> Result<SubBalance, ServiceError> {
        self.sub_balances
            .get(sub_balance_id)
            .ok_or(ServiceError::SubBalanceNotFound(sub_balance_id))
    }

    /// Entries of a sub-balance in date order.
    pub fn entries_for(&self, sub_balance_id: SubBalanceId) -> Vec<AccountingEntry> {
        self.entries.list_for(sub_balance_id)
    }
}

//! In-memory adapters backed by `DashMap`.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use dashmap::DashMap;
use mostratize_core::Entity;
use mostratize_core::accounting::{Account, AccountingEntry, SubBalance};
use mostratize_core::currency::{CurrencyCode, ExchangeRate};
use mostratize_shared::types::{AccountId, EntryId, SubBalanceId};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ServiceError;
use crate::ports::{
    AccountRepository, EntryRepository, ExchangeRateSource, SubBalanceFactory, SubBalanceMutation,
    SubBalanceRepository,
};

/// Thread-safe store for accounts, sub-balances and entries.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    accounts: DashMap<AccountId, Account>,
    sub_balances: DashMap<SubBalanceId, SubBalance>,
    entries: DashMap<EntryId, AccountingEntry>,
    /// One slot per account; its shard lock serializes sub-balance inserts.
    openings: DashMap<AccountId, ()>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountRepository for InMemoryStore {
    fn insert(&self, account: Account) {
        self.accounts.insert(account.id(), account);
    }

    fn get(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id).map(|account| account.value().clone())
    }

    fn update(&self, account: Account) -> Result<(), ServiceError> {
        let mut slot = self
            .accounts
            .get_mut(&account.id())
            .ok_or(ServiceError::AccountNotFound(account.id()))?;
        *slot = account;
        Ok(())
    }
}

impl SubBalanceRepository for InMemoryStore {
    fn insert_for_account(
        &self,
        account_id: AccountId,
        factory: &mut SubBalanceFactory<'_>,
    ) -> Result<SubBalance, ServiceError> {
        // Held until the new sub-balance is visible in `sub_balances`.
        let _opening = self.openings.entry(account_id).or_default();

        let existing = self.currencies_for(account_id);
        let sub_balance = factory(&existing)?;
        self.sub_balances.insert(sub_balance.id(), sub_balance.clone());
        Ok(sub_balance)
    }

    fn get(&self, id: SubBalanceId) -> Option<SubBalance> {
        self.sub_balances
            .get(&id)
            .map(|sub_balance| sub_balance.value().clone())
    }

    fn currencies_for(&self, account_id: AccountId) -> HashSet<CurrencyCode> {
        self.sub_balances
            .iter()
            .filter(|sub_balance| sub_balance.account_id() == account_id)
            .map(|sub_balance| sub_balance.currency().clone())
            .collect()
    }

    fn update_with(
        &self,
        id: SubBalanceId,
        mutation: &mut SubBalanceMutation<'_>,
    ) -> Result<SubBalance, ServiceError> {
        // The shard write lock is held until `slot` drops.
        let mut slot = self
            .sub_balances
            .get_mut(&id)
            .ok_or(ServiceError::SubBalanceNotFound(id))?;

        let mut draft = slot.value().clone();
        mutation(&mut draft)?;
        *slot = draft.clone();
        Ok(draft)
    }
}

impl EntryRepository for InMemoryStore {
    fn insert(&self, entry: AccountingEntry) {
        self.entries.insert(entry.id(), entry);
    }

    fn get(&self, id: EntryId) -> Option<AccountingEntry> {
        self.entries.get(&id).map(|entry| entry.value().clone())
    }

    fn update(&self, entry: AccountingEntry) -> Result<(), ServiceError> {
        let mut slot = self
            .entries
            .get_mut(&entry.id())
            .ok_or(ServiceError::EntryNotFound(entry.id()))?;
        *slot = entry;
        Ok(())
    }

    fn has_entries(&self, sub_balance_id: SubBalanceId) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.sub_balance_id() == sub_balance_id)
    }

    fn list_for(&self, sub_balance_id: SubBalanceId) -> Vec<AccountingEntry> {
        let mut entries: Vec<AccountingEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.sub_balance_id() == sub_balance_id)
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|entry| (entry.entry_date(), entry.meta().created_at(), entry.id()));
        entries
    }
}

/// Rate table keyed by currency pair, each pair holding its history by
/// effective date.
#[derive(Debug, Default)]
pub struct InMemoryRates {
    rates: DashMap<(CurrencyCode, CurrencyCode), BTreeMap<NaiveDate, ExchangeRate>>,
}

impl InMemoryRates {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the rate converting one `from` into `to`, effective from
    /// `effective_date`. Replaces a rate already set for that date.
    ///
    /// # Errors
    ///
    /// Returns `SameCurrencyRate` if `from` equals `to`.
    pub fn set(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
        effective_date: NaiveDate,
        rate: ExchangeRate,
    ) -> Result<(), ServiceError> {
        if from == to {
            return Err(ServiceError::SameCurrencyRate(from));
        }
        self.rates
            .entry((from, to))
            .or_default()
            .insert(effective_date, rate);
        Ok(())
    }

    /// Most recent rate for the exact pair effective on or before `on`.
    fn find_direct(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        on: NaiveDate,
    ) -> Option<ExchangeRate> {
        let history = self.rates.get(&(from.clone(), to.clone()))?;
        history.range(..=on).next_back().map(|(_, rate)| *rate)
    }
}

impl ExchangeRateSource for InMemoryRates {
    fn rate(&self, from: &CurrencyCode, to: &CurrencyCode, on: NaiveDate) -> Option<ExchangeRate> {
        if from == to {
            return ExchangeRate::new(Decimal::ONE).ok();
        }

        if let Some(direct) = self.find_direct(from, to, on) {
            debug!(%from, %to, %on, rate = %direct.rate(), "Direct rate found");
            return Some(direct);
        }

        // USD/EUR = 0.85 gives EUR/USD = 1/0.85
        let inverse = self.find_direct(to, from, on)?.inverse().ok()?;
        debug!(%from, %to, %on, rate = %inverse.rate(), "Inverse rate found");
        Some(inverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mostratize_core::accounting::{AccountingError, EntryType, NewSubBalance};
    use mostratize_core::{FixedClock, UuidV7Generator};
    use rust_decimal_macros::dec;

    fn code(code: &str) -> CurrencyCode {
        CurrencyCode::parse(code).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 20, 8, 0, 0).unwrap())
    }

    fn rate(value: Decimal) -> ExchangeRate {
        ExchangeRate::new(value).unwrap()
    }

    fn stored_sub_balance(
        store: &InMemoryStore,
        account_id: AccountId,
        currency: &str,
    ) -> SubBalance {
        let sub_balance = SubBalance::create(
            account_id,
            NewSubBalance::new(currency).with_initial_balance(dec!(100)),
            &clock(),
            &UuidV7Generator,
        )
        .unwrap();
        store
            .insert_for_account(account_id, &mut |_| Ok(sub_balance.clone()))
            .unwrap()
    }

    #[test]
    fn test_update_with_commits_on_success() {
        let store = InMemoryStore::new();
        let sub_balance = stored_sub_balance(&store, AccountId::new(), "USD");

        let updated = store
            .update_with(sub_balance.id(), &mut |sb| {
                sb.update_balance(EntryType::Income, dec!(25), &clock())
            })
            .unwrap();

        assert_eq!(updated.current_balance(), dec!(125));
        assert_eq!(
            SubBalanceRepository::get(&store, sub_balance.id()).unwrap().current_balance(),
            dec!(125)
        );
    }

    #[test]
    fn test_update_with_discards_draft_on_failure() {
        let store = InMemoryStore::new();
        let sub_balance = stored_sub_balance(&store, AccountId::new(), "USD");

        let result = store.update_with(sub_balance.id(), &mut |sb| {
            sb.update_balance(EntryType::Income, dec!(1), &clock())?;
            Err(AccountingError::ArithmeticOverflow)
        });

        assert_eq!(result, Err(ServiceError::Accounting(AccountingError::ArithmeticOverflow)));
        assert_eq!(
            SubBalanceRepository::get(&store, sub_balance.id()).unwrap().current_balance(),
            dec!(100)
        );
    }

    #[test]
    fn test_update_with_unknown_id() {
        let store = InMemoryStore::new();
        let id = SubBalanceId::new();

        let result = store.update_with(id, &mut |_| Ok(()));

        assert_eq!(result, Err(ServiceError::SubBalanceNotFound(id)));
    }

    #[test]
    fn test_currencies_for_counts_inactive_and_skips_other_accounts() {
        let store = InMemoryStore::new();
        let account_id = AccountId::new();
        stored_sub_balance(&store, account_id, "USD");
        let eur = stored_sub_balance(&store, account_id, "EUR");
        stored_sub_balance(&store, AccountId::new(), "BRL");

        store
            .update_with(eur.id(), &mut |sb| {
                sb.deactivate(false, &clock());
                Ok(())
            })
            .unwrap();

        assert_eq!(
            store.currencies_for(account_id),
            HashSet::from([code("USD"), code("EUR")])
        );
    }

    #[test]
    fn test_insert_for_account_passes_existing_currencies() {
        let store = InMemoryStore::new();
        let account_id = AccountId::new();
        stored_sub_balance(&store, account_id, "USD");
        let mut seen = HashSet::new();

        let result = store.insert_for_account(account_id, &mut |existing| {
            seen.clone_from(existing);
            Err(AccountingError::DuplicateCurrency(code("USD")))
        });

        assert_eq!(
            result,
            Err(ServiceError::Accounting(AccountingError::DuplicateCurrency(code("USD"))))
        );
        assert_eq!(seen, HashSet::from([code("USD")]));
        assert_eq!(store.currencies_for(account_id).len(), 1);
    }

    #[test]
    fn test_direct_rate_uses_latest_effective_on_or_before() {
        let rates = InMemoryRates::new();
        rates.set(code("EUR"), code("USD"), date(1), rate(dec!(1.05))).unwrap();
        rates.set(code("EUR"), code("USD"), date(10), rate(dec!(1.10))).unwrap();

        assert_eq!(rates.rate(&code("EUR"), &code("USD"), date(9)), Some(rate(dec!(1.05))));
        assert_eq!(rates.rate(&code("EUR"), &code("USD"), date(10)), Some(rate(dec!(1.10))));
        assert_eq!(rates.rate(&code("EUR"), &code("USD"), date(31)), Some(rate(dec!(1.10))));
        let before_history = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        assert_eq!(rates.rate(&code("EUR"), &code("USD"), before_history), None);
    }

    #[test]
    fn test_inverse_rate_when_no_direct_pair() {
        let rates = InMemoryRates::new();
        rates.set(code("USD"), code("BRL"), date(1), rate(dec!(5))).unwrap();

        let found = rates.rate(&code("BRL"), &code("USD"), date(2)).unwrap();

        assert_eq!(found.rate(), dec!(0.200000));
    }

    #[test]
    fn test_direct_rate_wins_over_inverse() {
        let rates = InMemoryRates::new();
        rates.set(code("USD"), code("BRL"), date(1), rate(dec!(5))).unwrap();
        rates.set(code("BRL"), code("USD"), date(1), rate(dec!(0.19))).unwrap();

        assert_eq!(rates.rate(&code("BRL"), &code("USD"), date(1)).unwrap().rate(), dec!(0.19));
    }

    #[test]
    fn test_same_currency() {
        let rates = InMemoryRates::new();
        assert_eq!(rates.rate(&code("USD"), &code("USD"), date(1)).unwrap().rate(), Decimal::ONE);
        assert_eq!(
            rates.set(code("USD"), code("USD"), date(1), rate(dec!(1))),
            Err(ServiceError::SameCurrencyRate(code("USD")))
        );
    }

    #[test]
    fn test_closures_are_rate_sources() {
        let fixed = |_: &CurrencyCode, _: &CurrencyCode, _: NaiveDate| Some(rate(dec!(2.5)));
        let source: &dyn ExchangeRateSource = &fixed;

        assert_eq!(source.rate(&code("GBP"), &code("USD"), date(1)).unwrap().rate(), dec!(2.5));
    }
}

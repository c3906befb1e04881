//! Financial account entity.

use std::collections::HashSet;

use mostratize_shared::types::{AccountId, UserId};
use serde::Serialize;

use super::error::AccountingError;
use super::truncate_chars;
use super::types::{AccountPurpose, AccountType, AccountingType};
use crate::clock::{Clock, IdGenerator};
use crate::currency::CurrencyCode;
use crate::entity::{Entity, EntityMeta};

/// Maximum length of an account name, in characters.
pub const ACCOUNT_NAME_MAX_CHARS: usize = 100;

/// Input for opening an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Owner of the account.
    pub user_id: UserId,
    /// Display name; truncated to 100 characters.
    pub name: String,
    /// Nature of the resource.
    pub account_type: AccountType,
    /// Macro accounting classification.
    pub accounting_type: AccountingType,
    /// What the account is used for.
    pub purpose: AccountPurpose,
    /// Default currency code. Required for cash accounts; an empty string
    /// counts as absent.
    pub default_currency: Option<String>,
}

/// A financial account (bank, cash, card, wallet).
///
/// The account owns its sub-balances conceptually, but does not hold them
/// in memory: the caller loads the set of existing sub-balance currencies
/// and asks [`Account::can_add_sub_balance`] before creating a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    #[serde(flatten)]
    meta: EntityMeta<AccountId>,
    user_id: UserId,
    name: String,
    account_type: AccountType,
    accounting_type: AccountingType,
    purpose: AccountPurpose,
    default_currency: Option<CurrencyCode>,
    allows_multiple_balances: bool,
    active: bool,
}

impl Account {
    /// Opens a new, active account.
    ///
    /// # Errors
    ///
    /// - `InvalidAccountConfiguration` if a cash account has no default currency
    /// - `InvalidCurrencyCode` if the default currency is malformed
    pub fn create(
        input: NewAccount,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Self, AccountingError> {
        let default_currency = input.default_currency.filter(|code| !code.is_empty());

        if input.account_type == AccountType::Cash && default_currency.is_none() {
            return Err(AccountingError::InvalidAccountConfiguration(
                "Cash accounts must define a default currency".to_string(),
            ));
        }

        let default_currency = default_currency
            .as_deref()
            .map(CurrencyCode::parse)
            .transpose()?;

        Ok(Self {
            meta: EntityMeta::new(AccountId::from_uuid(ids.next_id()), clock.now()),
            user_id: input.user_id,
            name: truncate_chars(&input.name, ACCOUNT_NAME_MAX_CHARS),
            allows_multiple_balances: input.account_type.allows_multiple_balances(),
            account_type: input.account_type,
            accounting_type: input.accounting_type,
            purpose: input.purpose,
            default_currency,
            active: true,
        })
    }

    /// Decides whether a sub-balance in `currency` may be added, given the
    /// currencies of the sub-balances the account already has.
    ///
    /// Pure decision: the caller owns creating and persisting the sub-balance.
    ///
    /// # Errors
    ///
    /// - `SubBalanceLimitExceeded` if the account allows a single balance and
    ///   already has one
    /// - `DuplicateCurrency` if `currency` is already present
    pub fn can_add_sub_balance(
        &self,
        currency: &CurrencyCode,
        existing_currencies: &HashSet<CurrencyCode>,
    ) -> Result<(), AccountingError> {
        if !self.allows_multiple_balances && !existing_currencies.is_empty() {
            return Err(AccountingError::SubBalanceLimitExceeded);
        }

        if existing_currencies.contains(currency) {
            return Err(AccountingError::DuplicateCurrency(currency.clone()));
        }

        Ok(())
    }

    /// Fails once the account has been deactivated.
    ///
    /// # Errors
    ///
    /// Returns `InactiveAccount` if the account is inactive.
    pub fn ensure_active(&self) -> Result<(), AccountingError> {
        if self.active {
            Ok(())
        } else {
            Err(AccountingError::InactiveAccount(self.id()))
        }
    }

    /// Soft-deletes the account. Idempotent.
    pub fn deactivate(&mut self, clock: &dyn Clock) {
        self.active = false;
        self.meta.mark_deleted(clock.now());
    }

    /// Owner of the account.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nature of the resource.
    #[must_use]
    pub const fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Macro accounting classification.
    #[must_use]
    pub const fn accounting_type(&self) -> AccountingType {
        self.accounting_type
    }

    /// What the account is used for.
    #[must_use]
    pub const fn purpose(&self) -> AccountPurpose {
        self.purpose
    }

    /// Default currency, if any.
    #[must_use]
    pub const fn default_currency(&self) -> Option<&CurrencyCode> {
        self.default_currency.as_ref()
    }

    /// False iff this is a cash account.
    #[must_use]
    pub const fn allows_multiple_balances(&self) -> bool {
        self.allows_multiple_balances
    }

    /// Whether the account is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn meta(&self) -> &EntityMeta<AccountId> {
        &self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, UuidV7Generator};
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap())
    }

    fn input(account_type: AccountType, default_currency: Option<&str>) -> NewAccount {
        NewAccount {
            user_id: UserId::new(),
            name: "Wallet".to_string(),
            account_type,
            accounting_type: AccountingType::Asset,
            purpose: AccountPurpose::Checking,
            default_currency: default_currency.map(str::to_string),
        }
    }

    fn open(account_type: AccountType, default_currency: Option<&str>) -> Account {
        Account::create(input(account_type, default_currency), &clock(), &UuidV7Generator).unwrap()
    }

    fn codes(codes: &[&str]) -> HashSet<CurrencyCode> {
        codes.iter().map(|c| CurrencyCode::parse(c).unwrap()).collect()
    }

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    fn eur() -> CurrencyCode {
        CurrencyCode::parse("EUR").unwrap()
    }

    #[test]
    fn test_create_bank_account() {
        let account = open(AccountType::Bank, None);

        assert!(account.is_active());
        assert!(account.allows_multiple_balances());
        assert_eq!(account.default_currency(), None);
        assert_eq!(account.meta().created_at(), clock().now());
        assert_eq!(account.meta().updated_at(), clock().now());
        assert_eq!(account.meta().deleted_at(), None);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn test_cash_account_requires_default_currency(#[case] default_currency: Option<&str>) {
        let result = Account::create(
            input(AccountType::Cash, default_currency),
            &clock(),
            &UuidV7Generator,
        );
        assert!(matches!(
            result,
            Err(AccountingError::InvalidAccountConfiguration(_))
        ));
    }

    #[test]
    fn test_cash_account_is_single_balance() {
        let account = open(AccountType::Cash, Some("brl"));
        assert!(!account.allows_multiple_balances());
        assert_eq!(account.default_currency().unwrap(), &"BRL");
    }

    #[test]
    fn test_malformed_default_currency() {
        let result =
            Account::create(input(AccountType::Bank, Some("EURO")), &clock(), &UuidV7Generator);
        assert!(matches!(result, Err(AccountingError::InvalidCurrencyCode(_))));
    }

    #[test]
    fn test_name_truncated_to_100_chars() {
        let mut new_account = input(AccountType::Bank, None);
        new_account.name = "ç".repeat(150);
        let account = Account::create(new_account, &clock(), &UuidV7Generator).unwrap();
        assert_eq!(account.name().chars().count(), ACCOUNT_NAME_MAX_CHARS);
    }

    #[test]
    fn test_cash_account_rejects_second_sub_balance() {
        let account = open(AccountType::Cash, Some("USD"));

        assert_eq!(account.can_add_sub_balance(&usd(), &codes(&[])), Ok(()));
        assert_eq!(
            account.can_add_sub_balance(&eur(), &codes(&["USD"])),
            Err(AccountingError::SubBalanceLimitExceeded)
        );
        // The limit is checked before duplicates.
        assert_eq!(
            account.can_add_sub_balance(&usd(), &codes(&["USD"])),
            Err(AccountingError::SubBalanceLimitExceeded)
        );
    }

    #[test]
    fn test_bank_account_rejects_duplicate_currency() {
        let account = open(AccountType::Bank, None);

        assert_eq!(
            account.can_add_sub_balance(&usd(), &codes(&["USD"])),
            Err(AccountingError::DuplicateCurrency(usd()))
        );
        assert_eq!(account.can_add_sub_balance(&eur(), &codes(&["USD"])), Ok(()));
    }

    #[test]
    fn test_deactivate_soft_deletes() {
        let mut account = open(AccountType::DigitalWallet, None);
        let later = clock().advanced(Duration::days(1));

        account.deactivate(&later);

        assert!(!account.is_active());
        assert_eq!(account.meta().deleted_at(), Some(later.now()));
        assert_eq!(account.meta().updated_at(), later.now());
    }

    #[test]
    fn test_ensure_active() {
        let mut account = open(AccountType::Bank, None);
        assert_eq!(account.ensure_active(), Ok(()));

        account.deactivate(&clock());

        assert_eq!(
            account.ensure_active(),
            Err(AccountingError::InactiveAccount(account.id()))
        );
    }
}

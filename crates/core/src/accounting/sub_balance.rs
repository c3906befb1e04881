//! Currency-scoped sub-balance of an account.
//!
//! A sub-balance is the unit money actually moves in and out of. It is a
//! mutable aggregate: `current_balance` is private and changes only through
//! [`SubBalance::update_balance`] (directly or via
//! [`SubBalance::apply_entry`]).
//!
//! `update_balance` is a read-check-write sequence. The host must serialize
//! concurrent updates of the same sub-balance (per-record lock or optimistic
//! versioning); the core offers no atomicity of its own.

use mostratize_shared::types::{AccountId, SubBalanceId};
use rust_decimal::Decimal;
use serde::Serialize;

use super::entry::AccountingEntry;
use super::error::AccountingError;
use super::types::EntryType;
use crate::clock::{Clock, IdGenerator};
use crate::currency::CurrencyCode;
use crate::entity::{Entity, EntityMeta};

/// Input for creating a sub-balance.
#[derive(Debug, Clone)]
pub struct NewSubBalance {
    /// Currency code, exactly 3 letters.
    pub currency: String,
    /// Opening balance (default 0).
    pub initial_balance: Decimal,
    /// Lowest balance an expense may leave behind.
    pub minimum_balance: Option<Decimal>,
    /// Highest balance a deposit should reach (advisory, see [`SubBalance::can_deposit`]).
    pub maximum_balance: Option<Decimal>,
}

impl NewSubBalance {
    /// A zero-balance sub-balance in `currency` without limits.
    #[must_use]
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            initial_balance: Decimal::ZERO,
            minimum_balance: None,
            maximum_balance: None,
        }
    }

    /// Sets the opening balance.
    #[must_use]
    pub const fn with_initial_balance(mut self, initial_balance: Decimal) -> Self {
        self.initial_balance = initial_balance;
        self
    }

    /// Sets the minimum balance.
    #[must_use]
    pub const fn with_minimum_balance(mut self, minimum_balance: Decimal) -> Self {
        self.minimum_balance = Some(minimum_balance);
        self
    }

    /// Sets the maximum balance.
    #[must_use]
    pub const fn with_maximum_balance(mut self, maximum_balance: Decimal) -> Self {
        self.maximum_balance = Some(maximum_balance);
        self
    }
}

/// A balance bucket in one currency under an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubBalance {
    #[serde(flatten)]
    meta: EntityMeta<SubBalanceId>,
    account_id: AccountId,
    currency: CurrencyCode,
    initial_balance: Decimal,
    current_balance: Decimal,
    minimum_balance: Option<Decimal>,
    maximum_balance: Option<Decimal>,
    active: bool,
}

impl SubBalance {
    /// Creates an active sub-balance whose current balance equals the
    /// initial balance.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrencyCode` if the currency is not 3 letters.
    pub fn create(
        account_id: AccountId,
        input: NewSubBalance,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Self, AccountingError> {
        let currency = CurrencyCode::parse(&input.currency)?;

        Ok(Self {
            meta: EntityMeta::new(SubBalanceId::from_uuid(ids.next_id()), clock.now()),
            account_id,
            currency,
            initial_balance: input.initial_balance,
            current_balance: input.initial_balance,
            minimum_balance: input.minimum_balance,
            maximum_balance: input.maximum_balance,
            active: true,
        })
    }

    /// Returns true if withdrawing `amount` keeps the balance at or above the
    /// minimum. Always true without a minimum.
    #[must_use]
    pub fn can_withdraw(&self, amount: Decimal) -> bool {
        let Some(minimum) = self.minimum_balance else {
            return true;
        };
        self.current_balance
            .checked_sub(amount)
            .is_some_and(|remaining| remaining >= minimum)
    }

    /// Returns true if depositing `amount` keeps the balance at or below the
    /// maximum. Always true without a maximum.
    ///
    /// Advisory only: [`SubBalance::update_balance`] does not consult it on
    /// the income path.
    #[must_use]
    pub fn can_deposit(&self, amount: Decimal) -> bool {
        let Some(maximum) = self.maximum_balance else {
            return true;
        };
        self.current_balance
            .checked_add(amount)
            .is_some_and(|total| total <= maximum)
    }

    /// Moves the running balance by `amount` in the direction of `entry_type`.
    ///
    /// - `Expense` subtracts, refusing to go below the minimum balance
    /// - `Income` adds unconditionally; the maximum balance is NOT enforced
    ///   here (known gap, kept until the business rule is settled)
    ///
    /// On failure the balance is left unchanged.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is not positive
    /// - `InsufficientBalance` if an expense would break the minimum
    /// - `ArithmeticOverflow` if the balance leaves the `Decimal` range
    pub fn update_balance(
        &mut self,
        entry_type: EntryType,
        amount: Decimal,
        clock: &dyn Clock,
    ) -> Result<(), AccountingError> {
        if amount <= Decimal::ZERO {
            return Err(AccountingError::InvalidAmount { amount });
        }

        let updated = match entry_type {
            EntryType::Expense => {
                if let Some(minimum) = self.minimum_balance
                    && !self.can_withdraw(amount)
                {
                    return Err(AccountingError::InsufficientBalance {
                        balance: self.current_balance,
                        requested: amount,
                        minimum,
                    });
                }
                self.current_balance.checked_sub(amount)
            }
            EntryType::Income => self.current_balance.checked_add(amount),
        };

        self.current_balance = updated.ok_or(AccountingError::ArithmeticOverflow)?;
        self.meta.touch(clock.now());
        Ok(())
    }

    /// Applies an entry to this sub-balance.
    ///
    /// # Errors
    ///
    /// - `SubBalanceMismatch` if the entry targets another sub-balance
    /// - `CurrencyMismatch` if the entry currency differs
    /// - `InactiveSubBalance` if this sub-balance was deactivated
    /// - any error of [`SubBalance::update_balance`]
    pub fn apply_entry(
        &mut self,
        entry: &AccountingEntry,
        clock: &dyn Clock,
    ) -> Result<(), AccountingError> {
        if entry.sub_balance_id() != self.id() {
            return Err(AccountingError::SubBalanceMismatch {
                expected: self.id(),
                actual: entry.sub_balance_id(),
            });
        }
        if entry.currency() != &self.currency {
            return Err(AccountingError::CurrencyMismatch {
                expected: self.currency.clone(),
                actual: entry.currency().clone(),
            });
        }
        if !self.active {
            return Err(AccountingError::InactiveSubBalance(self.id()));
        }

        self.update_balance(entry.entry_type(), entry.amount(), clock)
    }

    /// Soft-deletes the sub-balance: marks it inactive and stamps
    /// `deleted_at`, keeping the record because entries still reference it.
    ///
    /// `_has_entries` does not change the outcome yet: with or without
    /// historical entries the sub-balance is deactivated, never erased.
    pub fn deactivate(&mut self, _has_entries: bool, clock: &dyn Clock) {
        self.active = false;
        self.meta.mark_deleted(clock.now());
    }

    /// The owning account.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// The currency of this bucket.
    #[must_use]
    pub const fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Balance at creation.
    #[must_use]
    pub const fn initial_balance(&self) -> Decimal {
        self.initial_balance
    }

    /// Running balance.
    #[must_use]
    pub const fn current_balance(&self) -> Decimal {
        self.current_balance
    }

    /// Minimum balance, if set.
    #[must_use]
    pub const fn minimum_balance(&self) -> Option<Decimal> {
        self.minimum_balance
    }

    /// Maximum balance, if set.
    #[must_use]
    pub const fn maximum_balance(&self) -> Option<Decimal> {
        self.maximum_balance
    }

    /// Whether the sub-balance is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }
}

impl Entity for SubBalance {
    type Id = SubBalanceId;

    fn meta(&self) -> &EntityMeta<SubBalanceId> {
        &self.meta
    }
}

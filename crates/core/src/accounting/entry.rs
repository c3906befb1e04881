//! Accounting entries.
//!
//! An entry is a historical fact: once created its amounts and frozen rate
//! never change. The only mutation is [`AccountingEntry::confirm`].

use chrono::NaiveDate;
use mostratize_shared::types::{CategoryId, EntryId, SubBalanceId, TransferId, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::AccountingError;
use super::rules::ensure_exchange_rate;
use super::truncate_chars;
use super::types::{EntryStatus, EntryType, MovementType};
use crate::clock::{Clock, IdGenerator};
use crate::currency::{CurrencyCode, ExchangeRate, Money, convert_amount};
use crate::entity::{Entity, EntityMeta};

/// Maximum length of an entry description, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 255;

/// Maximum number of tags kept on an entry.
pub const MAX_TAGS: usize = 10;

/// Input for recording an entry.
#[derive(Debug, Clone)]
pub struct NewEntry {
    /// Author of the entry.
    pub user_id: UserId,
    /// Target sub-balance.
    pub sub_balance_id: SubBalanceId,
    /// Direction.
    pub entry_type: EntryType,
    /// Amount and currency.
    pub money: Money,
    /// Calendar date of the movement. Must not be after today.
    pub entry_date: NaiveDate,
    /// Category reference.
    pub category_id: CategoryId,
    /// Free text; truncated to 255 characters.
    pub description: Option<String>,
    /// Business purpose.
    pub movement_type: MovementType,
    /// Rate to the base currency. Required when the currency differs from it.
    pub exchange_rate: Option<ExchangeRate>,
    /// Transfer this entry is one leg of.
    pub transfer_id: Option<TransferId>,
    /// The other leg of the transfer.
    pub counterpart_id: Option<EntryId>,
    /// Labels; only the first 10 are kept.
    pub tags: Vec<String>,
}

impl NewEntry {
    /// A normal movement without description, rate, transfer link or tags.
    #[must_use]
    pub const fn new(
        user_id: UserId,
        sub_balance_id: SubBalanceId,
        entry_type: EntryType,
        money: Money,
        entry_date: NaiveDate,
        category_id: CategoryId,
    ) -> Self {
        Self {
            user_id,
            sub_balance_id,
            entry_type,
            money,
            entry_date,
            category_id,
            description: None,
            movement_type: MovementType::Normal,
            exchange_rate: None,
            transfer_id: None,
            counterpart_id: None,
            tags: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the movement type.
    #[must_use]
    pub const fn with_movement_type(mut self, movement_type: MovementType) -> Self {
        self.movement_type = movement_type;
        self
    }

    /// Supplies the rate to the base currency.
    #[must_use]
    pub const fn with_exchange_rate(mut self, rate: ExchangeRate) -> Self {
        self.exchange_rate = Some(rate);
        self
    }

    /// Links this entry to a transfer and its counterpart leg, and marks it
    /// as a transfer movement.
    #[must_use]
    pub const fn with_transfer(mut self, transfer_id: TransferId, counterpart_id: EntryId) -> Self {
        self.transfer_id = Some(transfer_id);
        self.counterpart_id = Some(counterpart_id);
        self.movement_type = MovementType::Transfer;
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// A recorded movement against one sub-balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountingEntry {
    #[serde(flatten)]
    meta: EntityMeta<EntryId>,
    user_id: UserId,
    sub_balance_id: SubBalanceId,
    entry_type: EntryType,
    #[serde(flatten)]
    money: Money,
    base_currency: CurrencyCode,
    exchange_rate_used: Option<ExchangeRate>,
    base_amount: Decimal,
    category_id: CategoryId,
    description: Option<String>,
    movement_type: MovementType,
    transfer_id: Option<TransferId>,
    counterpart_id: Option<EntryId>,
    tags: Vec<String>,
    status: EntryStatus,
    entry_date: NaiveDate,
}

impl AccountingEntry {
    /// Records a confirmed entry.
    ///
    /// The supplied rate is copied into the entry and never re-read, so later
    /// rate changes do not affect it. `base_amount` is `amount * rate`
    /// rounded to 4 places when a rate is given (even for a base-currency
    /// entry), otherwise `amount`.
    ///
    /// # Errors
    ///
    /// - `FutureDatedEntry` if `entry_date` is after `clock.today()`
    /// - `MissingExchangeRate` if the currency differs from `base_currency`
    ///   and no rate was supplied
    /// - `ArithmeticOverflow` if the conversion overflows
    pub fn create(
        input: NewEntry,
        base_currency: &CurrencyCode,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Self, AccountingError> {
        let today = clock.today();
        if input.entry_date > today {
            return Err(AccountingError::FutureDatedEntry {
                entry_date: input.entry_date,
                today,
            });
        }

        if input.money.currency() != base_currency {
            ensure_exchange_rate(input.exchange_rate.as_ref())?;
        }

        let base_amount = match &input.exchange_rate {
            Some(rate) => convert_amount(input.money.amount(), rate.rate())?,
            None => input.money.amount(),
        };

        let description = input
            .description
            .filter(|text| !text.is_empty())
            .map(|text| truncate_chars(&text, DESCRIPTION_MAX_CHARS));
        let mut tags = input.tags;
        tags.truncate(MAX_TAGS);

        Ok(Self {
            meta: EntityMeta::new(EntryId::from_uuid(ids.next_id()), clock.now()),
            user_id: input.user_id,
            sub_balance_id: input.sub_balance_id,
            entry_type: input.entry_type,
            money: input.money,
            base_currency: base_currency.clone(),
            exchange_rate_used: input.exchange_rate,
            base_amount,
            category_id: input.category_id,
            description,
            movement_type: input.movement_type,
            transfer_id: input.transfer_id,
            counterpart_id: input.counterpart_id,
            tags,
            status: EntryStatus::Confirmed,
            entry_date: input.entry_date,
        })
    }

    /// Sets the status to `Confirmed` and refreshes `updated_at`.
    /// Calling it on a confirmed entry is harmless.
    pub fn confirm(&mut self, clock: &dyn Clock) {
        self.status = EntryStatus::Confirmed;
        self.meta.touch(clock.now());
    }

    /// Author of the entry.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Target sub-balance.
    #[must_use]
    pub const fn sub_balance_id(&self) -> SubBalanceId {
        self.sub_balance_id
    }

    /// Direction.
    #[must_use]
    pub const fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    /// Amount and currency.
    #[must_use]
    pub const fn money(&self) -> &Money {
        &self.money
    }

    /// Amount in the entry currency.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.money.amount()
    }

    /// Entry currency.
    #[must_use]
    pub const fn currency(&self) -> &CurrencyCode {
        self.money.currency()
    }

    /// Base currency at creation time.
    #[must_use]
    pub const fn base_currency(&self) -> &CurrencyCode {
        &self.base_currency
    }

    /// The frozen rate value, if one was supplied.
    #[must_use]
    pub fn exchange_rate_used(&self) -> Option<Decimal> {
        self.exchange_rate_used.map(|rate| rate.rate())
    }

    /// Amount in the base currency.
    #[must_use]
    pub const fn base_amount(&self) -> Decimal {
        self.base_amount
    }

    /// Category reference.
    #[must_use]
    pub const fn category_id(&self) -> CategoryId {
        self.category_id
    }

    /// Description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Business purpose.
    #[must_use]
    pub const fn movement_type(&self) -> MovementType {
        self.movement_type
    }

    /// Transfer this entry belongs to.
    #[must_use]
    pub const fn transfer_id(&self) -> Option<TransferId> {
        self.transfer_id
    }

    /// Counterpart leg of the transfer.
    #[must_use]
    pub const fn counterpart_id(&self) -> Option<EntryId> {
        self.counterpart_id
    }

    /// Tags, at most 10.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn status(&self) -> EntryStatus {
        self.status
    }

    /// Calendar date of the movement.
    #[must_use]
    pub const fn entry_date(&self) -> NaiveDate {
        self.entry_date
    }
}

impl Entity for AccountingEntry {
    type Id = EntryId;

    fn meta(&self) -> &EntityMeta<EntryId> {
        &self.meta
    }
}

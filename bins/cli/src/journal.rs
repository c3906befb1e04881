//! Journal file format and replay.
//!
//! A journal is a JSON document holding an ordered list of commands. Accounts,
//! sub-balances and categories are named by aliases chosen in the file; the
//! replayer maps each alias to the identifier the ledger assigned.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use mostratize_app::{InMemoryRates, LedgerService};
use mostratize_core::Entity;
use mostratize_core::accounting::{
    AccountPurpose, AccountType, AccountingType, EntryType, MovementType, NewAccount, NewEntry,
    NewSubBalance,
};
use mostratize_core::currency::{CurrencyCode, ExchangeRate, Money};
use mostratize_shared::types::{AccountId, CategoryId, SubBalanceId, UserId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

/// Parsed journal document.
#[derive(Debug, Deserialize)]
pub struct Journal {
    /// Commands, replayed in order.
    pub commands: Vec<Command>,
}

impl Journal {
    /// Reads and parses a journal file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read journal {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid journal {}", path.display()))
    }

    /// Parses a journal from JSON text.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One journal command.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Opens an account under a new alias.
    OpenAccount {
        alias: String,
        name: String,
        account_type: AccountType,
        accounting_type: AccountingType,
        purpose: AccountPurpose,
        #[serde(default)]
        default_currency: Option<String>,
    },
    /// Opens a sub-balance under an account alias.
    OpenSubBalance {
        alias: String,
        account: String,
        currency: String,
        #[serde(default)]
        initial_balance: Decimal,
        #[serde(default)]
        minimum_balance: Option<Decimal>,
        #[serde(default)]
        maximum_balance: Option<Decimal>,
    },
    /// Registers a market rate from `from` into `to`.
    SetRate {
        from: String,
        to: String,
        effective_date: NaiveDate,
        rate: Decimal,
    },
    /// Records an entry against a sub-balance alias.
    RecordEntry {
        sub_balance: String,
        entry_type: String,
        amount: Decimal,
        currency: String,
        entry_date: NaiveDate,
        category: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        movement_type: MovementType,
        #[serde(default)]
        exchange_rate: Option<Decimal>,
        #[serde(default)]
        tags: Vec<String>,
    },
    /// Soft-deletes a sub-balance.
    DeactivateSubBalance { sub_balance: String },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::OpenAccount { .. } => "open_account",
            Self::OpenSubBalance { .. } => "open_sub_balance",
            Self::SetRate { .. } => "set_rate",
            Self::RecordEntry { .. } => "record_entry",
            Self::DeactivateSubBalance { .. } => "deactivate_sub_balance",
        }
    }
}

/// Balance line printed after a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceLine {
    /// Sub-balance alias.
    pub alias: String,
    /// Currency of the sub-balance.
    pub currency: CurrencyCode,
    /// Running balance.
    pub balance: Decimal,
    /// Whether the sub-balance is still active.
    pub active: bool,
}

/// Replays journal commands against a ledger service.
pub struct Replayer {
    service: LedgerService,
    rates: Arc<InMemoryRates>,
    user_id: UserId,
    accounts: HashMap<String, AccountId>,
    sub_balances: Vec<(String, SubBalanceId)>,
    categories: HashMap<String, CategoryId>,
}

impl Replayer {
    /// Creates a replayer. `rates` must be the table `service` looks rates up in.
    pub fn new(service: LedgerService, rates: Arc<InMemoryRates>) -> Self {
        Self {
            service,
            rates,
            user_id: UserId::new(),
            accounts: HashMap::new(),
            sub_balances: Vec::new(),
            categories: HashMap::new(),
        }
    }

    /// Runs every command in order, stopping at the first failure.
    pub fn replay(&mut self, journal: Journal) -> anyhow::Result<()> {
        for (index, command) in journal.commands.into_iter().enumerate() {
            let name = command.name();
            self.apply(command)
                .with_context(|| format!("Command #{} ({name}) rejected", index + 1))?;
        }
        info!(sub_balances = self.sub_balances.len(), "Journal replayed");
        Ok(())
    }

    fn apply(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::OpenAccount {
                alias,
                name,
                account_type,
                accounting_type,
                purpose,
                default_currency,
            } => {
                if self.accounts.contains_key(&alias) {
                    bail!("Account alias {alias:?} already used");
                }
                let account = self.service.open_account(NewAccount {
                    user_id: self.user_id,
                    name,
                    account_type,
                    accounting_type,
                    purpose,
                    default_currency,
                })?;
                self.accounts.insert(alias, account.id());
            }
            Command::OpenSubBalance {
                alias,
                account,
                currency,
                initial_balance,
                minimum_balance,
                maximum_balance,
            } => {
                if self.sub_balance_id(&alias).is_ok() {
                    bail!("Sub-balance alias {alias:?} already used");
                }
                let account_id = self.account_id(&account)?;
                let input = NewSubBalance {
                    currency,
                    initial_balance,
                    minimum_balance,
                    maximum_balance,
                };
                let sub_balance = self.service.open_sub_balance(account_id, input)?;
                self.sub_balances.push((alias, sub_balance.id()));
            }
            Command::SetRate {
                from,
                to,
                effective_date,
                rate,
            } => {
                self.rates.set(
                    CurrencyCode::parse(&from)?,
                    CurrencyCode::parse(&to)?,
                    effective_date,
                    ExchangeRate::new(rate)?,
                )?;
            }
            Command::RecordEntry {
                sub_balance,
                entry_type,
                amount,
                currency,
                entry_date,
                category,
                description,
                movement_type,
                exchange_rate,
                tags,
            } => {
                let sub_balance_id = self.sub_balance_id(&sub_balance)?;
                let entry_type: EntryType = entry_type.parse()?;
                let category_id = *self.categories.entry(category).or_default();

                let mut input = NewEntry::new(
                    self.user_id,
                    sub_balance_id,
                    entry_type,
                    Money::new(amount, &currency)?,
                    entry_date,
                    category_id,
                )
                .with_movement_type(movement_type)
                .with_tags(tags);
                if let Some(description) = description {
                    input = input.with_description(description);
                }
                if let Some(rate) = exchange_rate {
                    input = input.with_exchange_rate(ExchangeRate::new(rate)?);
                }

                self.service.record_entry(input)?;
            }
            Command::DeactivateSubBalance { sub_balance } => {
                let sub_balance_id = self.sub_balance_id(&sub_balance)?;
                self.service.deactivate_sub_balance(sub_balance_id)?;
            }
        }
        Ok(())
    }

    fn account_id(&self, alias: &str) -> anyhow::Result<AccountId> {
        self.accounts
            .get(alias)
            .copied()
            .with_context(|| format!("Unknown account alias {alias:?}"))
    }

    fn sub_balance_id(&self, alias: &str) -> anyhow::Result<SubBalanceId> {
        self.sub_balances
            .iter()
            .find(|(known, _)| known == alias)
            .map(|(_, id)| *id)
            .with_context(|| format!("Unknown sub-balance alias {alias:?}"))
    }

    /// Sub-balances in the order they were opened.
    pub fn balances(&self) -> anyhow::Result<Vec<BalanceLine>> {
        self.sub_balances
            .iter()
            .map(|(alias, id)| {
                let sub_balance = self.service.sub_balance(*id)?;
                Ok(BalanceLine {
                    alias: alias.clone(),
                    currency: sub_balance.currency().clone(),
                    balance: sub_balance.current_balance(),
                    active: sub_balance.is_active(),
                })
            })
            .collect()
    }
}

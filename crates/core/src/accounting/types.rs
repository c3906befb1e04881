//! Closed enumerations of the accounting domain.
//!
//! Unknown strings are rejected at the boundary (`FromStr`/serde), so every
//! consumer matches exhaustively on a known variant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::AccountingError;

/// Generates `Display`/`FromStr` for a unit-variant enum with
/// SCREAMING_SNAKE_CASE wire names.
macro_rules! wire_enum {
    ($name:ident, $field:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            /// Wire name of this variant.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = AccountingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_uppercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(AccountingError::UnknownValue {
                        field: $field,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// Nature of the resource an account represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Physical cash. Holds exactly one sub-balance.
    Cash,
    /// Traditional bank account.
    Bank,
    /// Digital wallet (Wise, PayPal, ...).
    DigitalWallet,
    /// Credit card (a liability).
    CreditCard,
    /// Debit card.
    DebitCard,
}

wire_enum!(AccountType, "account type", {
    Cash => "CASH",
    Bank => "BANK",
    DigitalWallet => "DIGITAL_WALLET",
    CreditCard => "CREDIT_CARD",
    DebitCard => "DEBIT_CARD",
});

impl AccountType {
    /// Returns true if accounts of this type may hold several currencies.
    #[must_use]
    pub const fn allows_multiple_balances(&self) -> bool {
        !matches!(self, Self::Cash)
    }
}

/// Macro accounting classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountingType {
    /// Asset.
    Asset,
    /// Liability.
    Liability,
    /// Equity.
    Equity,
    /// Income.
    Income,
    /// Expense.
    Expense,
}

wire_enum!(AccountingType, "accounting type", {
    Asset => "ASSET",
    Liability => "LIABILITY",
    Equity => "EQUITY",
    Income => "INCOME",
    Expense => "EXPENSE",
});

/// What the account is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountPurpose {
    /// Day-to-day checking.
    Checking,
    /// Savings.
    Savings,
    /// Investment.
    Investment,
    /// Payments / transactional (common for digital accounts).
    Payment,
    /// Loan or financing.
    Loan,
}

wire_enum!(AccountPurpose, "account purpose", {
    Checking => "CHECKING",
    Savings => "SAVINGS",
    Investment => "INVESTMENT",
    Payment => "PAYMENT",
    Loan => "LOAN",
});

/// Direction of an entry relative to its sub-balance.
///
/// Wire names are `INCOME`/`EXPENSE`; the legacy `ENTRY`/`EXIT` are accepted
/// on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    /// Money coming in: adds to the balance.
    #[serde(alias = "ENTRY")]
    Income,
    /// Money going out: subtracts from the balance.
    #[serde(alias = "EXIT")]
    Expense,
}

impl EntryType {
    /// Wire name of this variant.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = AccountingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INCOME" | "ENTRY" => Ok(Self::Income),
            "EXPENSE" | "EXIT" => Ok(Self::Expense),
            _ => Err(AccountingError::UnsupportedEntryType(s.to_string())),
        }
    }
}

/// Lifecycle state of an entry.
///
/// `Pending -> Confirmed -> Synced`, with `Cancelled` reachable from
/// `Pending` or `Confirmed`. Manual entries are born `Confirmed`; `Pending`
/// belongs to the offline client path, and `Cancelled`/`Synced` are reached
/// outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// Created offline, not yet confirmed.
    Pending,
    /// Recorded.
    Confirmed,
    /// Cancelled.
    Cancelled,
    /// Synchronized with the central backend.
    Synced,
}

wire_enum!(EntryStatus, "entry status", {
    Pending => "PENDING",
    Confirmed => "CONFIRMED",
    Cancelled => "CANCELLED",
    Synced => "SYNCED",
});

/// Business purpose of an entry, independent of its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    /// Ordinary movement.
    #[default]
    Normal,
    /// Reverses an earlier entry.
    Reversal,
    /// Manual correction.
    Adjustment,
    /// One leg of a transfer between sub-balances.
    Transfer,
}

wire_enum!(MovementType, "movement type", {
    Normal => "NORMAL",
    Reversal => "REVERSAL",
    Adjustment => "ADJUSTMENT",
    Transfer => "TRANSFER",
});

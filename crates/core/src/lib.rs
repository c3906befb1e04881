//! Accounting ledger core for Mostratize.
//!
//! This crate contains pure business logic with ZERO I/O, web or database
//! dependencies. It never logs and never retries: every operation either
//! returns the updated entity state or a typed [`AccountingError`].
//!
//! # Modules
//!
//! - `currency` - Currency codes, `Money` and `ExchangeRate` value objects
//! - `accounting` - Accounts, sub-balances, accounting entries and rules
//! - `entity` - Identity and timestamp metadata shared by every entity
//! - `clock` - Injectable time and identity sources

pub mod accounting;
pub mod clock;
pub mod currency;
pub mod entity;

pub use accounting::AccountingError;
pub use clock::{Clock, FixedClock, IdGenerator, SystemClock, UuidV7Generator};
pub use entity::{Entity, EntityMeta};

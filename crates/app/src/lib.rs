//! Ledger application layer for Mostratize.
//!
//! Wires the pure accounting core to storage and exchange-rate lookup:
//!
//! - `ports` - Repository and rate-source traits
//! - `memory` - `DashMap`-backed implementations of those traits
//! - `service` - [`LedgerService`], the orchestrating service
//! - `error` - [`ServiceError`]
//!
//! Unlike the core, this layer logs through `tracing`.

pub mod error;
pub mod memory;
pub mod ports;
pub mod service;

pub use error::ServiceError;
pub use memory::{InMemoryRates, InMemoryStore};
pub use ports::{AccountRepository, EntryRepository, ExchangeRateSource, SubBalanceRepository};
pub use service::LedgerService;

//! Currency codes and monetary value objects.
//!
//! CRITICAL: Never use floating-point for money. Every amount is a
//! `rust_decimal::Decimal` quantized with round-half-up:
//! - `Money` amounts to 4 decimal places
//! - `ExchangeRate` rates to 6 decimal places

pub mod code;
pub mod conversion;
pub mod exchange;
pub mod money;

#[cfg(test)]
mod props;

pub use code::CurrencyCode;
pub use conversion::{convert_amount, quantize};
pub use exchange::{ExchangeRate, RATE_SCALE};
pub use money::{MONEY_SCALE, Money};

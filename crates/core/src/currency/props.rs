//! Property-based tests for currency value objects.
//!
//! - Quantization is half-up, idempotent and within half a unit
//! - Money and exchange rates are always positive at a fixed scale
//! - Conversion is deterministic

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::{convert_amount, quantize};
use super::exchange::{ExchangeRate, RATE_SCALE};
use super::money::{MONEY_SCALE, Money};

/// Strategy to generate positive amounts with up to 8 fractional digits.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000_000i64).prop_map(|units| Decimal::new(units, 8))
}

/// Strategy to generate positive exchange rates (0.000100 to 10000.000000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (100i64..10_000_000_000i64).prop_map(|v| Decimal::new(v, 6))
}

/// Strategy to generate any amount, including zero and negatives.
fn any_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000i64..1_000_000_000i64).prop_map(|v| Decimal::new(v, 5))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Quantizing twice changes nothing.
    #[test]
    fn prop_quantize_is_idempotent(value in any_amount(), places in 0u32..=6) {
        let once = quantize(value, places);
        prop_assert_eq!(quantize(once, places), once);
        prop_assert_eq!(once.scale(), places);
    }

    /// The rounding error never exceeds half a unit in the last place.
    #[test]
    fn prop_quantize_error_bounded(value in any_amount()) {
        let rounded = quantize(value, MONEY_SCALE);
        let half_unit = Decimal::new(5, MONEY_SCALE + 1);
        prop_assert!((rounded - value).abs() <= half_unit);
    }

    /// A midpoint always rounds away from zero.
    #[test]
    fn prop_midpoint_rounds_up(units in 0i64..1_000_000i64) {
        // units.5 at the fifth decimal place
        let value = Decimal::new(units * 10 + 5, MONEY_SCALE + 1);
        prop_assert_eq!(quantize(value, MONEY_SCALE), Decimal::new(units + 1, MONEY_SCALE));
    }

    /// Every constructed Money is positive with exactly 4 fractional digits.
    #[test]
    fn prop_money_positive_and_scaled(amount in positive_amount()) {
        if let Ok(money) = Money::new(amount, "USD") {
            prop_assert!(money.amount() > Decimal::ZERO);
            prop_assert_eq!(money.amount().scale(), MONEY_SCALE);
        } else {
            // Only amounts that round to zero may be refused.
            prop_assert!(quantize(amount, MONEY_SCALE).is_zero());
        }
    }

    /// Non-positive amounts never construct Money.
    #[test]
    fn prop_non_positive_money_rejected(units in -1_000_000i64..=0i64) {
        prop_assert!(Money::new(Decimal::new(units, 2), "USD").is_err());
    }

    /// Every constructed rate is positive with exactly 6 fractional digits.
    #[test]
    fn prop_rate_positive_and_scaled(rate in positive_rate()) {
        let rate = ExchangeRate::new(rate).unwrap();
        prop_assert!(rate.rate() > Decimal::ZERO);
        prop_assert_eq!(rate.rate().scale(), RATE_SCALE);
    }

    /// Conversion is deterministic and lands on the money scale.
    #[test]
    fn prop_convert_deterministic(amount in positive_amount(), rate in positive_rate()) {
        let first = convert_amount(amount, rate).unwrap();
        let second = convert_amount(amount, rate).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.scale(), MONEY_SCALE);
    }

    /// Converting with a rate of exactly one leaves the amount untouched.
    #[test]
    fn prop_unit_rate_is_identity(amount in positive_amount()) {
        let Ok(money) = Money::new(amount, "EUR") else {
            return Ok(());
        };
        let unit = ExchangeRate::new(Decimal::ONE).unwrap();
        let converted = convert_amount(money.amount(), unit.rate()).unwrap();
        prop_assert_eq!(converted, money.amount());
    }
}

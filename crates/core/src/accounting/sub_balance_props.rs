//! Property-based tests for sub-balance movements.
//!
//! - An expense never leaves the balance below the minimum
//! - A rejected movement leaves the balance untouched
//! - Income followed by the same expense restores the balance

use chrono::{TimeZone, Utc};
use mostratize_shared::types::AccountId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::AccountingError;
use super::sub_balance::{NewSubBalance, SubBalance};
use super::types::EntryType;
use crate::clock::{FixedClock, UuidV7Generator};

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap())
}

/// Strategy for balances between -10000.0000 and 10000.0000.
fn balance() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy for positive movement amounts up to 10000.0000.
fn movement() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn sub_balance(initial: Decimal, minimum: Option<Decimal>) -> SubBalance {
    let mut input = NewSubBalance::new("USD").with_initial_balance(initial);
    input.minimum_balance = minimum;
    SubBalance::create(AccountId::new(), input, &clock(), &UuidV7Generator).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A successful expense keeps the balance at or above the minimum; a
    /// failed one keeps the balance unchanged.
    #[test]
    fn prop_expense_respects_minimum(
        initial in balance(),
        minimum in balance(),
        amount in movement(),
    ) {
        let mut sb = sub_balance(initial, Some(minimum));

        match sb.update_balance(EntryType::Expense, amount, &clock()) {
            Ok(()) => {
                prop_assert!(sb.current_balance() >= minimum);
                prop_assert_eq!(sb.current_balance(), initial - amount);
            }
            Err(AccountingError::InsufficientBalance { balance, requested, minimum: reported }) => {
                prop_assert!(initial - amount < minimum);
                prop_assert_eq!(balance, initial);
                prop_assert_eq!(requested, amount);
                prop_assert_eq!(reported, minimum);
                prop_assert_eq!(sb.current_balance(), initial);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// `can_withdraw` predicts the outcome of an expense exactly.
    #[test]
    fn prop_can_withdraw_matches_update(
        initial in balance(),
        minimum in proptest::option::of(balance()),
        amount in movement(),
    ) {
        let mut sb = sub_balance(initial, minimum);
        let predicted = sb.can_withdraw(amount);

        let outcome = sb.update_balance(EntryType::Expense, amount, &clock());

        prop_assert_eq!(predicted, outcome.is_ok());
    }

    /// Income then expense of the same amount is a no-op on the balance.
    #[test]
    fn prop_income_then_expense_restores(initial in balance(), amount in movement()) {
        let mut sb = sub_balance(initial, None);

        sb.update_balance(EntryType::Income, amount, &clock()).unwrap();
        prop_assert_eq!(sb.current_balance(), initial + amount);
        sb.update_balance(EntryType::Expense, amount, &clock()).unwrap();

        prop_assert_eq!(sb.current_balance(), initial);
    }

    /// Non-positive amounts are always rejected without effect.
    #[test]
    fn prop_non_positive_amount_rejected(initial in balance(), amount in balance()) {
        prop_assume!(amount <= Decimal::ZERO);
        let mut sb = sub_balance(initial, None);

        for entry_type in [EntryType::Income, EntryType::Expense] {
            let result = sb.update_balance(entry_type, amount, &clock());
            prop_assert_eq!(result, Err(AccountingError::InvalidAmount { amount }));
        }
        prop_assert_eq!(sb.current_balance(), initial);
    }
}

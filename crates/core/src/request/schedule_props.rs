//! Property-based tests for InstallmentSchedule.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::schedule::InstallmentSchedule;
use super::types::TenureType;
use loandesk_shared::types::round_money;

fn total() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn tenure_type() -> impl Strategy<Value = TenureType> {
    prop_oneof![
        Just(TenureType::Days),
        Just(TenureType::Months),
        Just(TenureType::Years),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The schedule has tenureValue rows and sums exactly to the total.
    #[test]
    fn prop_schedule_sums_to_total(t in total(), unit in tenure_type(), n in 1i32..=360) {
        let start = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        let entries = InstallmentSchedule::generate(t, unit, n, start).unwrap();

        prop_assert_eq!(entries.len(), usize::try_from(n).unwrap());
        let sum: Decimal = entries.iter().map(|e| e.amount).sum();
        prop_assert_eq!(sum, round_money(t));
    }

    /// Every row but the last is equal; the last is never smaller and never
    /// more than n - 1 cents larger.
    #[test]
    fn prop_only_last_absorbs_remainder(t in total(), n in 1u32..=360) {
        let amounts = InstallmentSchedule::split(t, n);
        let base = amounts[0];
        let last = *amounts.last().unwrap();

        prop_assert!(amounts[..amounts.len() - 1].iter().all(|a| *a == base));
        prop_assert!(last >= base);
        prop_assert!(last - base < Decimal::new(i64::from(n), 2));
        prop_assert!(amounts.iter().all(|a| a.scale() <= 2));
    }

    /// Due dates start at submission and strictly increase.
    #[test]
    fn prop_due_dates_increase(unit in tenure_type(), n in 1i32..=360) {
        let start = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        let entries = InstallmentSchedule::generate(Decimal::new(100_000, 2), unit, n, start).unwrap();

        prop_assert_eq!(entries[0].due_date, start);
        prop_assert!(entries.windows(2).all(|w| w[0].due_date < w[1].due_date));
        prop_assert!(entries.iter().enumerate().all(|(i, e)| usize::try_from(e.sequence).unwrap() == i));
    }
}

//! Property-based tests for InterestPolicy.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::InterestError;
use super::policy::{FALLBACK_RATE, InterestPolicy, RateSource};

/// Rates in (0, 100] with two decimal places.
fn valid_rate() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000i64).prop_map(|v| Decimal::new(v, 2))
}

fn optional_rate() -> impl Strategy<Value = Option<Decimal>> {
    prop_oneof![Just(None), valid_rate().prop_map(Some)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A personal override always wins over the global log.
    #[test]
    fn prop_override_takes_precedence(user in valid_rate(), global in optional_rate()) {
        let res = InterestPolicy::resolve_rate(Some(user), global);
        prop_assert_eq!(res.rate, user);
        prop_assert_eq!(res.source, RateSource::UserOverride);
    }

    /// Without an override the latest global rate applies, else the fallback.
    #[test]
    fn prop_global_or_fallback(global in optional_rate()) {
        let res = InterestPolicy::resolve_rate(None, global);
        match global {
            Some(rate) => prop_assert_eq!(res.rate, rate),
            None => prop_assert_eq!(res.rate, FALLBACK_RATE),
        }
        prop_assert!(!res.is_custom());
    }

    /// In-range rates different from the latest are accepted.
    #[test]
    fn prop_new_rate_accepted(rate in valid_rate(), latest in optional_rate()) {
        prop_assume!(latest != Some(rate));
        let accepted = InterestPolicy::validate_global_rate(Some(rate), latest);
        prop_assert_eq!(accepted.map(|r| r.percent()), Ok(rate.normalize()));
    }

    /// Setting the same rate twice in a row is rejected on the second call.
    #[test]
    fn prop_same_rate_twice_rejected(rate in valid_rate()) {
        let first = InterestPolicy::validate_global_rate(Some(rate), None).unwrap();
        let second = InterestPolicy::validate_global_rate(Some(rate), Some(first.percent()));
        prop_assert!(matches!(second, Err(InterestError::Unchanged(_))));
    }

    /// Anything above 100 or at most 0 is rejected.
    #[test]
    fn prop_out_of_range_rejected(cents in prop_oneof![-100_000i64..=0, 10_001i64..1_000_000]) {
        let rate = Decimal::new(cents, 2);
        prop_assert!(matches!(
            InterestPolicy::validate_global_rate(Some(rate), None),
            Err(InterestError::InvalidRate(_))
        ));
    }
}

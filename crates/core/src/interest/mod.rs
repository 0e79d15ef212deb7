//! Interest-rate policy.
//!
//! Resolves the rate a borrower is charged (personal override, then the latest
//! global rate, then a fixed fallback) and validates new rate settings.

pub mod error;
pub mod policy;

#[cfg(test)]
mod policy_props;

pub use error::InterestError;
pub use policy::{
    CurrentInterest, FALLBACK_RATE, GlobalRate, InterestPolicy, RateResolution, RateSource,
    UserRateView,
};

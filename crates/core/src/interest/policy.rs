//! Rate resolution and rate-setting rules.

use chrono::{DateTime, Utc};
use loandesk_shared::types::Rate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::interest::error::InterestError;

/// Rate charged when neither a personal override nor a global rate exists.
pub const FALLBACK_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// The borrower's personal override.
    UserOverride,
    /// The latest global rate record.
    Global,
    /// [`FALLBACK_RATE`].
    Fallback,
}

/// A resolved rate and its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateResolution {
    /// Percentage rate.
    pub rate: Decimal,
    /// Origin of the rate.
    pub source: RateSource,
}

impl RateResolution {
    /// Returns true when the borrower has a personal rate.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self.source, RateSource::UserOverride)
    }
}

/// The latest record in the global rate log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalRate {
    /// Percentage rate.
    pub rate: Decimal,
    /// When the rate took effect.
    pub effective_date: DateTime<Utc>,
}

/// Rate information for an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRateView {
    /// The caller's personal override, if any.
    pub user_specific_rate: Option<Decimal>,
    /// The rate the caller would be charged today.
    pub effective_user_rate: Decimal,
    /// Whether the effective rate is a personal override.
    pub is_custom_rate: bool,
}

/// Current interest information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentInterest {
    /// Latest global rate, or the fallback.
    pub global_interest_rate: Decimal,
    /// When the global rate took effect; absent when the fallback applies.
    pub effective_date: Option<DateTime<Utc>>,
    /// Present only for authenticated callers.
    #[serde(flatten)]
    pub user: Option<UserRateView>,
}

/// Stateless interest-rate rules.
pub struct InterestPolicy;

impl InterestPolicy {
    /// Resolves the rate for a borrower.
    ///
    /// A personal override wins; otherwise the latest global rate; otherwise
    /// [`FALLBACK_RATE`]. Non-positive values are treated as unset.
    #[must_use]
    pub fn resolve_rate(user_override: Option<Decimal>, latest_global: Option<Decimal>) -> RateResolution {
        if let Some(rate) = user_override.filter(|r| r.is_sign_positive() && !r.is_zero()) {
            return RateResolution {
                rate,
                source: RateSource::UserOverride,
            };
        }

        match latest_global.filter(|r| r.is_sign_positive() && !r.is_zero()) {
            Some(rate) => RateResolution {
                rate,
                source: RateSource::Global,
            },
            None => RateResolution {
                rate: FALLBACK_RATE,
                source: RateSource::Fallback,
            },
        }
    }

    /// Builds the current-rate view.
    ///
    /// `caller_override` is `None` for anonymous callers and
    /// `Some(override)` for authenticated ones.
    #[must_use]
    pub fn current(latest: Option<GlobalRate>, caller_override: Option<Option<Decimal>>) -> CurrentInterest {
        let global = Self::resolve_rate(None, latest.map(|g| g.rate));

        let user = caller_override.map(|user_rate| {
            let resolved = Self::resolve_rate(user_rate, Some(global.rate));
            UserRateView {
                user_specific_rate: user_rate,
                effective_user_rate: resolved.rate,
                is_custom_rate: resolved.is_custom(),
            }
        });

        CurrentInterest {
            global_interest_rate: global.rate,
            effective_date: latest.map(|g| g.effective_date),
            user,
        }
    }

    /// Validates a new global rate against the current latest one.
    ///
    /// # Errors
    ///
    /// - `RateRequired` when no rate is given
    /// - `InvalidRate` when outside `(0, 100]`
    /// - `Unchanged` when equal to the latest rate
    pub fn validate_global_rate(
        requested: Option<Decimal>,
        latest: Option<Decimal>,
    ) -> Result<Rate, InterestError> {
        let requested = requested.ok_or(InterestError::RateRequired)?;
        let rate = Rate::new(requested)?;

        if latest.is_some_and(|current| current == rate.percent()) {
            return Err(InterestError::Unchanged(rate.percent()));
        }

        Ok(rate)
    }

    /// Validates a personal override. `None` clears it.
    pub fn validate_user_rate(requested: Option<Decimal>) -> Result<Option<Rate>, InterestError> {
        requested.map(Rate::new).transpose().map_err(InterestError::from)
    }
}

//! Money helpers and percentage rates.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are plain `rust_decimal::Decimal` values in the loan's currency.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal places money is stored with.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to [`MONEY_SCALE`] places using banker's rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Rejected interest-rate values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// Rate was zero or negative.
    #[error("Interest rate must be greater than 0")]
    NotPositive,
    /// Rate was above 100 percent.
    #[error("Interest rate cannot exceed 100%")]
    AboveMaximum,
}

/// A simple-interest rate expressed as a percentage in `(0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Rate(Decimal);

impl Rate {
    /// Upper bound, inclusive.
    pub const MAX: Decimal = Decimal::ONE_HUNDRED;

    /// Validates and wraps a percentage.
    pub fn new(percent: Decimal) -> Result<Self, RateError> {
        if percent <= Decimal::ZERO {
            return Err(RateError::NotPositive);
        }
        if percent > Self::MAX {
            return Err(RateError::AboveMaximum);
        }
        Ok(Self(percent.normalize()))
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn percent(self) -> Decimal {
        self.0
    }

    /// Interest accrued on `principal` at this rate: `principal * rate / 100`.
    #[must_use]
    pub fn interest_on(self, principal: Decimal) -> Decimal {
        principal * self.0 / Decimal::ONE_HUNDRED
    }
}

impl TryFrom<Decimal> for Rate {
    type Error = RateError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rate> for Decimal {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

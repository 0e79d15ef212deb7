//! Interest policy errors.

use loandesk_shared::AppError;
use loandesk_shared::types::RateError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when setting an interest rate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterestError {
    /// No rate was supplied.
    #[error("Interest rate is required")]
    RateRequired,

    /// Rate outside `(0, 100]`.
    #[error(transparent)]
    InvalidRate(#[from] RateError),

    /// Rate equals the current latest global rate.
    #[error("Interest rate is already set to {0}%")]
    Unchanged(Decimal),
}

impl InterestError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::RateRequired => "RATE_REQUIRED",
            Self::InvalidRate(_) => "INVALID_RATE",
            Self::Unchanged(_) => "RATE_UNCHANGED",
        }
    }
}

impl From<InterestError> for AppError {
    fn from(err: InterestError) -> Self {
        match err {
            InterestError::RateRequired | InterestError::InvalidRate(_) => {
                Self::Validation(err.to_string())
            }
            InterestError::Unchanged(_) => Self::Conflict(err.to_string()),
        }
    }
}

//! Loan account error types.

use loandesk_shared::AppError;
use thiserror::Error;

/// Errors that can occur while opening, repaying or reading loan accounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanError {
    /// Amount was zero or negative.
    #[error("Amount must be a positive number")]
    InvalidAmount,

    /// Amount above [`MAX_AMOUNT`](crate::loan::MAX_AMOUNT).
    #[error("Amount exceeds the supported maximum")]
    AmountTooLarge,

    /// Term was zero or negative.
    #[error("Total months must be a positive number")]
    InvalidTerm,

    /// Borrower profile is incomplete.
    #[error("Please complete your profile before applying for a loan")]
    ProfileIncomplete,

    /// Borrower already has an active loan.
    #[error("You already have an active loan")]
    ActiveLoanExists,

    /// Loan is already completed.
    #[error("This loan is already completed")]
    AlreadyCompleted,

    /// Caller does not own the loan.
    #[error("Unauthorized")]
    NotOwner,

    /// Slip reference missing.
    #[error("slipUrl is required")]
    SlipUrlRequired,

    /// Loan not found.
    #[error("Loan not found")]
    NotFound,

    /// Borrower has no active loan.
    #[error("No active loan found")]
    NoActiveLoan,

    /// Borrower has no completed loans.
    #[error("No previous loans found")]
    NoPreviousLoans,

    /// Borrower has uploaded no slips.
    #[error("No repayment records found")]
    NoRepayments,
}

impl LoanError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount
            | Self::AmountTooLarge
            | Self::InvalidTerm
            | Self::ProfileIncomplete
            | Self::ActiveLoanExists
            | Self::AlreadyCompleted
            | Self::SlipUrlRequired => 400,

            Self::NotOwner => 403,

            Self::NotFound | Self::NoActiveLoan | Self::NoPreviousLoans | Self::NoRepayments => {
                404
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::AmountTooLarge => "AMOUNT_TOO_LARGE",
            Self::InvalidTerm => "INVALID_TERM",
            Self::ProfileIncomplete => "PROFILE_INCOMPLETE",
            Self::ActiveLoanExists => "ACTIVE_LOAN_EXISTS",
            Self::AlreadyCompleted => "LOAN_ALREADY_COMPLETED",
            Self::NotOwner => "NOT_LOAN_OWNER",
            Self::SlipUrlRequired => "SLIP_URL_REQUIRED",
            Self::NotFound => "LOAN_NOT_FOUND",
            Self::NoActiveLoan => "NO_ACTIVE_LOAN",
            Self::NoPreviousLoans => "NO_PREVIOUS_LOANS",
            Self::NoRepayments => "NO_REPAYMENTS",
        }
    }
}

impl From<LoanError> for AppError {
    fn from(err: LoanError) -> Self {
        let message = err.to_string();
        match err {
            LoanError::ActiveLoanExists | LoanError::AlreadyCompleted => Self::Conflict(message),
            LoanError::NotOwner => Self::Forbidden(message),
            LoanError::NotFound
            | LoanError::NoActiveLoan
            | LoanError::NoPreviousLoans
            | LoanError::NoRepayments => Self::NotFound(message),
            LoanError::InvalidAmount
            | LoanError::AmountTooLarge
            | LoanError::InvalidTerm
            | LoanError::ProfileIncomplete
            | LoanError::SlipUrlRequired => Self::Validation(message),
        }
    }
}

//! Loan request error types.

use loandesk_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::request::types::LoanRequestStatus;

/// Errors that can occur in the loan request workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanRequestError {
    /// Requested amount was zero, negative or too large.
    #[error("Requested amount must be a positive number")]
    InvalidAmount,

    /// Tenure outside the accepted range.
    #[error("Tenure value must be between 1 and {max}")]
    InvalidTenure {
        /// Largest accepted tenure value.
        max: i32,
    },

    /// Due dates would fall outside the supported calendar.
    #[error("Tenure extends beyond the supported date range")]
    ScheduleOutOfRange,

    /// Requested amount exceeds the borrower's limit.
    #[error("User loan limit is less than the requested amount")]
    ExceedsLoanLimit {
        /// Requested amount.
        requested: Decimal,
        /// Borrower's limit.
        limit: Decimal,
    },

    /// Borrower already has a pending or approved request.
    #[error("User already has a pending or approved loan request")]
    OpenRequestExists,

    /// Transition not in the table.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: LoanRequestStatus,
        /// Requested status.
        to: LoanRequestStatus,
    },

    /// Installments can only be paid on approved requests.
    #[error("Loan request is {0}; installments can only be paid once it is approved")]
    NotApproved(LoanRequestStatus),

    /// Installment already paid.
    #[error("Installment is already paid")]
    InstallmentAlreadyPaid,

    /// Caller neither owns the request nor is an admin.
    #[error("Unauthorized")]
    NotOwner,

    /// Loan request not found.
    #[error("Loan request not found")]
    NotFound,

    /// Installment not found on this request.
    #[error("Installment not found")]
    InstallmentNotFound,
}

impl LoanRequestError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount
            | Self::InvalidTenure { .. }
            | Self::ScheduleOutOfRange
            | Self::ExceedsLoanLimit { .. }
            | Self::OpenRequestExists
            | Self::InvalidTransition { .. }
            | Self::NotApproved(_)
            | Self::InstallmentAlreadyPaid => 400,

            Self::NotOwner => 403,

            Self::NotFound | Self::InstallmentNotFound => 404,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidTenure { .. } => "INVALID_TENURE",
            Self::ScheduleOutOfRange => "SCHEDULE_OUT_OF_RANGE",
            Self::ExceedsLoanLimit { .. } => "EXCEEDS_LOAN_LIMIT",
            Self::OpenRequestExists => "OPEN_REQUEST_EXISTS",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotApproved(_) => "REQUEST_NOT_APPROVED",
            Self::InstallmentAlreadyPaid => "INSTALLMENT_ALREADY_PAID",
            Self::NotOwner => "NOT_REQUEST_OWNER",
            Self::NotFound => "LOAN_REQUEST_NOT_FOUND",
            Self::InstallmentNotFound => "INSTALLMENT_NOT_FOUND",
        }
    }
}

impl From<LoanRequestError> for AppError {
    fn from(err: LoanRequestError) -> Self {
        let message = err.to_string();
        match err {
            LoanRequestError::OpenRequestExists
            | LoanRequestError::InvalidTransition { .. }
            | LoanRequestError::NotApproved(_)
            | LoanRequestError::InstallmentAlreadyPaid => Self::Conflict(message),
            LoanRequestError::NotOwner => Self::Forbidden(message),
            LoanRequestError::NotFound | LoanRequestError::InstallmentNotFound => {
                Self::NotFound(message)
            }
            LoanRequestError::InvalidAmount
            | LoanRequestError::InvalidTenure { .. }
            | LoanRequestError::ScheduleOutOfRange
            | LoanRequestError::ExceedsLoanLimit { .. } => Self::Validation(message),
        }
    }
}

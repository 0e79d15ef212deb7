//! Repository error type.

use loandesk_core::interest::InterestError;
use loandesk_core::loan::LoanError;
use loandesk_core::request::LoanRequestError;
use loandesk_shared::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Number of compare-and-swap attempts before a write gives up.
pub const MAX_UPDATE_ATTEMPTS: usize = 3;

const CONTENTION_MESSAGE: &str = "The record was modified concurrently, please retry";

/// Errors returned by repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Loan account rule violation.
    #[error(transparent)]
    Loan(#[from] LoanError),

    /// Loan request rule violation.
    #[error(transparent)]
    LoanRequest(#[from] LoanRequestError),

    /// Interest rate rule violation.
    #[error(transparent)]
    Interest(#[from] InterestError),

    /// User does not exist.
    #[error("User not found")]
    UserNotFound,

    /// Every compare-and-swap attempt lost to a concurrent writer.
    #[error("The record was modified concurrently, please retry")]
    Contention,

    /// Database failure.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Returns the violated unique index when `err` is a unique violation.
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => Some(detail),
        _ => None,
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Loan(e) => e.into(),
            RepositoryError::LoanRequest(e) => e.into(),
            RepositoryError::Interest(e) => e.into(),
            RepositoryError::UserNotFound => Self::NotFound("User not found".to_string()),
            RepositoryError::Contention => Self::Conflict(CONTENTION_MESSAGE.to_string()),
            RepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_keep_their_mapping() {
        let app = AppError::from(RepositoryError::from(LoanError::ActiveLoanExists));
        assert!(matches!(app, AppError::Conflict(_)));

        let app = AppError::from(RepositoryError::from(LoanRequestError::NotFound));
        assert_eq!(app.status_code(), 404);
    }

    #[test]
    fn test_database_errors_are_hidden() {
        let app = AppError::from(RepositoryError::Database(DbErr::Custom(
            "connection reset".to_string(),
        )));
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.public_message(), loandesk_shared::error::INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_contention_is_a_client_conflict() {
        let app = AppError::from(RepositoryError::Contention);
        assert_eq!(app.status_code(), 400);
    }

    #[test]
    fn test_non_sql_errors_are_not_unique_violations() {
        assert!(unique_violation(&DbErr::Custom("x".to_string())).is_none());
    }
}

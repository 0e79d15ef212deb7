//! Loan accounts.
//!
//! This module implements the direct-balance loan model:
//! - Opening an account with derived totals
//! - Applying repayments (months covered, balance, principal drawdown)
//! - Eligibility checks for new loans
//! - Repayment slip records
//! - Admin summaries

pub mod account;
pub mod eligibility;
pub mod error;
pub mod repayment;
pub mod slip;
pub mod summary;
pub mod types;

#[cfg(test)]
mod repayment_props;

pub use account::{LoanService, MAX_AMOUNT, TakeLoanInput};
pub use eligibility::{CurrentLoanBrief, LoanEligibility, LoanOffer};
pub use error::LoanError;
pub use repayment::{RepaymentEngine, RepaymentOutcome};
pub use summary::LoanSummary;
pub use types::{LoanAccount, LoanStatus, RepaymentSlip};

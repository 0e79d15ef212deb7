//! Repository layer for database operations.
//!
//! Repositories load rows, hand them to the core crate for every decision,
//! and persist the result.

pub mod error;
pub mod interest_rate;
pub mod loan;
pub mod loan_request;
pub mod repayment_slip;
pub mod statistics;
pub mod user;

pub use error::{MAX_UPDATE_ATTEMPTS, RepositoryError};
pub use interest_rate::InterestRateRepository;
pub use loan::{ActiveLoanRow, LoanDetails, LoanRepository};
pub use loan_request::{LoanRequestRepository, LoanRequestRow, generate_request_id};
pub use repayment_slip::RepaymentSlipRepository;
pub use statistics::StatisticsRepository;
pub use user::{BorrowerIdentity, NewUser, UserRepository};

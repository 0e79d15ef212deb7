//! Core loan logic for Loandesk.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Every calculation and state rule lives here; callers pass in the records they
//! loaded and the current time, and persist whatever comes back.
//!
//! # Modules
//!
//! - `interest` - Rate resolution and rate-setting rules
//! - `loan` - Loan accounts, repayments, eligibility and repayment slips
//! - `request` - Loan request workflow and installment schedules
//! - `statistics` - Portfolio aggregates for the admin dashboard
//! - `borrower` - The borrower facts the rules depend on

pub mod borrower;
pub mod interest;
pub mod loan;
pub mod request;
pub mod statistics;

pub use borrower::Borrower;

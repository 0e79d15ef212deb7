//! Loan request workflow.
//!
//! # Modules
//!
//! - `types` - Request, installment and tenure types
//! - `error` - Workflow-specific error types
//! - `schedule` - Installment amounts and due dates
//! - `workflow` - Submission, status transitions and installment payments

pub mod error;
pub mod schedule;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod schedule_props;
#[cfg(test)]
mod workflow_props;

/// Longest accepted tenure, in tenure units.
pub const MAX_TENURE_VALUE: i32 = 360;

pub use error::LoanRequestError;
pub use schedule::{InstallmentSchedule, ScheduleEntry};
pub use types::{
    Installment, InstallmentStatus, LoanRequest, LoanRequestInput, LoanRequestStatus, TenureType,
};
pub use workflow::{InstallmentPayment, LoanRequestWorkflow, Submission};

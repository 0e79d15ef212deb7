//! Loan request domain types.

use chrono::{DateTime, Utc};
use loandesk_shared::types::{InstallmentId, LoanRequestId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit a tenure is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenureType {
    /// Calendar days.
    Days,
    /// Calendar months.
    Months,
    /// Calendar years.
    Years,
}

impl TenureType {
    /// Returns the string representation of the unit.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Months => "months",
            Self::Years => "years",
        }
    }

    /// Parses a unit from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "days" => Some(Self::Days),
            "months" => Some(Self::Months),
            "years" => Some(Self::Years),
            _ => None,
        }
    }
}

impl fmt::Display for TenureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loan request status.
///
/// The legal transitions are:
/// - Pending → Approved
/// - Pending → Rejected
/// - Approved → Completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanRequestStatus {
    /// Awaiting an admin decision.
    Pending,
    /// Approved and being repaid.
    Approved,
    /// Declined.
    Rejected,
    /// Fully repaid.
    Completed,
}

impl LoanRequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Returns true for statuses that block a new request.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Returns true for statuses with no way out.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }
}

impl fmt::Display for LoanRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Installment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    /// Not paid yet.
    Pending,
    /// Paid.
    Paid,
}

impl InstallmentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

/// A pre-disbursement loan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    /// Internal ID.
    pub id: LoanRequestId,
    /// Six-digit display number.
    pub request_id: String,
    /// Borrower.
    pub user_id: UserId,
    /// Principal asked for.
    pub requested_amount: Decimal,
    /// Rate copied from the borrower's effective rate at submission.
    pub interest_rate: Decimal,
    /// Tenure unit.
    pub tenure_type: TenureType,
    /// Tenure length in `tenure_type` units; also the installment count.
    pub tenure_value: i32,
    /// Principal plus interest, rounded to cents.
    pub total_payable_amount: Decimal,
    /// Sum of paid installments.
    pub total_paid_amount: Decimal,
    /// Amount still owed.
    pub remaining_balance: Decimal,
    /// Borrower's credit limit at submission.
    pub available_amount: Decimal,
    /// Current status.
    pub status: LoanRequestStatus,
    /// Set on approval.
    pub approved_at: Option<DateTime<Utc>>,
    /// Set on rejection.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Set on completion.
    pub completed_at: Option<DateTime<Utc>>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

/// One scheduled installment of a loan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    /// Installment ID.
    pub id: InstallmentId,
    /// Owning request.
    pub loan_request_id: LoanRequestId,
    /// Borrower.
    pub user_id: UserId,
    /// Zero-based position in the schedule.
    pub sequence: i32,
    /// Amount due.
    pub amount: Decimal,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Current status.
    pub status: InstallmentStatus,
    /// When it was paid.
    pub paid_at: Option<DateTime<Utc>>,
}

/// Input for a new loan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanRequestInput {
    /// Principal asked for.
    pub amount: Decimal,
    /// Tenure unit.
    pub tenure_type: TenureType,
    /// Tenure length.
    pub tenure_value: i32,
}

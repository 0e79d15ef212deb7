//! Portfolio statistics for the admin dashboard.
//!
//! Aggregates are recomputed from the underlying rows on every call; they are
//! consistent with whatever snapshot of rows the caller loaded.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::loan::LoanStatus;
use crate::request::{InstallmentStatus, LoanRequestStatus};

/// The loan columns the statistics read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanFigures {
    /// Status.
    pub status: LoanStatus,
    /// Principal.
    pub amount: Decimal,
    /// Principal not yet consumed.
    pub available_amount: Decimal,
}

/// The loan request columns the statistics read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestFigures {
    /// Status.
    pub status: LoanRequestStatus,
    /// Principal asked for.
    pub requested_amount: Decimal,
}

/// The installment columns the statistics read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallmentFigures {
    /// Status.
    pub status: InstallmentStatus,
    /// Amount due.
    pub amount: Decimal,
}

/// Loan counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoanCounts {
    /// Active loans.
    pub active: u64,
    /// Completed loans.
    pub completed: u64,
    /// All loans.
    pub total: u64,
}

/// Loan amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanAmounts {
    /// Principal of active loans.
    pub total_active_loan_amount: Decimal,
    /// Unconsumed principal of active loans.
    pub total_active_available_amount: Decimal,
    /// Principal of completed loans.
    pub total_completed_loan_amount: Decimal,
    /// Sum of uploaded slips.
    pub total_repayment_amount: Decimal,
    /// Principal of all loans.
    pub total_loan_amount: Decimal,
}

/// Repayment slip totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlipTotals {
    /// Number of slips.
    pub total_slips: u64,
    /// Sum of slip amounts.
    pub total_amount: Decimal,
}

/// Loan request counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCounts {
    /// Pending requests.
    pub pending: u64,
    /// Approved requests.
    pub approved: u64,
    /// Rejected requests.
    pub rejected: u64,
    /// Completed requests.
    pub completed: u64,
    /// All requests.
    pub total: u64,
    /// Principal asked for across approved and completed requests.
    pub total_disbursed_amount: Decimal,
}

/// Installment totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentTotals {
    /// All installments.
    pub total: u64,
    /// Paid installments.
    pub paid: u64,
    /// Pending installments.
    pub pending: u64,
    /// Sum of paid installments.
    pub paid_amount: Decimal,
    /// Sum of pending installments.
    pub outstanding_amount: Decimal,
}

/// Portfolio statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanStatistics {
    /// Loan counts.
    pub loans: LoanCounts,
    /// Loan amounts.
    pub amounts: LoanAmounts,
    /// Latest global rate, zero when none has been set.
    pub global_interest_rate: Decimal,
    /// Slip totals.
    pub repayments: SlipTotals,
    /// Request counts.
    pub loan_requests: RequestCounts,
    /// Installment totals.
    pub installments: InstallmentTotals,
}

impl LoanStatistics {
    /// Computes statistics from loaded rows.
    #[must_use]
    pub fn compute(
        loans: &[LoanFigures],
        requests: &[RequestFigures],
        installments: &[InstallmentFigures],
        slip_amounts: &[Decimal],
        latest_global_rate: Option<Decimal>,
    ) -> Self {
        let mut stats = Self {
            global_interest_rate: latest_global_rate.unwrap_or(Decimal::ZERO),
            ..Self::default()
        };

        for loan in loans {
            stats.loans.total += 1;
            match loan.status {
                LoanStatus::Active => {
                    stats.loans.active += 1;
                    stats.amounts.total_active_loan_amount += loan.amount;
                    stats.amounts.total_active_available_amount += loan.available_amount;
                }
                LoanStatus::Completed => {
                    stats.loans.completed += 1;
                    stats.amounts.total_completed_loan_amount += loan.amount;
                }
            }
        }
        stats.amounts.total_loan_amount =
            stats.amounts.total_active_loan_amount + stats.amounts.total_completed_loan_amount;

        stats.repayments.total_slips = slip_amounts.len() as u64;
        stats.repayments.total_amount = slip_amounts.iter().copied().sum();
        stats.amounts.total_repayment_amount = stats.repayments.total_amount;

        for request in requests {
            let counts = &mut stats.loan_requests;
            counts.total += 1;
            match request.status {
                LoanRequestStatus::Pending => counts.pending += 1,
                LoanRequestStatus::Approved => counts.approved += 1,
                LoanRequestStatus::Rejected => counts.rejected += 1,
                LoanRequestStatus::Completed => counts.completed += 1,
            }
            if matches!(
                request.status,
                LoanRequestStatus::Approved | LoanRequestStatus::Completed
            ) {
                counts.total_disbursed_amount += request.requested_amount;
            }
        }

        for installment in installments {
            let totals = &mut stats.installments;
            totals.total += 1;
            match installment.status {
                InstallmentStatus::Paid => {
                    totals.paid += 1;
                    totals.paid_amount += installment.amount;
                }
                InstallmentStatus::Pending => {
                    totals.pending += 1;
                    totals.outstanding_amount += installment.amount;
                }
            }
        }

        stats
    }
}

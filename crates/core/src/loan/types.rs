//! Loan account domain types.

use chrono::{DateTime, Utc};
use loandesk_shared::types::{LoanId, RepaymentSlipId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Loan account status.
///
/// `Active → Completed` is the only transition, and it is irreversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Being repaid.
    Active,
    /// Fully repaid.
    Completed,
}

impl LoanStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One borrower's loan.
///
/// `amount`, `interest_rate`, `total_months` and `total_payable` are fixed at
/// creation. Balances only move through the repayment engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanAccount {
    /// Loan ID.
    pub id: LoanId,
    /// Borrower.
    pub user_id: UserId,
    /// Principal.
    pub amount: Decimal,
    /// Principal not yet consumed by repayments.
    pub available_amount: Decimal,
    /// Term length in months.
    pub total_months: i32,
    /// Months covered by repayments so far.
    pub paid_months: i32,
    /// Simple-interest percentage.
    pub interest_rate: Decimal,
    /// Principal plus interest for the full term.
    pub total_payable: Decimal,
    /// Amount still owed.
    pub remaining_balance: Decimal,
    /// Cumulative repayments.
    pub total_amount_paid: Decimal,
    /// Current status.
    pub status: LoanStatus,
    /// When the loan was taken.
    pub start_date: DateTime<Utc>,
    /// When the loan was fully repaid.
    pub completion_date: Option<DateTime<Utc>>,
}

impl LoanAccount {
    /// Total payable under simple interest: `principal + principal * rate / 100`.
    #[must_use]
    pub fn total_payable_for(principal: Decimal, rate: Decimal) -> Decimal {
        principal + principal * rate / Decimal::ONE_HUNDRED
    }

    /// The scheduled monthly installment, `total_payable / total_months`.
    ///
    /// Returns `None` for a zero-month term.
    #[must_use]
    pub fn monthly_installment(&self) -> Option<Decimal> {
        self.total_payable.checked_div(Decimal::from(self.total_months))
    }

    /// Months still to be covered.
    #[must_use]
    pub fn remaining_months(&self) -> i32 {
        (self.total_months - self.paid_months).max(0)
    }

    /// Returns true once fully repaid.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.status, LoanStatus::Completed)
    }
}

/// A manually uploaded repayment reference.
///
/// Slips are informational; they never move loan balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepaymentSlip {
    /// Slip ID.
    pub id: RepaymentSlipId,
    /// Loan the slip is for.
    pub loan_id: LoanId,
    /// Uploader.
    pub user_id: UserId,
    /// Amount the borrower says they paid.
    pub amount: Decimal,
    /// Where the slip image lives.
    pub slip_url: String,
    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_round_trip() {
        for status in [LoanStatus::Active, LoanStatus::Completed] {
            assert_eq!(LoanStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LoanStatus::parse("pending"), None);
    }

    #[test]
    fn test_total_payable_for() {
        assert_eq!(LoanAccount::total_payable_for(dec!(1000), dec!(10)), dec!(1100));
        assert_eq!(LoanAccount::total_payable_for(dec!(2500), dec!(0)), dec!(2500));
        assert_eq!(
            LoanAccount::total_payable_for(dec!(1234.56), dec!(7.5)),
            dec!(1327.152)
        );
    }
}

//! Derived loan summaries for the admin views.

use chrono::{DateTime, Utc};
use loandesk_shared::types::{LoanId, UserId, round_money};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::loan::types::LoanAccount;

/// A loan with its derived repayment figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    /// Loan ID.
    pub id: LoanId,
    /// Borrower.
    pub user_id: UserId,
    /// Principal.
    pub total_amount_taken: Decimal,
    /// Principal not yet consumed.
    pub available_amount: Decimal,
    /// Cumulative repayments.
    pub total_amount_paid: Decimal,
    /// Principal plus interest.
    pub total_with_interest: Decimal,
    /// Scheduled monthly payment, rounded to cents.
    pub monthly_payment: Decimal,
    /// Months covered.
    pub paid_months: i32,
    /// Months still to be covered.
    pub remaining_months: i32,
    /// Simple-interest percentage.
    pub interest_rate: Decimal,
    /// Term length in months.
    pub total_months: i32,
    /// When the loan was taken.
    pub start_date: DateTime<Utc>,
    /// When the loan was fully repaid.
    pub completion_date: Option<DateTime<Utc>>,
}

impl From<&LoanAccount> for LoanSummary {
    fn from(loan: &LoanAccount) -> Self {
        let remaining_months = if loan.is_completed() {
            0
        } else {
            loan.remaining_months()
        };

        Self {
            id: loan.id,
            user_id: loan.user_id,
            total_amount_taken: loan.amount,
            available_amount: loan.available_amount,
            total_amount_paid: loan.total_amount_paid,
            total_with_interest: loan.total_payable,
            monthly_payment: loan
                .monthly_installment()
                .map_or(Decimal::ZERO, round_money),
            paid_months: loan.paid_months,
            remaining_months,
            interest_rate: loan.interest_rate,
            total_months: loan.total_months,
            start_date: loan.start_date,
            completion_date: loan.completion_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::repayment::RepaymentEngine;
    use crate::loan::types::LoanStatus;
    use rust_decimal_macros::dec;

    fn loan() -> LoanAccount {
        let total = LoanAccount::total_payable_for(dec!(1000), dec!(10));
        LoanAccount {
            id: LoanId::new(),
            user_id: UserId::new(),
            amount: dec!(1000),
            available_amount: dec!(1000),
            total_months: 3,
            paid_months: 0,
            interest_rate: dec!(10),
            total_payable: total,
            remaining_balance: total,
            total_amount_paid: Decimal::ZERO,
            status: LoanStatus::Active,
            start_date: Utc::now(),
            completion_date: None,
        }
    }

    #[test]
    fn test_summary_rounds_monthly_payment() {
        let summary = LoanSummary::from(&loan());
        assert_eq!(summary.total_with_interest, dec!(1100));
        assert_eq!(summary.monthly_payment, dec!(366.67));
        assert_eq!(summary.remaining_months, 3);
    }

    #[test]
    fn test_summary_after_repayment() {
        let account = loan();
        let paid = RepaymentEngine::apply_payment(&account, account.user_id, dec!(366.67), Utc::now())
            .unwrap()
            .account;
        let summary = LoanSummary::from(&paid);
        assert_eq!(summary.paid_months, 1);
        assert_eq!(summary.remaining_months, 2);
        assert_eq!(summary.total_amount_paid, dec!(366.67));
    }
}

//! Repayment engine for loan accounts.
//!
//! A payment is split three ways: it reduces the balance owed, it covers
//! zero or more whole months, and its principal share draws down
//! `available_amount`. Completion forces every counter to its final value.

use chrono::{DateTime, Utc};
use loandesk_shared::types::UserId;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::loan::account::check_amount;
use crate::loan::error::LoanError;
use crate::loan::types::{LoanAccount, LoanStatus};

/// Result of applying one payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepaymentOutcome {
    /// The account after the payment.
    pub account: LoanAccount,
    /// Whole months this payment covered.
    pub months_covered: i32,
    /// Principal share of the payment.
    pub principal_payment: Decimal,
    /// Whether this payment completed the loan.
    pub completed: bool,
}

/// Stateless repayment rules.
pub struct RepaymentEngine;

impl RepaymentEngine {
    /// Whole months covered by `amount`: `floor(amount / monthly_installment)`.
    ///
    /// Saturates at `i32::MAX`; partial months never round up.
    #[must_use]
    pub fn months_covered(account: &LoanAccount, amount: Decimal) -> i32 {
        let Some(monthly) = account.monthly_installment().filter(|m| !m.is_zero()) else {
            return 0;
        };
        amount
            .checked_div(monthly)
            .map_or(i32::MAX, |months| months.floor().to_i32().unwrap_or(i32::MAX))
    }

    /// Principal share of a payment: `amount / total_payable * principal`.
    #[must_use]
    pub fn principal_share(account: &LoanAccount, amount: Decimal) -> Decimal {
        if account.total_payable.is_zero() {
            return account.amount;
        }
        amount
            .checked_mul(account.amount)
            .and_then(|v| v.checked_div(account.total_payable))
            .unwrap_or(account.amount)
    }

    /// Applies a payment of `amount` from `requester`.
    ///
    /// The input account is not modified; the updated copy is returned so the
    /// caller can persist it with a version check.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` / `AmountTooLarge` for a bad amount
    /// - `NotOwner` when `requester` does not own the loan
    /// - `AlreadyCompleted` when the loan is completed
    pub fn apply_payment(
        account: &LoanAccount,
        requester: UserId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<RepaymentOutcome, LoanError> {
        check_amount(amount)?;
        if account.user_id != requester {
            return Err(LoanError::NotOwner);
        }
        if account.is_completed() {
            return Err(LoanError::AlreadyCompleted);
        }

        let months_covered = Self::months_covered(account, amount);
        let principal_payment = Self::principal_share(account, amount);

        let mut next = account.clone();
        next.paid_months = next.paid_months.saturating_add(months_covered);
        next.remaining_balance -= amount;
        next.total_amount_paid += amount;
        next.available_amount = (next.available_amount - principal_payment).max(Decimal::ZERO);

        let completed = next.remaining_balance <= Decimal::ZERO;
        if completed {
            next.remaining_balance = Decimal::ZERO;
            next.available_amount = Decimal::ZERO;
            next.paid_months = next.total_months;
            next.status = LoanStatus::Completed;
            next.completion_date = Some(now);
        } else if next.paid_months > next.total_months {
            next.paid_months = next.total_months;
        }

        Ok(RepaymentOutcome {
            account: next,
            months_covered,
            principal_payment,
            completed,
        })
    }
}

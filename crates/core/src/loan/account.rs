//! Opening loan accounts.

use chrono::{DateTime, Utc};
use loandesk_shared::types::LoanId;
use rust_decimal::Decimal;

use crate::borrower::Borrower;
use crate::interest::InterestPolicy;
use crate::loan::error::LoanError;
use crate::loan::types::{LoanAccount, LoanStatus};

/// Largest principal or repayment accepted in a single operation.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Input for taking a new loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TakeLoanInput {
    /// Principal.
    pub amount: Decimal,
    /// Term length in months.
    pub total_months: i32,
}

/// Validates an amount against `(0, MAX_AMOUNT]`.
pub(crate) fn check_amount(amount: Decimal) -> Result<(), LoanError> {
    if amount <= Decimal::ZERO {
        return Err(LoanError::InvalidAmount);
    }
    if amount > MAX_AMOUNT {
        return Err(LoanError::AmountTooLarge);
    }
    Ok(())
}

impl LoanAccount {
    /// Builds a fresh active account with every derived field populated.
    ///
    /// `remaining_balance` starts at `total_payable` and `available_amount`
    /// at the principal.
    pub fn open(
        borrower: &Borrower,
        input: TakeLoanInput,
        rate: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Self, LoanError> {
        check_amount(input.amount)?;
        if input.total_months <= 0 {
            return Err(LoanError::InvalidTerm);
        }

        let total_payable = Self::total_payable_for(input.amount, rate);

        Ok(Self {
            id: LoanId::new(),
            user_id: borrower.id,
            amount: input.amount,
            available_amount: input.amount,
            total_months: input.total_months,
            paid_months: 0,
            interest_rate: rate,
            total_payable,
            remaining_balance: total_payable,
            total_amount_paid: Decimal::ZERO,
            status: LoanStatus::Active,
            start_date: now,
            completion_date: None,
        })
    }
}

/// Stateless rules for taking a loan.
pub struct LoanService;

impl LoanService {
    /// Takes a loan for `borrower`.
    ///
    /// `active_loan` is the borrower's current active loan, if any, and
    /// `latest_global_rate` the newest entry of the global rate log.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` / `AmountTooLarge` / `InvalidTerm` for bad input
    /// - `ProfileIncomplete` when the profile is not complete
    /// - `ActiveLoanExists` when an active loan already exists
    pub fn take_loan(
        borrower: &Borrower,
        active_loan: Option<&LoanAccount>,
        input: TakeLoanInput,
        latest_global_rate: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> Result<LoanAccount, LoanError> {
        check_amount(input.amount)?;
        if input.total_months <= 0 {
            return Err(LoanError::InvalidTerm);
        }
        if !borrower.profile_completed {
            return Err(LoanError::ProfileIncomplete);
        }
        if active_loan.is_some_and(|loan| !loan.is_completed()) {
            return Err(LoanError::ActiveLoanExists);
        }

        let rate = InterestPolicy::resolve_rate(borrower.interest_rate, latest_global_rate).rate;
        LoanAccount::open(borrower, input, rate, now)
    }
}

//! Recording uploaded repayment slips.

use chrono::{DateTime, Utc};
use loandesk_shared::types::{RepaymentSlipId, UserId};
use rust_decimal::Decimal;

use crate::loan::account::check_amount;
use crate::loan::error::LoanError;
use crate::loan::types::{LoanAccount, RepaymentSlip};

impl RepaymentSlip {
    /// Records a slip for `loan` uploaded by `requester`.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` / `AmountTooLarge` for a bad amount
    /// - `SlipUrlRequired` for a blank reference
    /// - `NotOwner` when `requester` does not own the loan
    pub fn record(
        loan: &LoanAccount,
        requester: UserId,
        amount: Decimal,
        slip_url: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, LoanError> {
        check_amount(amount)?;
        let slip_url = slip_url.trim();
        if slip_url.is_empty() {
            return Err(LoanError::SlipUrlRequired);
        }
        if loan.user_id != requester {
            return Err(LoanError::NotOwner);
        }

        Ok(Self {
            id: RepaymentSlipId::new(),
            loan_id: loan.id,
            user_id: requester,
            amount,
            slip_url: slip_url.to_string(),
            uploaded_at: now,
        })
    }
}

//! Loan request workflow.
//!
//! Submission computes the payable total and the installment schedule in one
//! step; admins then move the request through an explicit transition table,
//! and borrowers pay installments until the request completes.

use chrono::{DateTime, Utc};
use loandesk_shared::types::{InstallmentId, LoanRequestId, UserId, round_money};
use rust_decimal::Decimal;

use crate::borrower::Borrower;
use crate::interest::InterestPolicy;
use crate::loan::MAX_AMOUNT;
use crate::request::MAX_TENURE_VALUE;
use crate::request::error::LoanRequestError;
use crate::request::schedule::InstallmentSchedule;
use crate::request::types::{
    Installment, InstallmentStatus, LoanRequest, LoanRequestInput, LoanRequestStatus,
};

/// A new request together with its schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// The request.
    pub request: LoanRequest,
    /// Its installments, in due order.
    pub installments: Vec<Installment>,
}

/// Result of paying one installment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentPayment {
    /// The request after the payment.
    pub request: LoanRequest,
    /// The installment after the payment.
    pub installment: Installment,
    /// Whether this payment completed the request.
    pub completed: bool,
}

/// Stateless service for loan request transitions.
pub struct LoanRequestWorkflow;

impl LoanRequestWorkflow {
    /// Total payable for a request, rounded to cents.
    #[must_use]
    pub fn total_payable(amount: Decimal, rate: Decimal) -> Decimal {
        round_money(amount + amount * rate / Decimal::ONE_HUNDRED)
    }

    /// Validates the request body.
    pub fn validate_input(input: &LoanRequestInput) -> Result<(), LoanRequestError> {
        if input.amount <= Decimal::ZERO || input.amount > MAX_AMOUNT {
            return Err(LoanRequestError::InvalidAmount);
        }
        if !(1..=MAX_TENURE_VALUE).contains(&input.tenure_value) {
            return Err(LoanRequestError::InvalidTenure {
                max: MAX_TENURE_VALUE,
            });
        }
        Ok(())
    }

    /// Submits a new request.
    ///
    /// Every check runs before anything is built, so a rejected submission
    /// never yields a schedule.
    ///
    /// # Arguments
    /// * `borrower` - The requesting borrower
    /// * `open_request` - The borrower's pending or approved request, if any
    /// * `input` - Amount and tenure
    /// * `latest_global_rate` - Newest global rate, if any
    /// * `request_id` - Six-digit display number
    /// * `now` - Submission time; the first installment falls due then
    ///
    /// # Errors
    /// * `InvalidAmount` / `InvalidTenure` for bad input
    /// * `OpenRequestExists` when a pending or approved request exists
    /// * `ExceedsLoanLimit` when the amount is above the borrower's limit
    pub fn submit(
        borrower: &Borrower,
        open_request: Option<&LoanRequest>,
        input: LoanRequestInput,
        latest_global_rate: Option<Decimal>,
        request_id: String,
        now: DateTime<Utc>,
    ) -> Result<Submission, LoanRequestError> {
        Self::validate_input(&input)?;

        if open_request.is_some_and(|r| r.status.is_open()) {
            return Err(LoanRequestError::OpenRequestExists);
        }
        if input.amount > borrower.loan_limit {
            return Err(LoanRequestError::ExceedsLoanLimit {
                requested: input.amount,
                limit: borrower.loan_limit,
            });
        }

        let rate = InterestPolicy::resolve_rate(borrower.interest_rate, latest_global_rate).rate;
        let total = Self::total_payable(input.amount, rate);
        let schedule =
            InstallmentSchedule::generate(total, input.tenure_type, input.tenure_value, now)?;

        let request = LoanRequest {
            id: LoanRequestId::new(),
            request_id,
            user_id: borrower.id,
            requested_amount: input.amount,
            interest_rate: rate,
            tenure_type: input.tenure_type,
            tenure_value: input.tenure_value,
            total_payable_amount: total,
            total_paid_amount: Decimal::ZERO,
            remaining_balance: total,
            available_amount: borrower.loan_limit,
            status: LoanRequestStatus::Pending,
            approved_at: None,
            rejected_at: None,
            completed_at: None,
            created_at: now,
        };

        let installments = schedule
            .into_iter()
            .map(|entry| Installment {
                id: InstallmentId::new(),
                loan_request_id: request.id,
                user_id: borrower.id,
                sequence: entry.sequence,
                amount: entry.amount,
                due_date: entry.due_date,
                status: InstallmentStatus::Pending,
                paid_at: None,
            })
            .collect();

        Ok(Submission {
            request,
            installments,
        })
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved
    /// - Pending → Rejected
    /// - Approved → Completed
    #[must_use]
    pub fn is_valid_transition(from: LoanRequestStatus, to: LoanRequestStatus) -> bool {
        matches!(
            (from, to),
            (
                LoanRequestStatus::Pending,
                LoanRequestStatus::Approved | LoanRequestStatus::Rejected
            ) | (LoanRequestStatus::Approved, LoanRequestStatus::Completed)
        )
    }

    /// Moves `request` to `to`, stamping the matching timestamp.
    ///
    /// # Errors
    /// * `InvalidTransition` when the pair is not in the table
    pub fn transition(
        request: &LoanRequest,
        to: LoanRequestStatus,
        now: DateTime<Utc>,
    ) -> Result<LoanRequest, LoanRequestError> {
        if !Self::is_valid_transition(request.status, to) {
            return Err(LoanRequestError::InvalidTransition {
                from: request.status,
                to,
            });
        }

        let mut next = request.clone();
        next.status = to;
        match to {
            LoanRequestStatus::Approved => next.approved_at = Some(now),
            LoanRequestStatus::Rejected => next.rejected_at = Some(now),
            LoanRequestStatus::Completed => next.completed_at = Some(now),
            LoanRequestStatus::Pending => {}
        }
        Ok(next)
    }

    /// Owners and admins may read a request's schedule.
    pub fn ensure_can_view(
        request: &LoanRequest,
        requester: UserId,
        is_admin: bool,
    ) -> Result<(), LoanRequestError> {
        if is_admin || request.user_id == requester {
            Ok(())
        } else {
            Err(LoanRequestError::NotOwner)
        }
    }

    /// Pays one installment.
    ///
    /// `other_pending` is the number of pending installments on the request
    /// besides this one; when it is zero the request completes.
    ///
    /// # Errors
    /// * `InstallmentNotFound` when the installment belongs elsewhere
    /// * `NotOwner` when `requester` does not own the request
    /// * `NotApproved` unless the request is approved
    /// * `InstallmentAlreadyPaid` unless the installment is pending
    pub fn pay_installment(
        request: &LoanRequest,
        installment: &Installment,
        requester: UserId,
        other_pending: u64,
        now: DateTime<Utc>,
    ) -> Result<InstallmentPayment, LoanRequestError> {
        if installment.loan_request_id != request.id {
            return Err(LoanRequestError::InstallmentNotFound);
        }
        if request.user_id != requester {
            return Err(LoanRequestError::NotOwner);
        }
        if request.status != LoanRequestStatus::Approved {
            return Err(LoanRequestError::NotApproved(request.status));
        }
        if installment.status != InstallmentStatus::Pending {
            return Err(LoanRequestError::InstallmentAlreadyPaid);
        }

        let mut paid = installment.clone();
        paid.status = InstallmentStatus::Paid;
        paid.paid_at = Some(now);

        let mut next = request.clone();
        next.total_paid_amount += installment.amount;
        next.remaining_balance = (next.remaining_balance - installment.amount).max(Decimal::ZERO);

        let completed = other_pending == 0;
        if completed {
            next = Self::transition(&next, LoanRequestStatus::Completed, now)?;
        }

        Ok(InstallmentPayment {
            request: next,
            installment: paid,
            completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::borrower::DEFAULT_LOAN_LIMIT;
    use crate::request::types::TenureType;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn borrower() -> Borrower {
        Borrower {
            id: UserId::new(),
            email: "req@example.com".to_string(),
            full_name: Some("Req Borrower".to_string()),
            email_verified: true,
            profile_completed: true,
            loan_limit: DEFAULT_LOAN_LIMIT,
            interest_rate: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 15, 8, 30, 0).unwrap()
    }

    fn input(amount: Decimal, tenure_value: i32) -> LoanRequestInput {
        LoanRequestInput {
            amount,
            tenure_type: TenureType::Months,
            tenure_value,
        }
    }

    fn submit(borrower: &Borrower, amount: Decimal, tenure: i32) -> Submission {
        LoanRequestWorkflow::submit(
            borrower,
            None,
            input(amount, tenure),
            Some(dec!(10)),
            "123456".to_string(),
            now(),
        )
        .unwrap()
    }

    #[test]
    fn test_submit_builds_request_and_schedule() {
        let borrower = borrower();
        let submission = submit(&borrower, dec!(1000), 3);

        let request = &submission.request;
        assert_eq!(request.status, LoanRequestStatus::Pending);
        assert_eq!(request.interest_rate, dec!(10));
        assert_eq!(request.total_payable_amount, dec!(1100));
        assert_eq!(request.remaining_balance, dec!(1100));
        assert_eq!(request.available_amount, DEFAULT_LOAN_LIMIT);
        assert_eq!(request.request_id, "123456");

        assert_eq!(submission.installments.len(), 3);
        assert!(submission.installments.iter().all(|i| i.loan_request_id == request.id));
        let sum: Decimal = submission.installments.iter().map(|i| i.amount).sum();
        assert_eq!(sum, dec!(1100));
    }

    #[test]
    fn test_submit_over_limit_rejected() {
        let result = LoanRequestWorkflow::submit(
            &borrower(),
            None,
            input(dec!(6000), 6),
            None,
            "123456".to_string(),
            now(),
        );
        assert!(matches!(result, Err(LoanRequestError::ExceedsLoanLimit { .. })));
    }

    #[test]
    fn test_open_request_blocks_but_rejected_does_not() {
        let borrower = borrower();
        let first = submit(&borrower, dec!(1000), 3).request;

        let blocked = LoanRequestWorkflow::submit(
            &borrower,
            Some(&first),
            input(dec!(500), 2),
            None,
            "654321".to_string(),
            now(),
        );
        assert_eq!(blocked, Err(LoanRequestError::OpenRequestExists));

        let rejected = LoanRequestWorkflow::transition(&first, LoanRequestStatus::Rejected, now()).unwrap();
        assert!(
            LoanRequestWorkflow::submit(
                &borrower,
                Some(&rejected),
                input(dec!(500), 2),
                None,
                "654321".to_string(),
                now(),
            )
            .is_ok()
        );
    }

    #[test]
    fn test_validate_input() {
        assert_eq!(
            LoanRequestWorkflow::validate_input(&input(dec!(0), 3)),
            Err(LoanRequestError::InvalidAmount)
        );
        assert_eq!(
            LoanRequestWorkflow::validate_input(&input(dec!(10), 0)),
            Err(LoanRequestError::InvalidTenure { max: 360 })
        );
        assert_eq!(
            LoanRequestWorkflow::validate_input(&input(dec!(10), 361)),
            Err(LoanRequestError::InvalidTenure { max: 360 })
        );
        assert!(LoanRequestWorkflow::validate_input(&input(dec!(10), 360)).is_ok());
    }

    #[test]
    fn test_transition_table() {
        use LoanRequestStatus::{Approved, Completed, Pending, Rejected};
        let all = [Pending, Approved, Rejected, Completed];
        let allowed = [(Pending, Approved), (Pending, Rejected), (Approved, Completed)];

        for from in all {
            for to in all {
                assert_eq!(
                    LoanRequestWorkflow::is_valid_transition(from, to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_transition_stamps_timestamps() {
        let request = submit(&borrower(), dec!(1000), 3).request;

        let approved = LoanRequestWorkflow::transition(&request, LoanRequestStatus::Approved, now()).unwrap();
        assert_eq!(approved.approved_at, Some(now()));
        assert!(approved.rejected_at.is_none());

        let err = LoanRequestWorkflow::transition(&approved, LoanRequestStatus::Pending, now()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_pay_installments_until_completion() {
        let borrower = borrower();
        let submission = submit(&borrower, dec!(1000), 3);
        let mut request =
            LoanRequestWorkflow::transition(&submission.request, LoanRequestStatus::Approved, now()).unwrap();

        let count = submission.installments.len() as u64;
        for (paid_so_far, installment) in submission.installments.iter().enumerate() {
            let other_pending = count - paid_so_far as u64 - 1;
            let payment =
                LoanRequestWorkflow::pay_installment(&request, installment, borrower.id, other_pending, now())
                    .unwrap();
            assert_eq!(payment.installment.status, InstallmentStatus::Paid);
            assert_eq!(payment.completed, other_pending == 0);
            request = payment.request;
        }

        assert_eq!(request.status, LoanRequestStatus::Completed);
        assert_eq!(request.completed_at, Some(now()));
        assert_eq!(request.total_paid_amount, dec!(1100));
        assert_eq!(request.remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_pay_installment_guards() {
        let borrower = borrower();
        let submission = submit(&borrower, dec!(1000), 3);
        let installment = &submission.installments[0];

        assert_eq!(
            LoanRequestWorkflow::pay_installment(&submission.request, installment, borrower.id, 2, now()),
            Err(LoanRequestError::NotApproved(LoanRequestStatus::Pending))
        );

        let approved =
            LoanRequestWorkflow::transition(&submission.request, LoanRequestStatus::Approved, now()).unwrap();
        assert_eq!(
            LoanRequestWorkflow::pay_installment(&approved, installment, UserId::new(), 2, now()),
            Err(LoanRequestError::NotOwner)
        );

        let paid = LoanRequestWorkflow::pay_installment(&approved, installment, borrower.id, 2, now()).unwrap();
        assert_eq!(
            LoanRequestWorkflow::pay_installment(&paid.request, &paid.installment, borrower.id, 2, now()),
            Err(LoanRequestError::InstallmentAlreadyPaid)
        );

        let other = submit(&borrower, dec!(200), 2);
        assert_eq!(
            LoanRequestWorkflow::pay_installment(&approved, &other.installments[0], borrower.id, 1, now()),
            Err(LoanRequestError::InstallmentNotFound)
        );
    }

    #[test]
    fn test_view_permissions() {
        let borrower = borrower();
        let request = submit(&borrower, dec!(1000), 3).request;
        assert!(LoanRequestWorkflow::ensure_can_view(&request, borrower.id, false).is_ok());
        assert!(LoanRequestWorkflow::ensure_can_view(&request, UserId::new(), true).is_ok());
        assert_eq!(
            LoanRequestWorkflow::ensure_can_view(&request, UserId::new(), false),
            Err(LoanRequestError::NotOwner)
        );
    }
}

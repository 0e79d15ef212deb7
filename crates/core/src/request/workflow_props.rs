//! Property-based tests for LoanRequestWorkflow.

use chrono::Utc;
use loandesk_shared::types::{UserId, round_money};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LoanRequestError;
use super::types::{LoanRequestInput, LoanRequestStatus, TenureType};
use super::workflow::LoanRequestWorkflow;
use crate::borrower::Borrower;

fn arb_status() -> impl Strategy<Value = LoanRequestStatus> {
    prop_oneof![
        Just(LoanRequestStatus::Pending),
        Just(LoanRequestStatus::Approved),
        Just(LoanRequestStatus::Rejected),
        Just(LoanRequestStatus::Completed),
    ]
}

fn borrower(limit: Decimal) -> Borrower {
    Borrower {
        id: UserId::new(),
        email: "props@example.com".to_string(),
        full_name: None,
        email_verified: true,
        profile_completed: true,
        loan_limit: limit,
        interest_rate: None,
    }
}

fn input(amount: Decimal, tenure_value: i32) -> LoanRequestInput {
    LoanRequestInput {
        amount,
        tenure_type: TenureType::Months,
        tenure_value,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A pending or approved request blocks a new one; rejected and completed do not.
    #[test]
    fn prop_open_request_uniqueness(status in arb_status(), cents in 1i64..500_000) {
        let borrower = borrower(Decimal::new(5000, 0));
        let amount = Decimal::new(cents, 2);
        let mut existing = LoanRequestWorkflow::submit(
            &borrower, None, input(amount, 3), None, "100000".to_string(), Utc::now(),
        ).unwrap().request;
        existing.status = status;

        let second = LoanRequestWorkflow::submit(
            &borrower, Some(&existing), input(amount, 3), None, "100001".to_string(), Utc::now(),
        );
        if status.is_open() {
            prop_assert_eq!(second, Err(LoanRequestError::OpenRequestExists));
        } else {
            prop_assert!(second.is_ok());
        }
    }

    /// Amounts above the limit are rejected and no schedule is produced.
    #[test]
    fn prop_limit_enforced(limit in 1i64..10_000, over in 1i64..10_000, n in 1i32..=360) {
        let borrower = borrower(Decimal::new(limit, 0));
        let amount = Decimal::new(limit + over, 0);
        let result = LoanRequestWorkflow::submit(
            &borrower, None, input(amount, n), None, "100000".to_string(), Utc::now(),
        );
        let is_limit_error = matches!(result, Err(LoanRequestError::ExceedsLoanLimit { .. }));
        prop_assert!(is_limit_error);
    }

    /// totalPayableAmount = round(p + p*r/100) and the opening balance equals it.
    #[test]
    fn prop_total_payable(cents in 1i64..500_000, rate_bp in 1i64..=10_000, n in 1i32..=60) {
        let mut borrower = borrower(Decimal::new(5000, 0));
        let rate = Decimal::new(rate_bp, 2);
        borrower.interest_rate = Some(rate);
        let amount = Decimal::new(cents, 2);

        let submission = LoanRequestWorkflow::submit(
            &borrower, None, input(amount, n), None, "100000".to_string(), Utc::now(),
        ).unwrap();

        let expected = round_money(amount + amount * rate / Decimal::ONE_HUNDRED);
        prop_assert_eq!(submission.request.total_payable_amount, expected);
        prop_assert_eq!(submission.request.remaining_balance, expected);
        let sum: Decimal = submission.installments.iter().map(|i| i.amount).sum();
        prop_assert_eq!(sum, expected);
    }

    /// Transitions succeed exactly for the table entries and never mutate on failure.
    #[test]
    fn prop_transition_table(from in arb_status(), to in arb_status()) {
        let borrower = borrower(Decimal::new(5000, 0));
        let mut request = LoanRequestWorkflow::submit(
            &borrower, None, input(Decimal::new(100, 0), 1), None, "100000".to_string(), Utc::now(),
        ).unwrap().request;
        request.status = from;

        let result = LoanRequestWorkflow::transition(&request, to, Utc::now());
        if LoanRequestWorkflow::is_valid_transition(from, to) {
            prop_assert_eq!(result.unwrap().status, to);
        } else {
            prop_assert_eq!(result, Err(LoanRequestError::InvalidTransition { from, to }));
            prop_assert_eq!(request.status, from);
        }
        prop_assert!(!(from.is_terminal() && LoanRequestWorkflow::is_valid_transition(from, to)));
        prop_assert!(!LoanRequestWorkflow::is_valid_transition(from, from));
    }
}

//! Property-based tests for loan accounts and the repayment engine.

use chrono::{TimeZone, Utc};
use loandesk_shared::types::UserId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::account::TakeLoanInput;
use super::error::LoanError;
use super::repayment::RepaymentEngine;
use super::types::{LoanAccount, LoanStatus};
use crate::borrower::{Borrower, DEFAULT_LOAN_LIMIT};

/// Principal from 0.01 to 1,000,000.00.
fn principal() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Rates from 0.00 to 100.00.
fn rate() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|v| Decimal::new(v, 2))
}

fn months() -> impl Strategy<Value = i32> {
    1i32..=120
}

/// Payments from 0.01 to 50,000.00.
fn payments() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((1i64..5_000_000i64).prop_map(|c| Decimal::new(c, 2)), 1..30)
}

fn open(amount: Decimal, rate: Decimal, total_months: i32) -> LoanAccount {
    let borrower = Borrower {
        id: UserId::new(),
        email: "prop@example.com".to_string(),
        full_name: None,
        email_verified: true,
        profile_completed: true,
        loan_limit: DEFAULT_LOAN_LIMIT,
        interest_rate: None,
    };
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    LoanAccount::open(&borrower, TakeLoanInput { amount, total_months }, rate, now).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// totalPayable = p + p*r/100 and the opening balance equals it exactly.
    #[test]
    fn prop_opening_totals(p in principal(), r in rate(), n in months()) {
        let account = open(p, r, n);
        prop_assert_eq!(account.total_payable, p + p * r / Decimal::ONE_HUNDRED);
        prop_assert_eq!(account.remaining_balance, account.total_payable);
        prop_assert_eq!(account.available_amount, p);
        prop_assert_eq!(account.paid_months, 0);
    }

    /// Counters stay in range and move in one direction for any payment sequence.
    #[test]
    fn prop_balances_bounded(p in principal(), r in rate(), n in months(), pays in payments()) {
        let mut account = open(p, r, n);
        let now = Utc::now();

        for amount in pays {
            let before = account.clone();
            match RepaymentEngine::apply_payment(&account, account.user_id, amount, now) {
                Ok(outcome) => account = outcome.account,
                Err(err) => {
                    prop_assert_eq!(err, LoanError::AlreadyCompleted);
                    prop_assert!(before.is_completed());
                    continue;
                }
            }

            prop_assert!(account.paid_months >= 0 && account.paid_months <= account.total_months);
            prop_assert!(account.paid_months >= before.paid_months);
            prop_assert!(account.remaining_balance >= Decimal::ZERO);
            prop_assert!(account.remaining_balance <= before.remaining_balance);
            prop_assert!(account.available_amount >= Decimal::ZERO);
            prop_assert!(account.available_amount <= before.available_amount);
            prop_assert!(account.total_amount_paid > before.total_amount_paid);
            prop_assert_eq!(
                account.status == LoanStatus::Completed,
                account.remaining_balance.is_zero()
            );
        }
    }

    /// Completion forces every counter together and is final.
    #[test]
    fn prop_completion_is_final(p in principal(), r in rate(), n in months(), extra in 0i64..1_000_000) {
        let account = open(p, r, n);
        let payoff = account.total_payable + Decimal::new(extra, 2);
        let done = RepaymentEngine::apply_payment(&account, account.user_id, payoff, Utc::now())
            .unwrap()
            .account;

        prop_assert_eq!(done.status, LoanStatus::Completed);
        prop_assert_eq!(done.remaining_balance, Decimal::ZERO);
        prop_assert_eq!(done.available_amount, Decimal::ZERO);
        prop_assert_eq!(done.paid_months, done.total_months);
        prop_assert!(done.completion_date.is_some());

        let again = RepaymentEngine::apply_payment(&done, done.user_id, Decimal::ONE, Utc::now());
        prop_assert_eq!(again, Err(LoanError::AlreadyCompleted));
    }

    /// Paying exactly one installment advances the month counter by exactly one.
    #[test]
    fn prop_one_installment_one_month(p in principal(), r in rate(), n in months()) {
        let account = open(p, r, n);
        let monthly = account.monthly_installment().unwrap();
        let outcome = RepaymentEngine::apply_payment(&account, account.user_id, monthly, Utc::now()).unwrap();
        prop_assert_eq!(outcome.months_covered, 1);
        prop_assert_eq!(outcome.account.paid_months, 1);
    }

    /// monthsCovered = floor(payment / monthlyInstallment).
    #[test]
    fn prop_months_covered_is_floor(p in principal(), r in rate(), n in months(), cents in 1i64..100_000_000) {
        let account = open(p, r, n);
        let amount = Decimal::new(cents, 2);
        let monthly = account.monthly_installment().unwrap();
        let expected = (amount / monthly).floor().min(Decimal::from(i32::MAX));
        prop_assert_eq!(Decimal::from(RepaymentEngine::months_covered(&account, amount)), expected);
    }

    /// A payer other than the owner never mutates anything.
    #[test]
    fn prop_foreign_payer_rejected(p in principal(), r in rate(), n in months(), cents in 1i64..100_000) {
        let account = open(p, r, n);
        let result = RepaymentEngine::apply_payment(&account, UserId::new(), Decimal::new(cents, 2), Utc::now());
        prop_assert_eq!(result, Err(LoanError::NotOwner));
    }
}

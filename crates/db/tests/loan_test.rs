//! Integration tests for the loan account repository.

mod common;

use futures::future::join_all;
use loandesk_core::loan::{LoanError, LoanStatus, TakeLoanInput};
use loandesk_db::{LoanRepository, RepaymentSlipRepository, RepositoryError, UserRepository};
use loandesk_shared::types::{LoanId, PageRequest, UserId};
use rust_decimal_macros::dec;

fn input(amount: rust_decimal::Decimal, months: i32) -> TakeLoanInput {
    TakeLoanInput {
        amount,
        total_months: months,
    }
}

#[tokio::test]
async fn test_take_loan_and_repay_to_completion() {
    let Some(db) = common::connect().await else {
        return;
    };
    let user = common::borrower(&db, dec!(5000)).await;
    let user_id = UserId::from_uuid(user.id);
    UserRepository::new(db.clone())
        .set_interest_rate(user_id, Some(dec!(10)))
        .await
        .expect("Failed to set rate");

    let repo = LoanRepository::new(db.clone());
    let loan = repo
        .take_loan(user_id, input(dec!(1000), 10))
        .await
        .expect("Failed to take loan");

    assert_eq!(loan.total_payable, dec!(1100));
    assert_eq!(loan.remaining_balance, dec!(1100));
    assert_eq!(loan.available_amount, dec!(1000));

    let first = repo
        .apply_payment(loan.id, user_id, dec!(110))
        .await
        .expect("Failed to apply payment");
    assert_eq!(first.account.paid_months, 1);
    assert_eq!(first.account.remaining_balance, dec!(990));
    assert_eq!(first.account.status, LoanStatus::Active);

    let second = repo
        .apply_payment(loan.id, user_id, dec!(990))
        .await
        .expect("Failed to apply payment");
    assert!(second.completed);
    assert_eq!(second.account.paid_months, 10);
    assert!(second.account.completion_date.is_some());

    let stored = repo
        .find_by_id(loan.id)
        .await
        .expect("Failed to load loan")
        .expect("Loan should exist");
    assert_eq!(stored.status, LoanStatus::Completed);
    assert_eq!(stored.remaining_balance, dec!(0));
    assert_eq!(stored.available_amount, dec!(0));

    let again = repo.apply_payment(loan.id, user_id, dec!(10)).await;
    assert!(matches!(
        again,
        Err(RepositoryError::Loan(LoanError::AlreadyCompleted))
    ));

    let previous = repo
        .previous_for_user(user_id)
        .await
        .expect("Completed loan should be listed");
    assert_eq!(previous.len(), 1);
}

#[tokio::test]
async fn test_second_active_loan_rejected() {
    let Some(db) = common::connect().await else {
        return;
    };
    let user = common::borrower(&db, dec!(5000)).await;
    let user_id = UserId::from_uuid(user.id);
    let repo = LoanRepository::new(db);

    repo.take_loan(user_id, input(dec!(2000), 12))
        .await
        .expect("Failed to take loan");
    let second = repo.take_loan(user_id, input(dec!(500), 6)).await;

    assert!(matches!(
        second,
        Err(RepositoryError::Loan(LoanError::ActiveLoanExists))
    ));
}

#[tokio::test]
async fn test_concurrent_takes_yield_one_loan() {
    let Some(db) = common::connect().await else {
        return;
    };
    let user = common::borrower(&db, dec!(5000)).await;
    let user_id = UserId::from_uuid(user.id);
    let repo = LoanRepository::new(db);

    let results = join_all((0..4).map(|_| repo.take_loan(user_id, input(dec!(1500), 6)))).await;

    let taken = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(taken, 1);
    assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|e| matches!(
        e,
        RepositoryError::Loan(LoanError::ActiveLoanExists)
    )));
}

#[tokio::test]
async fn test_concurrent_payments_are_not_lost() {
    let Some(db) = common::connect().await else {
        return;
    };
    let user = common::borrower(&db, dec!(5000)).await;
    let user_id = UserId::from_uuid(user.id);
    let repo = LoanRepository::new(db);
    let loan = repo
        .take_loan(user_id, input(dec!(3000), 12))
        .await
        .expect("Failed to take loan");

    let results = join_all([
        repo.apply_payment(loan.id, user_id, dec!(100)),
        repo.apply_payment(loan.id, user_id, dec!(200)),
    ])
    .await;
    assert!(results.iter().all(Result::is_ok));

    let stored = repo
        .find_by_id(loan.id)
        .await
        .expect("Failed to load loan")
        .expect("Loan should exist");
    assert_eq!(stored.total_amount_paid, dec!(300));
    assert_eq!(stored.remaining_balance, loan.total_payable - dec!(300));
}

#[tokio::test]
async fn test_payment_by_other_user_is_rejected() {
    let Some(db) = common::connect().await else {
        return;
    };
    let owner = common::borrower(&db, dec!(5000)).await;
    let repo = LoanRepository::new(db);
    let loan = repo
        .take_loan(UserId::from_uuid(owner.id), input(dec!(1000), 6))
        .await
        .expect("Failed to take loan");

    let result = repo.apply_payment(loan.id, UserId::new(), dec!(50)).await;
    assert!(matches!(result, Err(RepositoryError::Loan(LoanError::NotOwner))));

    let missing = repo.apply_payment(LoanId::new(), UserId::new(), dec!(50)).await;
    assert!(matches!(missing, Err(RepositoryError::Loan(LoanError::NotFound))));
}

#[tokio::test]
async fn test_slips_and_admin_views() {
    let Some(db) = common::connect().await else {
        return;
    };
    let user = common::borrower(&db, dec!(5000)).await;
    let user_id = UserId::from_uuid(user.id);
    let loans = LoanRepository::new(db.clone());
    let slips = RepaymentSlipRepository::new(db);

    let loan = loans
        .take_loan(user_id, input(dec!(1200), 12))
        .await
        .expect("Failed to take loan");

    let none = slips.list_for_user(user_id).await;
    assert!(matches!(none, Err(RepositoryError::Loan(LoanError::NoRepayments))));

    slips
        .upload(loan.id, user_id, dec!(100), "https://files.example.com/slip-1.png")
        .await
        .expect("Failed to upload slip");

    let details = loans
        .details_for_user(user_id)
        .await
        .expect("Failed to load details");
    assert_eq!(details.repayments.len(), 1);
    assert_eq!(details.loan.remaining_months, 12);
    assert_eq!(details.loan.total_amount_paid, dec!(0));

    let page = loans
        .active_page(PageRequest::new(1, 100), Some(user.email.to_uppercase().as_str()))
        .await
        .expect("Failed to page active loans");
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].summary.id, loan.id);
}

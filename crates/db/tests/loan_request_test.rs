//! Integration tests for the loan request repository.

mod common;

use futures::future::join_all;
use loandesk_core::request::{
    InstallmentStatus, LoanRequestError, LoanRequestInput, LoanRequestStatus, TenureType,
};
use loandesk_db::{LoanRequestRepository, RepositoryError};
use loandesk_db::entities::installments;
use loandesk_shared::Role;
use loandesk_shared::types::{PageRequest, UserId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

fn input(amount: Decimal, tenure_value: i32) -> LoanRequestInput {
    LoanRequestInput {
        amount,
        tenure_type: TenureType::Months,
        tenure_value,
    }
}

#[tokio::test]
async fn test_submit_writes_request_and_schedule() {
    let Some(db) = common::connect().await else {
        return;
    };
    let user = common::borrower(&db, dec!(5000)).await;
    let user_id = UserId::from_uuid(user.id);
    let repo = LoanRequestRepository::new(db);

    let submission = repo
        .submit(user_id, input(dec!(1000), 3))
        .await
        .expect("Failed to submit request");

    assert_eq!(submission.request.status, LoanRequestStatus::Pending);
    assert_eq!(submission.request.request_id.len(), 6);

    let schedule = repo
        .installments(submission.request.id, user_id, false)
        .await
        .expect("Failed to load installments");
    assert_eq!(schedule.len(), 3);
    let sum: Decimal = schedule.iter().map(|i| i.amount).sum();
    assert_eq!(sum, submission.request.total_payable_amount);

    let blocked = repo.submit(user_id, input(dec!(500), 2)).await;
    assert!(matches!(
        blocked,
        Err(RepositoryError::LoanRequest(LoanRequestError::OpenRequestExists))
    ));

    let foreign = repo
        .installments(submission.request.id, UserId::new(), false)
        .await;
    assert!(matches!(
        foreign,
        Err(RepositoryError::LoanRequest(LoanRequestError::NotOwner))
    ));
}

#[tokio::test]
async fn test_over_limit_leaves_no_rows() {
    let Some(db) = common::connect().await else {
        return;
    };
    let user = common::borrower(&db, dec!(5000)).await;
    let user_id = UserId::from_uuid(user.id);
    let repo = LoanRequestRepository::new(db.clone());

    let result = repo.submit(user_id, input(dec!(6000), 6)).await;
    assert!(matches!(
        result,
        Err(RepositoryError::LoanRequest(LoanRequestError::ExceedsLoanLimit { .. }))
    ));

    let orphans = installments::Entity::find()
        .filter(installments::Column::UserId.eq(user.id))
        .count(&db)
        .await
        .expect("Failed to count installments");
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn test_transitions_follow_the_table() {
    let Some(db) = common::connect().await else {
        return;
    };
    let user = common::borrower(&db, dec!(5000)).await;
    let user_id = UserId::from_uuid(user.id);
    let repo = LoanRequestRepository::new(db);

    let rejected = repo
        .submit(user_id, input(dec!(800), 4))
        .await
        .expect("Failed to submit request")
        .request;
    let rejected = repo
        .update_status(rejected.id, LoanRequestStatus::Rejected)
        .await
        .expect("Failed to reject");
    assert!(rejected.rejected_at.is_some());

    let illegal = repo.update_status(rejected.id, LoanRequestStatus::Pending).await;
    assert!(matches!(
        illegal,
        Err(RepositoryError::LoanRequest(LoanRequestError::InvalidTransition { .. }))
    ));

    // A rejected request does not block a new one.
    repo.submit(user_id, input(dec!(800), 4))
        .await
        .expect("Rejected request should not block");
}

#[tokio::test]
async fn test_paying_every_installment_completes_request() {
    let Some(db) = common::connect().await else {
        return;
    };
    let user = common::borrower(&db, dec!(5000)).await;
    let user_id = UserId::from_uuid(user.id);
    let repo = LoanRequestRepository::new(db);

    let submission = repo
        .submit(user_id, input(dec!(1000), 3))
        .await
        .expect("Failed to submit request");
    let id = submission.request.id;

    let early = repo
        .pay_installment(id, submission.installments[0].id, user_id)
        .await;
    assert!(matches!(
        early,
        Err(RepositoryError::LoanRequest(LoanRequestError::NotApproved(_)))
    ));

    repo.update_status(id, LoanRequestStatus::Approved)
        .await
        .expect("Failed to approve");

    let mut last = None;
    for installment in &submission.installments {
        let payment = repo
            .pay_installment(id, installment.id, user_id)
            .await
            .expect("Failed to pay installment");
        assert_eq!(payment.installment.status, InstallmentStatus::Paid);
        last = Some(payment);
    }

    let last = last.expect("At least one installment");
    assert!(last.completed);
    assert_eq!(last.request.status, LoanRequestStatus::Completed);
    assert_eq!(last.request.remaining_balance, dec!(0));
    assert_eq!(
        last.request.total_paid_amount,
        submission.request.total_payable_amount
    );

    let twice = repo
        .pay_installment(id, submission.installments[0].id, user_id)
        .await;
    assert!(matches!(
        twice,
        Err(RepositoryError::LoanRequest(LoanRequestError::NotApproved(
            LoanRequestStatus::Completed
        )))
    ));
}

#[tokio::test]
async fn test_concurrent_final_installments_complete_request() {
    let Some(db) = common::connect().await else {
        return;
    };
    let user = common::borrower(&db, dec!(5000)).await;
    let user_id = UserId::from_uuid(user.id);
    let repo = LoanRequestRepository::new(db);

    let submission = repo
        .submit(user_id, input(dec!(900), 3))
        .await
        .expect("Failed to submit request");
    let id = submission.request.id;
    repo.update_status(id, LoanRequestStatus::Approved)
        .await
        .expect("Failed to approve");
    repo.pay_installment(id, submission.installments[0].id, user_id)
        .await
        .expect("Failed to pay first installment");

    let results = join_all(
        submission.installments[1..]
            .iter()
            .map(|installment| repo.pay_installment(id, installment.id, user_id)),
    )
    .await;
    for result in &results {
        assert!(result.is_ok(), "payment failed: {result:?}");
    }
    assert_eq!(
        results
            .iter()
            .filter(|r| r.as_ref().is_ok_and(|p| p.completed))
            .count(),
        1
    );

    let request = repo
        .find_by_id(id)
        .await
        .expect("Failed to reload request")
        .expect("Request exists");
    assert_eq!(request.status, LoanRequestStatus::Completed);
    assert_eq!(request.remaining_balance, dec!(0));
    assert_eq!(
        request.total_paid_amount,
        submission.request.total_payable_amount
    );
    assert!(request.completed_at.is_some());
}

#[tokio::test]
async fn test_concurrent_approve_and_reject_pick_one_winner() {
    let Some(db) = common::connect().await else {
        return;
    };
    let user = common::borrower(&db, dec!(5000)).await;
    let user_id = UserId::from_uuid(user.id);
    let repo = LoanRequestRepository::new(db);

    let id = repo
        .submit(user_id, input(dec!(600), 2))
        .await
        .expect("Failed to submit request")
        .request
        .id;

    let results = join_all([
        repo.update_status(id, LoanRequestStatus::Approved),
        repo.update_status(id, LoanRequestStatus::Rejected),
    ])
    .await;

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(RepositoryError::LoanRequest(LoanRequestError::InvalidTransition { .. })
            | RepositoryError::Contention)
    )));

    let stored = repo
        .find_by_id(id)
        .await
        .expect("Failed to reload request")
        .expect("Request exists");
    assert_eq!(stored.status, winners[0].status);
    assert_eq!(stored.approved_at.is_some(), stored.status == LoanRequestStatus::Approved);
    assert_eq!(stored.rejected_at.is_some(), stored.status == LoanRequestStatus::Rejected);
}

#[tokio::test]
async fn test_list_filters_by_user() {
    let Some(db) = common::connect().await else {
        return;
    };
    let user = common::create_user(&db, Role::User, true, dec!(5000)).await;
    let user_id = UserId::from_uuid(user.id);
    let repo = LoanRequestRepository::new(db);

    let submission = repo
        .submit(user_id, input(dec!(250), 1))
        .await
        .expect("Failed to submit request");

    let page = repo
        .list(PageRequest::new(1, 10), Some(user_id))
        .await
        .expect("Failed to list requests");
    assert_eq!(page.total_count, 1);
    assert!(!page.has_more);
    assert_eq!(page.items[0].request.id, submission.request.id);
    assert_eq!(
        page.items[0].user.as_ref().map(|u| u.email.as_str()),
        Some(user.email.as_str())
    );
}

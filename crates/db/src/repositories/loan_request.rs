//! Loan request repository.
//!
//! Submission writes the request and its whole schedule in one transaction.
//! Status changes and installment payments compare-and-swap on the request's
//! `version`, retrying a bounded number of times.

use chrono::Utc;
use loandesk_core::request::{
    Installment, InstallmentPayment, LoanRequest, LoanRequestError, LoanRequestInput,
    LoanRequestStatus, LoanRequestWorkflow, Submission,
};
use loandesk_shared::types::{InstallmentId, LoanRequestId, PageRequest, PageResponse, UserId};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;

use super::error::{MAX_UPDATE_ATTEMPTS, RepositoryError, unique_violation};
use super::interest_rate::InterestRateRepository;
use super::user::{BorrowerIdentity, UserRepository};
use crate::convert::{new_installment_row, new_request_row};
use crate::entities::{installments, loan_requests, sea_orm_active_enums, users};

/// Attempts at finding an unused display number.
pub const MAX_REQUEST_ID_ATTEMPTS: usize = 5;

const REQUEST_ID_INDEX: &str = "uq_loan_requests_request_id";
const OPEN_REQUEST_INDEX: &str = "uq_loan_requests_one_open_per_user";

/// Generates a random six-digit display number.
#[must_use]
pub fn generate_request_id() -> String {
    rand::rng().random_range(100_000..=999_999).to_string()
}

/// A loan request with its borrower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequestRow {
    /// The request.
    #[serde(flatten)]
    pub request: LoanRequest,
    /// Borrower.
    pub user: Option<BorrowerIdentity>,
}

/// Loan request repository.
#[derive(Debug, Clone)]
pub struct LoanRequestRepository {
    db: DatabaseConnection,
}

impl LoanRequestRepository {
    /// Creates a new loan request repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a request by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: LoanRequestId) -> Result<Option<LoanRequest>, DbErr> {
        let row = loan_requests::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?;
        Ok(row.map(LoanRequest::from))
    }

    /// Finds the user's pending or approved request.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_open_for_user(&self, user_id: UserId) -> Result<Option<LoanRequest>, DbErr> {
        let row = loan_requests::Entity::find()
            .filter(loan_requests::Column::UserId.eq(user_id.into_inner()))
            .filter(loan_requests::Column::Status.is_in([
                sea_orm_active_enums::LoanRequestStatus::Pending,
                sea_orm_active_enums::LoanRequestStatus::Approved,
            ]))
            .one(&self.db)
            .await?;
        Ok(row.map(LoanRequest::from))
    }

    /// Submits a request and its installment schedule.
    ///
    /// A display-number collision is retried with a fresh number; a
    /// concurrent open request surfaces as `OpenRequestExists`.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` when the user does not exist
    /// - `LoanRequest` for any rule violation
    /// - `Contention` when no unused display number was found
    pub async fn submit(
        &self,
        user_id: UserId,
        input: LoanRequestInput,
    ) -> Result<Submission, RepositoryError> {
        LoanRequestWorkflow::validate_input(&input)?;

        let borrower = UserRepository::new(self.db.clone()).borrower(user_id).await?;
        let latest = InterestRateRepository::new(self.db.clone())
            .latest()
            .await?
            .map(|g| g.rate);

        for attempt in 1..=MAX_REQUEST_ID_ATTEMPTS {
            let open = self.find_open_for_user(user_id).await?;
            let now = Utc::now();
            let submission = LoanRequestWorkflow::submit(
                &borrower,
                open.as_ref(),
                input,
                latest,
                generate_request_id(),
                now,
            )?;

            match self.insert_submission(&submission, now).await {
                Ok(()) => {
                    tracing::info!(
                        loan_request_id = %submission.request.id,
                        request_id = %submission.request.request_id,
                        user_id = %user_id,
                        amount = %submission.request.requested_amount,
                        total_payable = %submission.request.total_payable_amount,
                        installments = submission.installments.len(),
                        "loan request submitted"
                    );
                    return Ok(submission);
                }
                Err(err) => match unique_violation(&err) {
                    Some(detail) if detail.contains(REQUEST_ID_INDEX) => {
                        tracing::debug!(attempt, "request id collision, retrying");
                    }
                    Some(detail) if detail.contains(OPEN_REQUEST_INDEX) => {
                        return Err(LoanRequestError::OpenRequestExists.into());
                    }
                    _ => return Err(err.into()),
                },
            }
        }

        Err(RepositoryError::Contention)
    }

    async fn insert_submission(
        &self,
        submission: &Submission,
        now: chrono::DateTime<Utc>,
    ) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        new_request_row(&submission.request).insert(&txn).await?;
        installments::Entity::insert_many(
            submission
                .installments
                .iter()
                .map(|installment| new_installment_row(installment, now)),
        )
        .exec(&txn)
        .await?;

        txn.commit().await
    }

    /// Pages through requests, newest first, optionally for one user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        page: PageRequest,
        user_id: Option<UserId>,
    ) -> Result<PageResponse<LoanRequestRow>, DbErr> {
        let page = page.normalized();

        let mut query = loan_requests::Entity::find().find_also_related(users::Entity);
        if let Some(user_id) = user_id {
            query = query.filter(loan_requests::Column::UserId.eq(user_id.into_inner()));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(loan_requests::Column::CreatedAt)
            .order_by_desc(loan_requests::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await?;

        let items = rows
            .into_iter()
            .map(|(request, user)| LoanRequestRow {
                request: LoanRequest::from(request),
                user: user.map(BorrowerIdentity::from),
            })
            .collect();

        Ok(PageResponse::new(items, page, total))
    }

    /// Moves a request to `to` through the transition table.
    ///
    /// # Errors
    ///
    /// - `LoanRequest(NotFound)` when the request does not exist
    /// - `LoanRequest(InvalidTransition)` for an illegal move
    /// - `Contention` when every attempt lost to a concurrent writer
    pub async fn update_status(
        &self,
        id: LoanRequestId,
        to: LoanRequestStatus,
    ) -> Result<LoanRequest, RepositoryError> {
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let row = loan_requests::Entity::find_by_id(id.into_inner())
                .one(&self.db)
                .await?
                .ok_or(LoanRequestError::NotFound)?;
            let version = row.version;
            let request = LoanRequest::from(row);

            let now = Utc::now();
            let next = LoanRequestWorkflow::transition(&request, to, now)?;

            let update = loan_requests::ActiveModel {
                status: Set(next.status.into()),
                approved_at: Set(next.approved_at.map(Into::into)),
                rejected_at: Set(next.rejected_at.map(Into::into)),
                completed_at: Set(next.completed_at.map(Into::into)),
                version: Set(version + 1),
                updated_at: Set(now.into()),
                ..Default::default()
            };

            let result = loan_requests::Entity::update_many()
                .set(update)
                .filter(loan_requests::Column::Id.eq(id.into_inner()))
                .filter(loan_requests::Column::Version.eq(version))
                .exec(&self.db)
                .await?;

            if result.rows_affected == 1 {
                tracing::info!(
                    loan_request_id = %id,
                    user_id = %next.user_id,
                    from = %request.status,
                    status = %next.status,
                    "loan request status updated"
                );
                return Ok(next);
            }

            tracing::debug!(loan_request_id = %id, attempt, "status update lost a version race");
        }

        Err(RepositoryError::Contention)
    }

    /// Returns a request's schedule ordered by due date.
    ///
    /// # Errors
    ///
    /// - `LoanRequest(NotFound)` when the request does not exist
    /// - `LoanRequest(NotOwner)` unless the requester owns it or is an admin
    pub async fn installments(
        &self,
        id: LoanRequestId,
        requester: UserId,
        is_admin: bool,
    ) -> Result<Vec<Installment>, RepositoryError> {
        let request = self
            .find_by_id(id)
            .await?
            .ok_or(LoanRequestError::NotFound)?;
        LoanRequestWorkflow::ensure_can_view(&request, requester, is_admin)?;

        let rows = installments::Entity::find()
            .filter(installments::Column::LoanRequestId.eq(id.into_inner()))
            .order_by_asc(installments::Column::DueDate)
            .order_by_asc(installments::Column::Sequence)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Installment::from).collect())
    }

    /// Pays one installment, completing the request with its last one.
    ///
    /// The installment flip and the request update commit together.
    ///
    /// # Errors
    ///
    /// - `LoanRequest(NotFound)` / `LoanRequest(InstallmentNotFound)` for unknown IDs
    /// - `LoanRequest` for any other rule violation
    /// - `Contention` when every attempt lost to a concurrent writer
    pub async fn pay_installment(
        &self,
        id: LoanRequestId,
        installment_id: InstallmentId,
        requester: UserId,
    ) -> Result<InstallmentPayment, RepositoryError> {
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let txn = self.db.begin().await?;

            let row = loan_requests::Entity::find_by_id(id.into_inner())
                .one(&txn)
                .await?
                .ok_or(LoanRequestError::NotFound)?;
            let version = row.version;
            let request = LoanRequest::from(row);

            let installment = installments::Entity::find_by_id(installment_id.into_inner())
                .one(&txn)
                .await?
                .map(Installment::from)
                .ok_or(LoanRequestError::InstallmentNotFound)?;

            let other_pending = installments::Entity::find()
                .filter(installments::Column::LoanRequestId.eq(id.into_inner()))
                .filter(installments::Column::Status.eq(sea_orm_active_enums::InstallmentStatus::Pending))
                .filter(installments::Column::Id.ne(installment_id.into_inner()))
                .count(&txn)
                .await?;

            let now = Utc::now();
            let payment = LoanRequestWorkflow::pay_installment(
                &request,
                &installment,
                requester,
                other_pending,
                now,
            )?;

            let flipped = installments::Entity::update_many()
                .set(installments::ActiveModel {
                    status: Set(payment.installment.status.into()),
                    paid_at: Set(payment.installment.paid_at.map(Into::into)),
                    ..Default::default()
                })
                .filter(installments::Column::Id.eq(installment_id.into_inner()))
                .filter(installments::Column::Status.eq(sea_orm_active_enums::InstallmentStatus::Pending))
                .exec(&txn)
                .await?;

            let next = &payment.request;
            let updated = if flipped.rows_affected == 1 {
                loan_requests::Entity::update_many()
                    .set(loan_requests::ActiveModel {
                        total_paid_amount: Set(next.total_paid_amount),
                        remaining_balance: Set(next.remaining_balance),
                        status: Set(next.status.into()),
                        completed_at: Set(next.completed_at.map(Into::into)),
                        version: Set(version + 1),
                        updated_at: Set(now.into()),
                        ..Default::default()
                    })
                    .filter(loan_requests::Column::Id.eq(id.into_inner()))
                    .filter(loan_requests::Column::Version.eq(version))
                    .exec(&txn)
                    .await?
                    .rows_affected
            } else {
                0
            };

            if updated == 1 {
                txn.commit().await?;
                tracing::info!(
                    loan_request_id = %id,
                    installment_id = %installment_id,
                    user_id = %requester,
                    amount = %payment.installment.amount,
                    completed = payment.completed,
                    "installment paid"
                );
                return Ok(payment);
            }

            txn.rollback().await?;
            tracing::debug!(loan_request_id = %id, attempt, "installment payment lost a race");
        }

        Err(RepositoryError::Contention)
    }
}

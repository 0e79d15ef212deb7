//! Loan account repository.
//!
//! Every mutation is fetch → core decision → compare-and-swap on `version`.
//! A lost race re-reads the row and re-applies the decision.

use chrono::Utc;
use loandesk_core::loan::{
    LoanAccount, LoanError, LoanService, LoanSummary, RepaymentEngine, RepaymentOutcome,
    RepaymentSlip, TakeLoanInput,
};
use loandesk_shared::types::{LoanId, PageRequest, PageResponse, UserId};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;

use super::error::{MAX_UPDATE_ATTEMPTS, RepositoryError, unique_violation};
use super::interest_rate::InterestRateRepository;
use super::repayment_slip::RepaymentSlipRepository;
use super::user::{BorrowerIdentity, UserRepository};
use crate::convert::new_loan_row;
use crate::entities::{loans, sea_orm_active_enums, users};

/// An active loan with its borrower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveLoanRow {
    /// Derived loan figures.
    #[serde(flatten)]
    pub summary: LoanSummary,
    /// Borrower.
    pub user: Option<BorrowerIdentity>,
}

/// A user's active loan with its uploaded slips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDetails {
    /// Derived loan figures.
    pub loan: LoanSummary,
    /// Slips uploaded against the loan, newest first.
    pub repayments: Vec<RepaymentSlip>,
}

/// Loan account repository.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    db: DatabaseConnection,
}

impl LoanRepository {
    /// Creates a new loan repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a loan by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: LoanId) -> Result<Option<LoanAccount>, DbErr> {
        let row = loans::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?;
        Ok(row.map(LoanAccount::from))
    }

    /// Finds the user's active loan.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<LoanAccount>, DbErr> {
        let row = loans::Entity::find()
            .filter(loans::Column::UserId.eq(user_id.into_inner()))
            .filter(loans::Column::Status.eq(sea_orm_active_enums::LoanStatus::Active))
            .one(&self.db)
            .await?;
        Ok(row.map(LoanAccount::from))
    }

    /// Returns the caller's active loan.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveLoan` when the user has none.
    pub async fn current_for_user(&self, user_id: UserId) -> Result<LoanAccount, RepositoryError> {
        self.find_active_for_user(user_id)
            .await?
            .ok_or_else(|| LoanError::NoActiveLoan.into())
    }

    /// Opens a loan for `user_id`.
    ///
    /// The partial unique index on active loans backs the pre-check, so a
    /// concurrent take still yields `ActiveLoanExists`.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` when the user does not exist
    /// - `Loan` for any rule violation
    pub async fn take_loan(
        &self,
        user_id: UserId,
        input: TakeLoanInput,
    ) -> Result<LoanAccount, RepositoryError> {
        let borrower = UserRepository::new(self.db.clone()).borrower(user_id).await?;
        let active = self.find_active_for_user(user_id).await?;
        let latest = InterestRateRepository::new(self.db.clone())
            .latest()
            .await?
            .map(|g| g.rate);

        let now = Utc::now();
        let loan = LoanService::take_loan(&borrower, active.as_ref(), input, latest, now)?;

        match new_loan_row(&loan, now).insert(&self.db).await {
            Ok(row) => {
                tracing::info!(
                    loan_id = %row.id,
                    user_id = %row.user_id,
                    amount = %row.amount,
                    total_months = row.total_months,
                    interest_rate = %row.interest_rate,
                    "loan taken"
                );
                Ok(LoanAccount::from(row))
            }
            Err(err) if unique_violation(&err).is_some() => {
                Err(LoanError::ActiveLoanExists.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Applies a repayment.
    ///
    /// # Errors
    ///
    /// - `Loan(NotFound)` when the loan does not exist
    /// - `Loan` for any other rule violation
    /// - `Contention` when every attempt lost to a concurrent writer
    pub async fn apply_payment(
        &self,
        loan_id: LoanId,
        requester: UserId,
        amount: Decimal,
    ) -> Result<RepaymentOutcome, RepositoryError> {
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let row = loans::Entity::find_by_id(loan_id.into_inner())
                .one(&self.db)
                .await?
                .ok_or(LoanError::NotFound)?;
            let version = row.version;
            let account = LoanAccount::from(row);

            let now = Utc::now();
            let outcome = RepaymentEngine::apply_payment(&account, requester, amount, now)?;
            let next = &outcome.account;

            let update = loans::ActiveModel {
                available_amount: Set(next.available_amount),
                paid_months: Set(next.paid_months),
                remaining_balance: Set(next.remaining_balance),
                total_amount_paid: Set(next.total_amount_paid),
                status: Set(next.status.into()),
                completion_date: Set(next.completion_date.map(Into::into)),
                version: Set(version + 1),
                updated_at: Set(now.into()),
                ..Default::default()
            };

            let result = loans::Entity::update_many()
                .set(update)
                .filter(loans::Column::Id.eq(loan_id.into_inner()))
                .filter(loans::Column::Version.eq(version))
                .exec(&self.db)
                .await?;

            if result.rows_affected == 1 {
                tracing::info!(
                    loan_id = %loan_id,
                    user_id = %requester,
                    amount = %amount,
                    months_covered = outcome.months_covered,
                    remaining_balance = %next.remaining_balance,
                    status = %next.status,
                    "repayment applied"
                );
                return Ok(outcome);
            }

            tracing::debug!(loan_id = %loan_id, attempt, "repayment lost a version race");
        }

        Err(RepositoryError::Contention)
    }

    /// Lists the user's completed loans, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NoPreviousLoans` when there are none.
    pub async fn previous_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<LoanSummary>, RepositoryError> {
        let rows = loans::Entity::find()
            .filter(loans::Column::UserId.eq(user_id.into_inner()))
            .filter(loans::Column::Status.eq(sea_orm_active_enums::LoanStatus::Completed))
            .order_by_desc(loans::Column::CreatedAt)
            .all(&self.db)
            .await?;

        if rows.is_empty() {
            return Err(LoanError::NoPreviousLoans.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| LoanSummary::from(&LoanAccount::from(row)))
            .collect())
    }

    /// Returns a user's active loan together with its slips.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveLoan` when the user has none.
    pub async fn details_for_user(&self, user_id: UserId) -> Result<LoanDetails, RepositoryError> {
        let loan = self.current_for_user(user_id).await?;
        let repayments = RepaymentSlipRepository::new(self.db.clone())
            .list_for_loan(loan.id)
            .await?;

        Ok(LoanDetails {
            loan: LoanSummary::from(&loan),
            repayments,
        })
    }

    /// Pages through active loans, newest first.
    ///
    /// `search` matches the borrower's email or name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn active_page(
        &self,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<PageResponse<ActiveLoanRow>, DbErr> {
        let page = page.normalized();

        let mut query = loans::Entity::find()
            .find_also_related(users::Entity)
            .filter(loans::Column::Status.eq(sea_orm_active_enums::LoanStatus::Active));

        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", term.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col((users::Entity, users::Column::Email))))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col((
                            users::Entity,
                            users::Column::FullName,
                        ))))
                        .like(pattern),
                    ),
            );
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(loans::Column::CreatedAt)
            .order_by_desc(loans::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await?;

        let items = rows
            .into_iter()
            .map(|(loan, user)| ActiveLoanRow {
                summary: LoanSummary::from(&LoanAccount::from(loan)),
                user: user.map(BorrowerIdentity::from),
            })
            .collect();

        Ok(PageResponse::new(items, page, total))
    }
}

//! Repayment slip repository.

use chrono::Utc;
use loandesk_core::loan::{LoanAccount, LoanError, RepaymentSlip};
use loandesk_shared::types::{LoanId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::error::RepositoryError;
use crate::entities::{loans, repayment_slips};

/// Repayment slip repository.
#[derive(Debug, Clone)]
pub struct RepaymentSlipRepository {
    db: DatabaseConnection,
}

impl RepaymentSlipRepository {
    /// Creates a new repayment slip repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an uploaded slip against a loan the requester owns.
    ///
    /// Balances are not touched.
    ///
    /// # Errors
    ///
    /// - `Loan(NotFound)` when the loan does not exist
    /// - `Loan` for any other rule violation
    pub async fn upload(
        &self,
        loan_id: LoanId,
        requester: UserId,
        amount: Decimal,
        slip_url: &str,
    ) -> Result<RepaymentSlip, RepositoryError> {
        let loan = loans::Entity::find_by_id(loan_id.into_inner())
            .one(&self.db)
            .await?
            .map(LoanAccount::from)
            .ok_or(LoanError::NotFound)?;

        let slip = RepaymentSlip::record(&loan, requester, amount, slip_url, Utc::now())?;

        let row = repayment_slips::ActiveModel {
            id: Set(slip.id.into_inner()),
            loan_id: Set(slip.loan_id.into_inner()),
            user_id: Set(slip.user_id.into_inner()),
            amount: Set(slip.amount),
            slip_url: Set(slip.slip_url.clone()),
            uploaded_at: Set(slip.uploaded_at.into()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(
            slip_id = %row.id,
            loan_id = %row.loan_id,
            user_id = %row.user_id,
            amount = %row.amount,
            "repayment slip uploaded"
        );

        Ok(RepaymentSlip::from(row))
    }

    /// Lists the user's slips, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NoRepayments` when there are none.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<RepaymentSlip>, RepositoryError> {
        let rows = repayment_slips::Entity::find()
            .filter(repayment_slips::Column::UserId.eq(user_id.into_inner()))
            .order_by_desc(repayment_slips::Column::UploadedAt)
            .all(&self.db)
            .await?;

        if rows.is_empty() {
            return Err(LoanError::NoRepayments.into());
        }

        Ok(rows.into_iter().map(RepaymentSlip::from).collect())
    }

    /// Lists a loan's slips, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_loan(&self, loan_id: LoanId) -> Result<Vec<RepaymentSlip>, DbErr> {
        let rows = repayment_slips::Entity::find()
            .filter(repayment_slips::Column::LoanId.eq(loan_id.into_inner()))
            .order_by_desc(repayment_slips::Column::UploadedAt)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(RepaymentSlip::from).collect())
    }
}

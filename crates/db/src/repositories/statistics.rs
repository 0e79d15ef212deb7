//! Portfolio statistics.
//!
//! Only the columns the aggregates need are loaded; the sums and counts are
//! computed by the core crate.

use loandesk_core::loan::LoanStatus;
use loandesk_core::request::{InstallmentStatus, LoanRequestStatus};
use loandesk_core::statistics::{
    InstallmentFigures, LoanFigures, LoanStatistics, RequestFigures,
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QuerySelect};

use super::interest_rate::InterestRateRepository;
use crate::entities::{installments, loan_requests, loans, repayment_slips, sea_orm_active_enums};

/// Statistics repository.
#[derive(Debug, Clone)]
pub struct StatisticsRepository {
    db: DatabaseConnection,
}

impl StatisticsRepository {
    /// Creates a new statistics repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes the admin dashboard statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if any database query fails.
    pub async fn loan_statistics(&self) -> Result<LoanStatistics, DbErr> {
        let loans: Vec<(sea_orm_active_enums::LoanStatus, Decimal, Decimal)> = loans::Entity::find()
            .select_only()
            .column(loans::Column::Status)
            .column(loans::Column::Amount)
            .column(loans::Column::AvailableAmount)
            .into_tuple()
            .all(&self.db)
            .await?;

        let requests: Vec<(sea_orm_active_enums::LoanRequestStatus, Decimal)> =
            loan_requests::Entity::find()
                .select_only()
                .column(loan_requests::Column::Status)
                .column(loan_requests::Column::RequestedAmount)
                .into_tuple()
                .all(&self.db)
                .await?;

        let installments: Vec<(sea_orm_active_enums::InstallmentStatus, Decimal)> =
            installments::Entity::find()
                .select_only()
                .column(installments::Column::Status)
                .column(installments::Column::Amount)
                .into_tuple()
                .all(&self.db)
                .await?;

        let slip_amounts: Vec<Decimal> = repayment_slips::Entity::find()
            .select_only()
            .column(repayment_slips::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await?;

        let latest = InterestRateRepository::new(self.db.clone())
            .latest()
            .await?
            .map(|g| g.rate);

        let loans: Vec<LoanFigures> = loans
            .into_iter()
            .map(|(status, amount, available_amount)| LoanFigures {
                status: LoanStatus::from(status),
                amount,
                available_amount,
            })
            .collect();
        let requests: Vec<RequestFigures> = requests
            .into_iter()
            .map(|(status, requested_amount)| RequestFigures {
                status: LoanRequestStatus::from(status),
                requested_amount,
            })
            .collect();
        let installments: Vec<InstallmentFigures> = installments
            .into_iter()
            .map(|(status, amount)| InstallmentFigures {
                status: InstallmentStatus::from(status),
                amount,
            })
            .collect();

        Ok(LoanStatistics::compute(
            &loans,
            &requests,
            &installments,
            &slip_amounts,
            latest,
        ))
    }
}

//! Global interest-rate log.
//!
//! The log is append-only; its newest row is the current global rate.

use chrono::Utc;
use loandesk_core::interest::{GlobalRate, InterestPolicy};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::error::RepositoryError;
use crate::entities::interest_rates;

/// Transaction-scoped advisory lock taken by every append, so the
/// "unchanged" check and the insert see a stable newest row.
const APPEND_LOCK_SQL: &str = "SELECT pg_advisory_xact_lock(7304519028861)";

async fn newest<C: ConnectionTrait>(conn: &C) -> Result<Option<GlobalRate>, DbErr> {
    let row = interest_rates::Entity::find()
        .order_by_desc(interest_rates::Column::EffectiveDate)
        .order_by_desc(interest_rates::Column::Id)
        .one(conn)
        .await?;

    Ok(row.map(GlobalRate::from))
}

/// Interest rate repository.
#[derive(Debug, Clone)]
pub struct InterestRateRepository {
    db: DatabaseConnection,
}

impl InterestRateRepository {
    /// Creates a new interest rate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the newest global rate, if any was ever set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn latest(&self) -> Result<Option<GlobalRate>, DbErr> {
        newest(&self.db).await
    }

    /// Appends a new global rate.
    ///
    /// Concurrent appends are serialized, so two admins submitting the same
    /// rate produce one row and one `Unchanged` error.
    ///
    /// # Errors
    ///
    /// - `Interest` when the rate is missing, out of range or unchanged
    /// - `Database` if the insert fails
    pub async fn append(
        &self,
        rate: Option<rust_decimal::Decimal>,
    ) -> Result<interest_rates::Model, RepositoryError> {
        let txn = self.db.begin().await?;
        txn.execute_unprepared(APPEND_LOCK_SQL).await?;

        let latest = newest(&txn).await?.map(|g| g.rate);
        let rate = InterestPolicy::validate_global_rate(rate, latest)?;

        let row = interest_rates::ActiveModel {
            id: Set(Uuid::now_v7()),
            rate: Set(rate.percent()),
            effective_date: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        tracing::info!(rate = %row.rate, "global interest rate set");
        Ok(row)
    }

    /// Returns the full log, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history(&self) -> Result<Vec<interest_rates::Model>, DbErr> {
        interest_rates::Entity::find()
            .order_by_desc(interest_rates::Column::EffectiveDate)
            .order_by_desc(interest_rates::Column::Id)
            .all(&self.db)
            .await
    }
}

//! User repository for database operations.

use chrono::Utc;
use loandesk_core::Borrower;
use loandesk_core::interest::InterestPolicy;
use loandesk_shared::Role;
use loandesk_shared::types::UserId;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use uuid::Uuid;

use super::error::RepositoryError;
use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Borrower identity attached to admin loan rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerIdentity {
    /// User ID.
    pub id: UserId,
    /// Email.
    pub email: String,
    /// Display name.
    pub full_name: Option<String>,
}

impl From<users::Model> for BorrowerIdentity {
    fn from(user: users::Model) -> Self {
        Self {
            id: UserId::from_uuid(user.id),
            email: user.email,
            full_name: user.full_name,
        }
    }
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login email.
    pub email: String,
    /// Display name.
    pub full_name: Option<String>,
    /// Role.
    pub role: Role,
    /// Whether the email is verified.
    pub email_verified: bool,
    /// Whether the profile is complete.
    pub profile_completed: bool,
    /// Credit limit for loan requests.
    pub loan_limit: Decimal,
}

/// User repository.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Loads the borrower facts for `id`.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the user does not exist.
    pub async fn borrower(&self, id: UserId) -> Result<Borrower, RepositoryError> {
        self.find_by_id(id)
            .await?
            .map(Borrower::from)
            .ok_or(RepositoryError::UserNotFound)
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: NewUser) -> Result<users::Model, DbErr> {
        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(input.email),
            full_name: Set(input.full_name),
            role: Set(input.role.into()),
            email_verified: Set(input.email_verified),
            profile_completed: Set(input.profile_completed),
            loan_limit: Set(input.loan_limit),
            interest_rate: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Lists every admin, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_admins(&self) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Admin))
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Sets or clears a user's personal interest rate.
    ///
    /// # Errors
    ///
    /// - `Interest` when the rate is outside `(0, 100]`
    /// - `UserNotFound` when the user does not exist
    pub async fn set_interest_rate(
        &self,
        id: UserId,
        rate: Option<Decimal>,
    ) -> Result<users::Model, RepositoryError> {
        let rate = InterestPolicy::validate_user_rate(rate)?.map(|r| r.percent());

        let result = users::Entity::update_many()
            .col_expr(users::Column::InterestRate, Expr::value(rate))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::UserNotFound);
        }

        tracing::info!(user_id = %id, rate = ?rate, "user interest rate updated");

        self.find_by_id(id)
            .await?
            .ok_or(RepositoryError::UserNotFound)
    }
}

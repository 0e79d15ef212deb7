//! Shared helpers for database integration tests.
//!
//! The tests run against the schema created by the migrator and are skipped
//! when `DATABASE_URL` is not set.

#![allow(dead_code)]

use loandesk_db::repositories::{NewUser, UserRepository};
use loandesk_db::entities::users;
use loandesk_shared::Role;
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

/// Connects to the test database, or returns `None` when none is configured.
pub async fn connect() -> Option<DatabaseConnection> {
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(
        Database::connect(&url)
            .await
            .expect("Failed to connect to database"),
    )
}

/// Creates a borrower with a completed profile.
pub async fn borrower(db: &DatabaseConnection, loan_limit: Decimal) -> users::Model {
    create_user(db, Role::User, true, loan_limit).await
}

/// Creates a user with the given role and profile state.
pub async fn create_user(
    db: &DatabaseConnection,
    role: Role,
    profile_completed: bool,
    loan_limit: Decimal,
) -> users::Model {
    UserRepository::new(db.clone())
        .create(NewUser {
            email: format!("test-{}@example.com", Uuid::new_v4()),
            full_name: Some("Test Borrower".to_string()),
            role,
            email_verified: true,
            profile_completed,
            loan_limit,
        })
        .await
        .expect("Failed to create user")
}

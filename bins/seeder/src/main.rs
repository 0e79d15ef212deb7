//! Database seeder for Loandesk development and testing.
//!
//! Seeds an admin, a verified borrower and an initial global interest rate.
//! When `LOANDESK__JWT__SECRET` is set, prints bearer tokens for both users.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use loandesk_db::entities::users;
use loandesk_db::repositories::NewUser;
use loandesk_db::{InterestRateRepository, UserRepository};
use loandesk_shared::{JwtConfig, JwtService, Role};

const ADMIN_EMAIL: &str = "admin@loandesk.dev";
const BORROWER_EMAIL: &str = "borrower@loandesk.dev";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = loandesk_db::connect(&database_url)
        .await
        .context("failed to connect to database")?;

    println!("Seeding admin...");
    let admin = seed_user(
        &db,
        NewUser {
            email: ADMIN_EMAIL.to_string(),
            full_name: Some("Loandesk Admin".to_string()),
            role: Role::Admin,
            email_verified: true,
            profile_completed: true,
            loan_limit: Decimal::ZERO,
        },
    )
    .await?;

    println!("Seeding borrower...");
    let borrower = seed_user(
        &db,
        NewUser {
            email: BORROWER_EMAIL.to_string(),
            full_name: Some("Test Borrower".to_string()),
            role: Role::User,
            email_verified: true,
            profile_completed: true,
            loan_limit: Decimal::new(5000, 0),
        },
    )
    .await?;

    println!("Seeding global interest rate...");
    seed_interest_rate(&db).await?;

    if let Ok(secret) = std::env::var("LOANDESK__JWT__SECRET") {
        let jwt = JwtService::new(JwtConfig {
            secret,
            ..JwtConfig::default()
        });
        println!(
            "  admin token:    {}",
            jwt.generate_access_token(admin.id, Role::Admin)?
        );
        println!(
            "  borrower token: {}",
            jwt.generate_access_token(borrower.id, Role::User)?
        );
    }

    println!("Seeding complete!");
    Ok(())
}

/// Creates the user unless one with the same email exists.
async fn seed_user(db: &DatabaseConnection, input: NewUser) -> anyhow::Result<users::Model> {
    let repo = UserRepository::new(db.clone());

    if let Some(existing) = repo.find_by_email(&input.email).await? {
        println!("  {} already exists, skipping...", existing.email);
        return Ok(existing);
    }

    let user = repo.create(input).await?;
    println!("  Created {} ({})", user.email, user.id);
    Ok(user)
}

/// Sets the first global rate when the log is empty.
async fn seed_interest_rate(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = InterestRateRepository::new(db.clone());

    if let Some(current) = repo.latest().await? {
        println!("  Global rate already set to {}%, skipping...", current.rate);
        return Ok(());
    }

    let row = repo.append(Some(Decimal::new(10, 0))).await?;
    println!("  Global rate set to {}%", row.rate);
    Ok(())
}

//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for borrowers and admins
//! - Authentication middleware
//! - Request extractors
//! - The response envelope

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod notifier;
pub mod response;
pub mod routes;

use axum::Router;
use loandesk_db::{
    InterestRateRepository, LoanRepository, LoanRequestRepository, RepaymentSlipRepository,
    StatisticsRepository, UserRepository,
};
use loandesk_shared::JwtService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use notifier::Notifier;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Fire-and-forget email notifications.
    pub notifier: Notifier,
}

impl AppState {
    /// User repository.
    #[must_use]
    pub fn users(&self) -> UserRepository {
        UserRepository::new((*self.db).clone())
    }

    /// Loan account repository.
    #[must_use]
    pub fn loans(&self) -> LoanRepository {
        LoanRepository::new((*self.db).clone())
    }

    /// Repayment slip repository.
    #[must_use]
    pub fn slips(&self) -> RepaymentSlipRepository {
        RepaymentSlipRepository::new((*self.db).clone())
    }

    /// Loan request repository.
    #[must_use]
    pub fn loan_requests(&self) -> LoanRequestRepository {
        LoanRequestRepository::new((*self.db).clone())
    }

    /// Global interest-rate log.
    #[must_use]
    pub fn interest_rates(&self) -> InterestRateRepository {
        InterestRateRepository::new((*self.db).clone())
    }

    /// Statistics repository.
    #[must_use]
    pub fn statistics(&self) -> StatisticsRepository {
        StatisticsRepository::new((*self.db).clone())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

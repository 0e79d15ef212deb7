//! Admin loan management routes.
//!
//! Mounted behind both the auth middleware and the admin role check.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use loandesk_core::loan::LoanSummary;
use loandesk_core::request::{LoanRequest, LoanRequestStatus};
use loandesk_core::statistics::LoanStatistics;
use loandesk_db::entities::{interest_rates, users};
use loandesk_db::repositories::{ActiveLoanRow, LoanDetails, LoanRequestRow};
use loandesk_shared::EmailContent;
use loandesk_shared::types::{LoanRequestId, PageRequest, PageResponse, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::ValidatedJson;
use crate::response::ApiResponse;

const DEFAULT_ACTIVE_LIMIT: u64 = 20;
const DEFAULT_REQUEST_LIMIT: u64 = 10;

/// Creates the admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/loan/statistics", get(statistics))
        .route("/loan/active", get(active_loans))
        .route("/loan/user/{user_id}/active", get(loan_details))
        .route("/loan/user/{user_id}/previous", get(previous_loans))
        .route("/loan/user/{user_id}/interest-rate", put(set_user_rate))
        .route("/loan/set-global-interest-rate", post(set_global_rate))
        .route("/loan/interest-rates", get(rate_history))
        .route("/loan/requests", get(list_requests))
        .route("/loan/requests/{id}/status", put(update_request_status))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query for `GET /loan/active`.
#[derive(Debug, Deserialize)]
pub struct ActiveLoansQuery {
    /// Page number, 1-based.
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
    /// Matches borrower name or email.
    pub search: Option<String>,
}

/// Query for `GET /loan/requests`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequestsQuery {
    /// Page number, 1-based.
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
    /// Restricts the list to one borrower.
    pub user_id: Option<Uuid>,
}

/// Body of `POST /loan/set-global-interest-rate`.
#[derive(Debug, Deserialize, Validate)]
pub struct GlobalRateBody {
    /// New rate in percent.
    #[serde(default)]
    pub rate: Option<Decimal>,
}

/// Body of `PUT /loan/user/{user_id}/interest-rate`. `null` clears the override.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserRateBody {
    /// Personal rate in percent.
    #[serde(default)]
    pub interest_rate: Option<Decimal>,
}

/// Body of `PUT /loan/requests/{id}/status`.
#[derive(Debug, Deserialize, Validate)]
pub struct StatusBody {
    /// Target status.
    #[validate(length(min = 1, message = "is required"))]
    pub status: String,
}

/// One entry of the global rate log.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestRateEntry {
    /// Entry ID.
    pub id: Uuid,
    /// Rate in percent.
    pub rate: Decimal,
    /// When it took effect.
    pub effective_date: DateTime<Utc>,
}

impl From<interest_rates::Model> for InterestRateEntry {
    fn from(model: interest_rates::Model) -> Self {
        Self {
            id: model.id,
            rate: model.rate,
            effective_date: model.effective_date.with_timezone(&Utc),
        }
    }
}

/// A user's personal rate after an update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRateResponse {
    /// User.
    pub user_id: Uuid,
    /// Email.
    pub email: String,
    /// Personal rate, `None` when the global rate applies.
    pub interest_rate: Option<Decimal>,
}

impl From<users::Model> for UserRateResponse {
    fn from(model: users::Model) -> Self {
        Self {
            user_id: model.id,
            email: model.email,
            interest_rate: model.interest_rate,
        }
    }
}

fn parse_status(value: &str) -> Result<LoanRequestStatus, ApiError> {
    LoanRequestStatus::parse(value.trim()).ok_or_else(|| {
        ApiError::validation("status must be one of pending, approved, rejected, completed")
    })
}

// ============================================================================
// Handlers
// ============================================================================

async fn statistics(State(state): State<AppState>) -> ApiResult<ApiResponse<LoanStatistics>> {
    let stats = state.statistics().loan_statistics().await?;
    Ok(ApiResponse::ok("Loan statistics fetched successfully", stats))
}

async fn active_loans(
    State(state): State<AppState>,
    Query(query): Query<ActiveLoansQuery>,
) -> ApiResult<ApiResponse<PageResponse<ActiveLoanRow>>> {
    let page = PageRequest::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(DEFAULT_ACTIVE_LIMIT),
    );
    let rows = state
        .loans()
        .active_page(page, query.search.as_deref())
        .await?;
    Ok(ApiResponse::ok("Active loans fetched successfully", rows))
}

async fn loan_details(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<ApiResponse<LoanDetails>> {
    let details = state
        .loans()
        .details_for_user(UserId::from_uuid(user_id))
        .await?;
    Ok(ApiResponse::ok("Loan details fetched successfully", details))
}

async fn previous_loans(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<ApiResponse<Vec<LoanSummary>>> {
    let loans = state
        .loans()
        .previous_for_user(UserId::from_uuid(user_id))
        .await?;
    Ok(ApiResponse::ok("Previous loans fetched successfully", loans))
}

async fn set_user_rate(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UserRateBody>,
) -> ApiResult<ApiResponse<UserRateResponse>> {
    let user = state
        .users()
        .set_interest_rate(UserId::from_uuid(user_id), body.interest_rate)
        .await?;
    Ok(ApiResponse::ok(
        "User interest rate updated successfully",
        UserRateResponse::from(user),
    ))
}

async fn set_global_rate(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<GlobalRateBody>,
) -> ApiResult<ApiResponse<InterestRateEntry>> {
    let row = state.interest_rates().append(body.rate).await?;
    Ok(ApiResponse::created(
        "Global interest rate updated successfully",
        InterestRateEntry::from(row),
    ))
}

async fn rate_history(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<InterestRateEntry>>> {
    let rows = state.interest_rates().history().await?;
    Ok(ApiResponse::ok(
        "Interest rate history fetched successfully",
        rows.into_iter().map(InterestRateEntry::from).collect(),
    ))
}

async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<LoanRequestsQuery>,
) -> ApiResult<ApiResponse<PageResponse<LoanRequestRow>>> {
    let page = PageRequest::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(DEFAULT_REQUEST_LIMIT),
    );
    let rows = state
        .loan_requests()
        .list(page, query.user_id.map(UserId::from_uuid))
        .await?;
    Ok(ApiResponse::ok("Loan requests fetched successfully", rows))
}

async fn update_request_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<StatusBody>,
) -> ApiResult<ApiResponse<LoanRequest>> {
    let to = parse_status(&body.status)?;
    let request = state
        .loan_requests()
        .update_status(LoanRequestId::from_uuid(id), to)
        .await?;

    state
        .notifier
        .dispatch(notify_borrower_of_status(state.clone(), request.clone()));

    Ok(ApiResponse::ok("Loan request updated successfully", request))
}

/// Emails the borrower about a status change. Runs off the request path.
async fn notify_borrower_of_status(state: AppState, request: LoanRequest) {
    let borrower = match state.users().borrower(request.user_id).await {
        Ok(borrower) => borrower,
        Err(e) => {
            warn!(user_id = %request.user_id, error = %e, "skipping status notification");
            return;
        }
    };

    state.notifier.notify(
        borrower.email.clone(),
        EmailContent::loan_request_status_changed(
            borrower.display_name(),
            &request.request_id,
            request.status.as_str(),
        ),
    );
}

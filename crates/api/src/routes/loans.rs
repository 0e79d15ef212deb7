//! Borrower loan routes.
//!
//! Everything here runs for the caller named in the bearer token; the body
//! never chooses whose loan is touched.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use loandesk_core::interest::{CurrentInterest, InterestPolicy};
use loandesk_core::loan::{LoanAccount, LoanEligibility, RepaymentOutcome, RepaymentSlip, TakeLoanInput};
use loandesk_shared::EmailContent;
use loandesk_shared::types::{LoanId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::middleware::{AuthUser, MaybeAuthUser};
use crate::response::ApiResponse;
use crate::AppState;

/// Routes that require an authenticated caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/loan/eligibility", get(eligibility))
        .route("/loan/fetch/current-loan", get(current_loan))
        .route("/loan/take", post(take_loan))
        .route("/loan/repayments/pay", post(pay))
        .route("/loan/repayments/upload-slip", post(upload_slip))
        .route("/loan/fetch/user-repayments", get(user_repayments))
}

/// Routes where a bearer token is optional.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/loan/current-interest", get(current_interest))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Rejects zero and negative amounts.
pub(crate) fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_positive() && !value.is_zero() {
        Ok(())
    } else {
        Err(ValidationError::new("positive").with_message("must be greater than zero".into()))
    }
}

/// Body of `POST /loan/take`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TakeLoanBody {
    /// Principal.
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    /// Term in months.
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub total_months: i32,
}

/// Body of `POST /loan/repayments/pay`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBody {
    /// Loan being repaid.
    pub loan_id: Uuid,
    /// Amount paid.
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
}

/// Body of `POST /loan/repayments/upload-slip`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SlipBody {
    /// Loan the slip belongs to.
    pub loan_id: Uuid,
    /// Amount on the slip.
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    /// Where the slip image is stored.
    #[validate(length(min = 1, message = "is required"))]
    pub slip_url: String,
}

/// Data returned after a repayment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    /// The loan after the payment.
    pub loan: LoanAccount,
    /// Whole months covered by this payment.
    pub months_covered: i32,
    /// Principal share of the payment.
    pub principal_payment: Decimal,
    /// Whether the loan is now completed.
    pub completed: bool,
    /// Completion time, when completed.
    pub completion_date: Option<DateTime<Utc>>,
}

impl From<RepaymentOutcome> for PaymentResponse {
    fn from(outcome: RepaymentOutcome) -> Self {
        Self {
            completion_date: outcome.account.completion_date,
            loan: outcome.account,
            months_covered: outcome.months_covered,
            principal_payment: outcome.principal_payment,
            completed: outcome.completed,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn current_interest(
    State(state): State<AppState>,
    MaybeAuthUser(claims): MaybeAuthUser,
) -> ApiResult<ApiResponse<CurrentInterest>> {
    let latest = state.interest_rates().latest().await?;

    let caller_override = match claims {
        Some(claims) => state
            .users()
            .find_by_id(UserId::from_uuid(claims.user_id()))
            .await?
            .map(|user| user.interest_rate),
        None => None,
    };

    Ok(ApiResponse::ok(
        "Interest rate information fetched successfully",
        InterestPolicy::current(latest, caller_override),
    ))
}

async fn eligibility(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<LoanEligibility>> {
    let borrower = state.users().borrower(auth.user_id()).await?;
    let active = state.loans().find_active_for_user(auth.user_id()).await?;
    let latest = state.interest_rates().latest().await?.map(|g| g.rate);

    Ok(ApiResponse::ok(
        "Loan eligibility fetched successfully",
        LoanEligibility::evaluate(&borrower, active.as_ref(), latest),
    ))
}

async fn current_loan(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<LoanAccount>> {
    let loan = state.loans().current_for_user(auth.user_id()).await?;
    Ok(ApiResponse::ok("Current loan fetched successfully", loan))
}

async fn take_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<TakeLoanBody>,
) -> ApiResult<ApiResponse<LoanAccount>> {
    let input = TakeLoanInput {
        amount: body.amount,
        total_months: body.total_months,
    };
    let loan = state.loans().take_loan(auth.user_id(), input).await?;

    Ok(ApiResponse::created("Loan created successfully", loan))
}

async fn pay(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<PaymentBody>,
) -> ApiResult<ApiResponse<PaymentResponse>> {
    let outcome = state
        .loans()
        .apply_payment(LoanId::from_uuid(body.loan_id), auth.user_id(), body.amount)
        .await?;

    Ok(ApiResponse::ok(
        "Repayment applied successfully",
        PaymentResponse::from(outcome),
    ))
}

async fn upload_slip(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<SlipBody>,
) -> ApiResult<ApiResponse<RepaymentSlip>> {
    let slip = state
        .slips()
        .upload(
            LoanId::from_uuid(body.loan_id),
            auth.user_id(),
            body.amount,
            body.slip_url.trim(),
        )
        .await?;

    state
        .notifier
        .dispatch(notify_admins_of_slip(state.clone(), slip.clone()));

    Ok(ApiResponse::created(
        "Repayment slip uploaded successfully",
        slip,
    ))
}

async fn user_repayments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<Vec<RepaymentSlip>>> {
    let slips = state.slips().list_for_user(auth.user_id()).await?;
    Ok(ApiResponse::ok("Repayment history fetched successfully", slips))
}

/// Emails every admin about a new slip. Runs off the request path; lookup
/// failures are logged only.
async fn notify_admins_of_slip(state: AppState, slip: RepaymentSlip) {
    let borrower = match state.users().borrower(slip.user_id).await {
        Ok(borrower) => borrower,
        Err(e) => {
            warn!(user_id = %slip.user_id, error = %e, "skipping slip notification");
            return;
        }
    };
    let admins = match state.users().list_admins().await {
        Ok(admins) => admins,
        Err(e) => {
            warn!(error = %e, "skipping slip notification");
            return;
        }
    };

    let content =
        EmailContent::repayment_slip_uploaded(borrower.display_name(), slip.amount, &slip.slip_url);
    for admin in admins {
        state.notifier.notify(admin.email, content.clone());
    }
}

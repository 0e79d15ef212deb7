//! Loan request routes for borrowers.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use loandesk_core::request::{Installment, LoanRequest, LoanRequestInput, TenureType};
use loandesk_shared::types::{InstallmentId, LoanRequestId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::middleware::AuthUser;
use crate::response::ApiResponse;
use crate::routes::loans::positive_amount;

/// Creates the loan request routes (auth middleware applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/request-loan", post(request_loan))
        .route("/request-loan/{id}/installments", get(installments))
        .route(
            "/request-loan/{id}/installments/{installment_id}/pay",
            post(pay_installment),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of `POST /request-loan`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequestLoanBody {
    /// Principal asked for.
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    /// Unit of the tenure.
    pub tenure_type: TenureType,
    /// Number of installments.
    #[validate(range(min = 1, max = 360, message = "must be between 1 and 360"))]
    pub tenure_value: i32,
}

/// A created request with its schedule.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    /// The request.
    #[serde(flatten)]
    pub request: LoanRequest,
    /// Installments in due order.
    pub installments: Vec<Installment>,
}

/// Result of paying an installment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPaymentResponse {
    /// The request after the payment.
    pub loan_request: LoanRequest,
    /// The paid installment.
    pub installment: Installment,
    /// Whether the request is now completed.
    pub completed: bool,
}

// ============================================================================
// Handlers
// ============================================================================

async fn request_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<RequestLoanBody>,
) -> ApiResult<ApiResponse<SubmissionResponse>> {
    let input = LoanRequestInput {
        amount: body.amount,
        tenure_type: body.tenure_type,
        tenure_value: body.tenure_value,
    };
    let submission = state.loan_requests().submit(auth.user_id(), input).await?;

    Ok(ApiResponse::created(
        "Loan requested successfully",
        SubmissionResponse {
            request: submission.request,
            installments: submission.installments,
        },
    ))
}

async fn installments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<Vec<Installment>>> {
    let rows = state
        .loan_requests()
        .installments(LoanRequestId::from_uuid(id), auth.user_id(), auth.is_admin())
        .await?;
    Ok(ApiResponse::ok("Loan installment fetched successfully", rows))
}

async fn pay_installment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, installment_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<ApiResponse<InstallmentPaymentResponse>> {
    let payment = state
        .loan_requests()
        .pay_installment(
            LoanRequestId::from_uuid(id),
            InstallmentId::from_uuid(installment_id),
            auth.user_id(),
        )
        .await?;

    Ok(ApiResponse::ok(
        "Installment paid successfully",
        InstallmentPaymentResponse {
            loan_request: payment.request,
            installment: payment.installment,
            completed: payment.completed,
        },
    ))
}

//! API route definitions.

use axum::{Router, middleware};

use crate::AppState;
use crate::middleware::{auth_middleware, require_admin};

pub mod admin;
pub mod health;
pub mod loan_requests;
pub mod loans;

/// Creates the API router.
///
/// `/user` routes require a valid token, except the current-interest lookup
/// where it is optional. `/admin` routes additionally require the admin role.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let user_routes = Router::new()
        .merge(loans::routes())
        .merge(loan_requests::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = admin::routes()
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .nest("/user", loans::public_routes().merge(user_routes))
        .nest("/admin", admin_routes)
}

//! Balance routes: read and administrative overwrite.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::AuthUser};
use punt_db::UserRepository;
use punt_db::repositories::UserError;

/// Creates the balance routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/balance", get(get_balance))
        .route("/balance", post(set_balance))
}

/// Request body for overwriting a balance.
#[derive(Debug, Deserialize)]
pub struct SetBalanceRequest {
    /// The new balance value.
    pub balance: Decimal,
}

/// Response carrying an account balance.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Current balance.
    pub balance: Decimal,
}

/// GET /balance - Read the authenticated user's balance.
async fn get_balance(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.get_balance(auth.user_id()).await {
        Ok(balance) => (StatusCode::OK, Json(BalanceResponse { balance })).into_response(),
        Err(UserError::NotFound(_)) => account_not_found(),
        Err(e) => {
            error!(error = %e, "Database error fetching balance");
            storage_error("Error fetching balance")
        }
    }
}

/// POST /balance - Overwrite the authenticated user's balance.
///
/// This is an administrative adjustment; the repository serializes it
/// against concurrent settlements.
async fn set_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SetBalanceRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.set_balance(auth.user_id(), payload.balance).await {
        Ok(balance) => {
            info!(user_id = %auth.user_id(), "Balance overwritten");
            (StatusCode::OK, Json(BalanceResponse { balance })).into_response()
        }
        Err(UserError::NotFound(_)) => account_not_found(),
        Err(e) => {
            error!(error = %e, "Database error updating balance");
            storage_error("Error updating balance")
        }
    }
}

fn account_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "account_not_found",
            "message": "Account not found"
        })),
    )
        .into_response()
}

fn storage_error(message: &str) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

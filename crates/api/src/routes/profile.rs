//! Profile route: the account view its owner may see.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::AuthUser};
use punt_db::UserRepository;
use punt_db::repositories::UserError;

/// Creates the profile routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

/// Response for a profile read.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// The username chosen at registration.
    pub username: String,
    /// Current balance.
    pub balance: Decimal,
}

/// GET /profile - Read the authenticated user's username and balance.
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.get_profile(auth.user_id()).await {
        Ok(profile) => (
            StatusCode::OK,
            Json(ProfileResponse {
                username: profile.username,
                balance: profile.balance,
            }),
        )
            .into_response(),
        Err(UserError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "account_not_found",
                "message": "Account not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Database error fetching profile");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Error fetching profile"
                })),
            )
                .into_response()
        }
    }
}

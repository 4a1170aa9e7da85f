//! Authentication routes for registration and login.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use punt_core::auth::{hash_password, verify_password};
use punt_db::UserRepository;
use punt_db::repositories::UserError;
use punt_shared::auth::{LoginRequest, RegisterRequest, TokenResponse};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// POST /auth/register - Create an account and return an identity token.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    // Validation happens before any storage access.
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "missing_fields",
                "message": "Username and password are required"
            })),
        )
            .into_response();
    }

    let email = payload.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    let phone_number = payload
        .phone_number
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    if email.is_none() && phone_number.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "missing_contact",
                "message": "Either an email or a phone number is required"
            })),
        )
            .into_response();
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Password hashing failed during registration");
            return internal_error("An error occurred during registration");
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());

    // Uniqueness is enforced by the store, so racing registrations cannot
    // both succeed.
    let user = match user_repo
        .create(payload.username.trim(), &password_hash, email, phone_number)
        .await
    {
        Ok(u) => u,
        Err(UserError::DuplicateIdentity) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "duplicate_identity",
                    "message": "Username, email, or phone number already exists"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during registration");
            return internal_error("An error occurred during registration");
        }
    };

    let token = match state.jwt_service.issue_token(user.id) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to issue token after registration");
            return internal_error("An error occurred during registration");
        }
    };

    info!(user_id = %user.id, "User registered");

    (
        StatusCode::CREATED,
        Json(TokenResponse::new(token, state.jwt_service.token_expires_in())),
    )
        .into_response()
}

/// POST /auth/login - Authenticate and return an identity token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "missing_fields",
                "message": "Username and password are required"
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_username(payload.username.trim()).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(username = %payload.username, "Login attempt for unknown username");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error("An error occurred during login");
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("An error occurred during login");
        }
    }

    let token = match state.jwt_service.issue_token(user.id) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to issue token after login");
            return internal_error("An error occurred during login");
        }
    };

    info!(user_id = %user.id, "User logged in");

    (
        StatusCode::OK,
        Json(TokenResponse::new(token, state.jwt_service.token_expires_in())),
    )
        .into_response()
}

/// Identical body for unknown-username and wrong-password, so login failures
/// cannot be used to probe which usernames exist.
fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid username or password"
        })),
    )
        .into_response()
}

fn internal_error(message: &str) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

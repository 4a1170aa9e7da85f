//! Wager routes: settlement and outcome history.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use punt_core::settlement::SettlementError;
use punt_db::SettlementRepository;
use punt_db::entities::wager_outcomes;
use punt_db::repositories::{SettleError, SettleInput};

/// Creates the wager routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wagers/settle", post(settle_wager))
        .route("/wagers", get(list_wagers))
}

/// Request body for settling a wager outcome.
#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    /// Amount staked.
    pub bet_amount: Decimal,
    /// Amount returned to the account.
    pub payout: Decimal,
    /// Opaque wager-shape payload.
    pub panels: serde_json::Value,
    /// Opaque outcome-detail payload.
    pub outcome: serde_json::Value,
    /// Optional idempotency key; retrying with the same key settles once.
    #[serde(default)]
    pub request_id: Option<Uuid>,
}

/// Response for a settled wager.
#[derive(Debug, Serialize)]
pub struct SettleResponse {
    /// Ledger record ID.
    pub outcome_id: Uuid,
    /// Balance after the settlement.
    pub new_balance: Decimal,
    /// True when an idempotent replay returned an earlier receipt.
    pub replayed: bool,
}

/// A single ledger record in API form.
#[derive(Debug, Serialize)]
pub struct WagerRecord {
    /// Ledger record ID.
    pub id: Uuid,
    /// Amount staked.
    pub bet_amount: Decimal,
    /// Amount returned to the account.
    pub payout: Decimal,
    /// Opaque wager-shape payload.
    pub panels: serde_json::Value,
    /// Opaque outcome-detail payload.
    pub outcome: serde_json::Value,
    /// Balance snapshot right after this record.
    pub balance_after: Decimal,
    /// Commit time.
    pub created_at: DateTime<FixedOffset>,
}

impl From<wager_outcomes::Model> for WagerRecord {
    fn from(record: wager_outcomes::Model) -> Self {
        Self {
            id: record.id,
            bet_amount: record.bet_amount,
            payout: record.payout,
            panels: record.panels,
            outcome: record.outcome,
            balance_after: record.balance_after,
            created_at: record.created_at,
        }
    }
}

/// Response for the outcome history.
#[derive(Debug, Serialize)]
pub struct WagersResponse {
    /// Ledger records in creation order.
    pub wagers: Vec<WagerRecord>,
}

/// POST /wagers/settle - Record a wager outcome and adjust the balance.
///
/// The ledger record and the balance update commit atomically; on any
/// failure the caller sees an error and no state has changed.
async fn settle_wager(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SettleRequest>,
) -> impl IntoResponse {
    let repo = SettlementRepository::new((*state.db).clone(), state.settlement_engine);

    let input = SettleInput {
        bet_amount: payload.bet_amount,
        payout: payload.payout,
        panels: payload.panels,
        outcome: payload.outcome,
        request_id: payload.request_id,
    };

    match repo.settle(auth.user_id(), input).await {
        Ok(receipt) => {
            info!(
                user_id = %auth.user_id(),
                outcome_id = %receipt.outcome_id,
                replayed = receipt.replayed,
                "Wager settled"
            );
            (
                StatusCode::OK,
                Json(SettleResponse {
                    outcome_id: receipt.outcome_id,
                    new_balance: receipt.new_balance,
                    replayed: receipt.replayed,
                }),
            )
                .into_response()
        }
        Err(SettleError::AccountNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "account_not_found",
                "message": "Account not found"
            })),
        )
            .into_response(),
        Err(SettleError::Rejected(SettlementError::InsufficientFunds { .. })) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "insufficient_funds",
                "message": "Balance cannot cover this wager"
            })),
        )
            .into_response(),
        Err(SettleError::Rejected(e)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amounts",
                "message": e.to_string()
            })),
        )
            .into_response(),
        Err(SettleError::Database(e)) => {
            // Internal detail stays in the logs, never in the response.
            error!(error = %e, user_id = %auth.user_id(), "Settlement failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "settlement_failed",
                    "message": "Error processing wager outcome"
                })),
            )
                .into_response()
        }
    }
}

/// GET /wagers - List the authenticated user's outcome history.
async fn list_wagers(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = SettlementRepository::new((*state.db).clone(), state.settlement_engine);

    match repo.list_for_user(auth.user_id()).await {
        Ok(records) => (
            StatusCode::OK,
            Json(WagersResponse {
                wagers: records.into_iter().map(WagerRecord::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Database error listing wager outcomes");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Error fetching wager history"
                })),
            )
                .into_response()
        }
    }
}

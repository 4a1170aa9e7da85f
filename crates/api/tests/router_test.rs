//! Router-level tests for authentication gating.
//!
//! Every balance-affecting or balance-reading route must reject requests
//! with no credential, and requests with a tampered or expired credential,
//! before any storage access. A `MockDatabase` with no prepared results
//! backs the state, so any handler that touched storage on these paths
//! would surface as a 500 instead of the expected 401/400.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use tower::ServiceExt;
use uuid::Uuid;

use punt_api::{AppState, create_router};
use punt_core::settlement::SettlementEngine;
use punt_db::entities::users;
use punt_shared::{JwtConfig, JwtService};

const TEST_SECRET: &str = "router-test-secret";

fn jwt_service(expires_hours: i64) -> JwtService {
    JwtService::new(JwtConfig {
        secret: TEST_SECRET.to_string(),
        token_expires_hours: expires_hours,
    })
}

fn test_router(db: DatabaseConnection) -> Router {
    create_router(AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service(24)),
        settlement_engine: SettlementEngine::default(),
    })
}

fn empty_mock_router() -> Router {
    test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

async fn error_code(response: axum::response::Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    json["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = empty_mock_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_routes_reject_missing_token() {
    for (method, uri) in [
        ("GET", "/api/v1/balance"),
        ("POST", "/api/v1/balance"),
        ("POST", "/api/v1/wagers/settle"),
        ("GET", "/api/v1/wagers"),
        ("GET", "/api/v1/profile"),
    ] {
        let app = empty_mock_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} should require a token"
        );
        assert_eq!(error_code(response).await, "missing_token");
    }
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let app = empty_mock_router();

    // Signed with a different secret.
    let forged = JwtService::new(JwtConfig {
        secret: "some-other-secret".to_string(),
        token_expires_hours: 24,
    })
    .issue_token(Uuid::new_v4())
    .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/balance")
                .header(AUTHORIZATION, forged)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "invalid_token");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = empty_mock_router();

    let expired = jwt_service(-1).issue_token(Uuid::new_v4()).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/balance")
                .header(AUTHORIZATION, expired)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "token_expired");
}

#[tokio::test]
async fn test_valid_token_reaches_handler() {
    let user_id = Uuid::new_v4();
    let now = chrono::Utc::now().fixed_offset();
    let user = users::Model {
        id: user_id,
        username: "punter".to_string(),
        password_hash: "hash".to_string(),
        email: Some("punter@example.com".to_string()),
        phone_number: None,
        balance: dec!(1000.00),
        created_at: now,
        updated_at: now,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user]])
        .into_connection();
    let app = test_router(db);

    let token = jwt_service(24).issue_token(user_id).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/balance")
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["balance"], serde_json::json!("1000.00"));
}

#[tokio::test]
async fn test_register_validates_before_storage() {
    // Missing contact details: rejected without a single query (the empty
    // mock would turn any query into a 500).
    let app = empty_mock_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": "punter",
                        "password": "hunter2"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "missing_contact");
}

#[tokio::test]
async fn test_login_validates_before_storage() {
    let app = empty_mock_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": "",
                        "password": ""
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "missing_fields");
}

//! Router behavior that never reaches the database
//!
//! The pool is lazy and points at a closed port, so any request that did
//! touch storage would fail with a 500 instead of the expected status.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chirp_server::db::{create_lazy_pool, Session};
use chirp_server::models::{ApiToken, UserName};
use chirp_server::services::UserService;
use chirp_server::http::{build_router, AppState};
use chirp_server::Settings;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.database_url = "postgres://nobody@127.0.0.1:1/none".into();
    settings.upload_dir = std::env::temp_dir().join("chirp-router-test");
    settings
}

fn app() -> Router {
    let settings = test_settings();
    let pool = create_lazy_pool(&settings).unwrap();
    build_router(AppState::new(pool, settings))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    send_to(app(), request).await
}

async fn send_to(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn missing_api_key_is_unauthorized() {
    let (status, body) = send(
        Request::get("/api/tweets")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["result"], false);
    assert_eq!(body["error_type"], "unauthorized");
}

#[tokio::test]
async fn empty_api_key_is_unauthorized() {
    let (status, _) = send(
        Request::delete("/api/tweets/1/likes")
            .header("api-key", "")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn out_of_range_ids_are_rejected() {
    for path in ["/api/users/0", "/api/users/1000001", "/api/users/abc"] {
        let (status, body) = send(Request::get(path).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", path);
        assert_eq!(body["error_type"], "validation_error");
    }
}

#[tokio::test]
async fn malformed_registration_body_is_rejected() {
    let (status, body) = send(
        Request::post("/api/users")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "alice"}"#))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["result"], false);
}

#[tokio::test]
async fn registration_validates_before_storage() {
    let (status, body) = send(
        Request::post("/api/users")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "", "token": "t"}"#))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_messages"], "name cannot be empty");
}

#[tokio::test]
async fn health_is_public() {
    let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[sqlx::test(migrator = "chirp_server::db::MIGRATOR")]
#[ignore = "requires database"]
async fn unknown_api_key_is_unauthorized(pool: PgPool) {
    let mut session = Session::new(pool.clone());
    UserService::new(&mut session)
        .create(UserName::new("alice").unwrap(), ApiToken::new("known").unwrap())
        .await
        .unwrap();

    let app = build_router(AppState::new(pool, test_settings()));
    let request = |key: &str| {
        Request::get("/api/tweets")
            .header("api-key", key)
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = send_to(app.clone(), request("nope")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["result"], false);
    assert_eq!(body["error_type"], "unauthorized");
    assert_eq!(body["error_messages"], "Authorization error.");

    let (status, body) = send_to(app, request("known")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], true);
    assert_eq!(body["tweets"], serde_json::json!([]));
}

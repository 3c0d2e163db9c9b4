//! End-to-end API tests over the in-memory backend

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use transact_api::api::create_router;
use transact_api::AppConfig;

async fn app() -> Router {
    let config = AppConfig::default();
    let state = transact_api::create_in_memory_app_state(&config)
        .await
        .expect("in-memory state");
    create_router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_with_token(uri: &str, body: Value, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/user/login",
            json!({"email": email, "password": password}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "login failed");

    let body = body_json(response).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_probes() {
    let app = app().await;

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");

    let response = app.oneshot(get("/live")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_seeded_catalog() {
    let app = app().await;

    let response = app.clone().oneshot(get("/api/item")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let response = app.oneshot(get("/api/item/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Épée de Feu");
    assert_eq!(body["data"]["price"], 150.0);
}

#[tokio::test]
async fn test_item_not_found() {
    let app = app().await;

    let response = app.oneshot(get("/api/item/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 404);
}

#[tokio::test]
async fn test_register_then_appears_in_listing() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/user/register",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "passwordHash": "sup3rsecret",
                "confirmPassword": "sup3rsecret"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/api/user")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let raw = String::from_utf8(bytes.to_vec()).unwrap();
    let body: Value = serde_json::from_str(&raw).unwrap();

    let users = body["data"].as_array().unwrap();
    assert!(users.iter().any(|u| u["email"] == "alice@example.com"));
    // Hashes must never cross the wire.
    assert!(!raw.contains("password"));
    assert!(!raw.contains("argon2"));
}

#[tokio::test]
async fn test_register_duplicate_email_is_rejected() {
    let app = app().await;

    let request = json!({
        "username": "impostor",
        "email": "admin@example.com",
        "passwordHash": "sup3rsecret",
        "confirmPassword": "sup3rsecret"
    });

    let response = app
        .clone()
        .oneshot(post_json("/api/user/register", request))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = app().await;

    let response = app
        .oneshot(post_json(
            "/api/user/register",
            json!({
                "username": "a",
                "email": "not-an-email",
                "passwordHash": "short",
                "confirmPassword": "other"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    let validation_errors = body["validationErrors"].as_object().unwrap();
    assert!(validation_errors.contains_key("username"));
    assert!(validation_errors.contains_key("email"));
    assert!(validation_errors.contains_key("passwordHash"));
    assert!(validation_errors.contains_key("confirmPassword"));
}

#[tokio::test]
async fn test_login_wrong_password_is_401() {
    let app = app().await;

    let response = app
        .oneshot(post_json(
            "/api/user/login",
            json!({"email": "admin@example.com", "password": "wrong-password"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_login_unknown_email_is_401() {
    let app = app().await;

    let response = app
        .oneshot(post_json(
            "/api/user/login",
            json!({"email": "nobody@example.com", "password": "whatever123"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_issues_token_and_records_it() {
    let app = app().await;

    let token = login(&app, "admin@example.com", "password123").await;
    assert!(!token.is_empty());

    let response = app
        .oneshot(get_with_token("/api/authtoken", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = app().await;

    for uri in ["/api/transaction", "/api/authtoken"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let response = app
        .oneshot(get_with_token("/api/transaction", "garbage-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_transaction_lifecycle() {
    let app = app().await;
    let token = login(&app, "admin@example.com", "password123").await;

    let response = app
        .clone()
        .oneshot(post_json_with_token(
            "/api/transaction",
            json!({
                "transactionDate": "2024-06-01T12:00:00Z",
                "user": {"id": 1},
                "items": [{"id": 1}, {"id": 2}]
            }),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_with_token("/api/transaction", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let transactions = body["data"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["userId"], 1);
    assert_eq!(transactions[0]["items"].as_array().unwrap().len(), 2);
    assert_eq!(transactions[0]["items"][0]["name"], "Épée de Feu");

    // The user projection includes the transaction.
    let response = app.oneshot(get("/api/user/1")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["transactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_transaction_is_rejected() {
    let app = app().await;
    let token = login(&app, "admin@example.com", "password123").await;

    let response = app
        .clone()
        .oneshot(post_json_with_token(
            "/api/transaction",
            json!({
                "transactionDate": "2024-06-01T12:00:00Z",
                "user": {"id": 1},
                "items": []
            }),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get_with_token("/api/transaction", &token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_transaction_for_missing_user_is_404() {
    let app = app().await;
    let token = login(&app, "admin@example.com", "password123").await;

    let response = app
        .oneshot(post_json_with_token(
            "/api/transaction",
            json!({
                "transactionDate": "2024-06-01T12:00:00Z",
                "user": {"id": 42},
                "items": [{"id": 1}]
            }),
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_item_rejects_transaction() {
    let app = app().await;
    let token = login(&app, "admin@example.com", "password123").await;

    let response = app
        .clone()
        .oneshot(post_json_with_token(
            "/api/transaction",
            json!({
                "transactionDate": "2024-06-01T12:00:00Z",
                "user": {"id": 1},
                "items": [{"id": 1}, {"id": 99}]
            }),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing persisted from the failed batch.
    let response = app
        .oneshot(get_with_token("/api/transaction", &token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_gets_envelope() {
    let app = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/user/login")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body.get("traceId").is_some());
}

#[tokio::test]
async fn test_envelope_shape() {
    let app = app().await;

    let response = app.oneshot(get("/api/item")).await.unwrap();
    let body = body_json(response).await;

    for key in [
        "success",
        "message",
        "data",
        "errors",
        "validationErrors",
        "statusCode",
        "timestamp",
        "traceId",
    ] {
        assert!(body.get(key).is_some(), "missing {}", key);
    }
}

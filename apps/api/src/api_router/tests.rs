use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use crate::handlers::test_support::{INTERNAL_TOKEN, body_json, body_text, in_memory_state};

use super::build_router;

fn router() -> axum::Router {
    let (state, _) = in_memory_state();
    build_router(state, "http://localhost:3000")
        .unwrap_or_else(|error| panic!("router failed to build: {error}"))
}

fn internal_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("GET")
        .uri("/api/internal/profiles/user_ghost");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::empty())
        .unwrap_or_else(|error| panic!("invalid request: {error}"))
}

#[tokio::test]
async fn internal_routes_require_the_bearer_token() {
    let response = router()
        .oneshot(internal_request(None))
        .await
        .unwrap_or_else(|error| panic!("request failed: {error}"));
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router()
        .oneshot(internal_request(Some("wrong-token")))
        .await
        .unwrap_or_else(|error| panic!("request failed: {error}"));
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn internal_routes_admit_the_configured_token() {
    let response = router()
        .oneshot(internal_request(Some(INTERNAL_TOKEN)))
        .await
        .unwrap_or_else(|error| panic!("request failed: {error}"));

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn webhook_route_rejects_unsigned_deliveries() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhooks/clerk")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"type":"user.created","data":{}}"#))
        .unwrap_or_else(|error| panic!("invalid request: {error}"));

    let response = router()
        .oneshot(request)
        .await
        .unwrap_or_else(|error| panic!("request failed: {error}"));

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Error: Missing Svix headers");
}

#[tokio::test]
async fn sync_route_rejects_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/users/sync")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap_or_else(|error| panic!("invalid request: {error}"));

    let response = router()
        .oneshot(request)
        .await
        .unwrap_or_else(|error| panic!("request failed: {error}"));

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn internal_access_check_rejects_malformed_json_as_error_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/internal/access/check")
        .header(header::AUTHORIZATION, format!("Bearer {INTERNAL_TOKEN}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"clerkId":"user_a"}"#))
        .unwrap_or_else(|error| panic!("invalid request: {error}"));

    let response = router()
        .oneshot(request)
        .await
        .unwrap_or_else(|error| panic!("request failed: {error}"));

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|error| error.starts_with("validation error: invalid request body"))
    );
}

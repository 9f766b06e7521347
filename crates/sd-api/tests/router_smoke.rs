use axum::{body::Body, http::Request, http::StatusCode};
use tower::ServiceExt;

#[tokio::test]
async fn livez_healthy_and_api_requires_auth() {
    let state = sd_api::test_state("test-key");
    let app = sd_api::create_router(state);

    let livez_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/livez")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(livez_response.status(), StatusCode::OK);

    let unauthorized = app
        .oneshot(
            Request::builder()
                .uri("/api/clients")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_api_key_is_rejected() {
    let state = sd_api::test_state("right-key");
    let app = sd_api::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard/kpis")
                .header("x-api-key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let state = sd_api::test_state("test-key");
    let app = sd_api::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/payroll")
                .header("x-api-key", "test-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

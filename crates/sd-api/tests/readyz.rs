use axum::{body::Body, http::Request, http::StatusCode};
use tower::ServiceExt;

// /readyz pings the database; with nothing listening it must answer 503, not
// hang or panic.
#[tokio::test]
async fn readyz_reports_unavailable_without_a_database() {
    let state = sd_api::test_state("test-key");
    let app = sd_api::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

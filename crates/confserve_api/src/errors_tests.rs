//! Tests for the error envelope.

use super::*;

async fn envelope_of(err: ApiError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).expect("json"))
}

#[tokio::test]
async fn internal_errors_are_500_with_a_message() {
    let (status, body) = envelope_of(ApiError::internal("backend unavailable: boom")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        serde_json::json!({"message": "backend unavailable: boom"})
    );
}

#[tokio::test]
async fn bad_requests_are_400_with_a_message() {
    let (status, body) = envelope_of(ApiError::bad_request("Unparseable JSON: oops")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, serde_json::json!({"message": "Unparseable JSON: oops"}));
}

#[test]
fn pipeline_errors_convert_to_internal() {
    let err = ApiError::from(config_backend::BackendError::Unavailable(
        "origin down".to_string(),
    ));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.message(), "backend unavailable: origin down");

    let err = ApiError::from(confserve_core::ResolveError::PlaceholderCycle {
        placeholder: "${a}".to_string(),
    });
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.message().contains("${a}"));
}

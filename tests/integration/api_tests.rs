//! API integration tests for routing, request validation and error bodies.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use picture_upload::{RouterConfig, UploadParams, UploadedPicture};

use super::test_utils::{
    create_test_jpeg, jpeg_dimensions, picture_body, upload_request, TestRoot,
};

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let root = TestRoot::new();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = root.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// Request Validation
// =============================================================================

#[tokio::test]
async fn test_path_traversal_identifier_rejected() {
    let root = TestRoot::new();

    let response = root
        .router()
        .oneshot(upload_request(
            "/pictures/..",
            picture_body("a.jpg", &create_test_jpeg(10, 10)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "invalid_identifier");
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_encoded_slash_identifier_rejected() {
    let root = TestRoot::new();

    let response = root
        .router()
        .oneshot(upload_request(
            "/pictures/a%2Fb",
            picture_body("a.jpg", &create_test_jpeg(10, 10)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(root.image_count(), 0);
}

#[tokio::test]
async fn test_non_multipart_body_rejected() {
    let root = TestRoot::new();

    let request = Request::builder()
        .method("POST")
        .uri("/pictures/u1")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = root.router().oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(root.image_count(), 0);
}

#[tokio::test]
async fn test_invalid_width_rejected() {
    let root = TestRoot::new();

    let response = root
        .router()
        .oneshot(upload_request(
            "/pictures/u1?width=-5",
            picture_body("a.jpg", &create_test_jpeg(10, 10)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_huge_width_rejected_before_resize() {
    let root = TestRoot::new();

    let response = root
        .router()
        .oneshot(upload_request(
            "/pictures/big?width=200000",
            picture_body("tiny.jpg", &create_test_jpeg(4, 4)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "invalid_width");
    assert_eq!(root.image_count(), 0);
}

#[tokio::test]
async fn test_configured_max_width_is_inclusive() {
    let root = TestRoot::new();
    let config = RouterConfig::new("/images/")
        .with_max_width(64)
        .with_tracing(false);

    let response = root
        .router_with(config.clone())
        .oneshot(upload_request(
            "/pictures/edge?width=64",
            picture_body("a.jpg", &create_test_jpeg(32, 16)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(jpeg_dimensions(&root.file("images/edge.jpg")), (64, 32));

    let response = root
        .router_with(config)
        .oneshot(upload_request(
            "/pictures/over?width=65",
            picture_body("a.jpg", &create_test_jpeg(32, 16)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!root.file("images/over.jpg").exists());
}

#[tokio::test]
async fn test_cors_preflight_allows_only_content_type() {
    let root = TestRoot::new();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/pictures/u1")
        .header("origin", "https://example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = root.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let allowed = response
        .headers()
        .get("access-control-allow-headers")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_ascii_lowercase();
    assert_eq!(allowed, "content-type");
}

#[tokio::test]
async fn test_get_on_upload_route_not_allowed() {
    let root = TestRoot::new();

    let request = Request::builder()
        .uri("/pictures/u1")
        .body(Body::empty())
        .unwrap();
    let response = root.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_upload_over_limit_rejected() {
    let root = TestRoot::new();
    let router = root.router_with(
        RouterConfig::new("/images/")
            .with_max_upload_size(1024)
            .with_tracing(false),
    );

    let response = router
        .oneshot(upload_request(
            "/pictures/big",
            picture_body("big.jpg", &vec![0u8; 64 * 1024]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(root.image_count(), 0);
}

// =============================================================================
// Library Entry Point
// =============================================================================

#[test]
fn test_process_scenario_writes_expected_file() {
    let root = TestRoot::new();
    let service = root.service();
    let picture = UploadedPicture::new("photo.JPEG", create_test_jpeg(300, 150));

    let path = service
        .process(&picture, &UploadParams::new("/images/", "u42", 100))
        .unwrap();

    assert_eq!(path.as_str(), "/images/u42.jpg");
    assert_eq!(
        service.store().physical_path("/images/", "u42"),
        root.path().join("images/u42.jpg")
    );
    assert_eq!(jpeg_dimensions(&root.file("images/u42.jpg")), (100, 50));
}

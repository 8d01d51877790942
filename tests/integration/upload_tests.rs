//! End-to-end upload tests through the HTTP router.
//!
//! Tests verify:
//! - Missing `get_picture` field yields an empty path and no error
//! - JPEG/PNG/GIF uploads are stored as resized JPEG files
//! - Unrecognized extensions and corrupt content are rejected without writing
//! - Repeated uploads with the same identifier overwrite

use axum::http::StatusCode;
use http_body_util::BodyExt;
use tower::ServiceExt;

use super::test_utils::{
    create_test_gif, create_test_jpeg, create_test_png, create_test_png_rgba, jpeg_dimensions,
    multipart_body, picture_body, upload_request, Part, TestRoot,
};

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

// =============================================================================
// No Upload
// =============================================================================

#[tokio::test]
async fn test_missing_field_returns_empty_path() {
    let root = TestRoot::new();
    let body = multipart_body(&[Part::Text {
        name: "name",
        value: "someone",
    }]);

    let response = root
        .router()
        .oneshot(upload_request("/pictures/u42", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["stored"], false);
    assert_eq!(json["path"], "");
    assert_eq!(root.image_count(), 0);
}

#[tokio::test]
async fn test_empty_form_returns_empty_path() {
    let root = TestRoot::new();

    let response = root
        .router()
        .oneshot(upload_request("/pictures/u42", multipart_body(&[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["path"], "");
}

#[tokio::test]
async fn test_text_value_named_get_picture_is_not_an_upload() {
    let root = TestRoot::new();
    let body = multipart_body(&[Part::Text {
        name: "get_picture",
        value: "not a file",
    }]);

    let response = root
        .router()
        .oneshot(upload_request("/pictures/u42", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["stored"], false);
}

// =============================================================================
// Successful Uploads
// =============================================================================

#[tokio::test]
async fn test_jpeg_upload_resized_and_stored() {
    let root = TestRoot::new();
    let body = picture_body("photo.JPEG", &create_test_jpeg(400, 300));

    let response = root
        .router()
        .oneshot(upload_request("/pictures/u42?width=100", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["stored"], true);
    assert_eq!(json["path"], "/images/u42.jpg");

    assert_eq!(jpeg_dimensions(&root.file("/images/u42.jpg")), (100, 75));
}

#[tokio::test]
async fn test_png_upload_stored_as_jpeg() {
    let root = TestRoot::new();
    let body = picture_body("avatar.png", &create_test_png(90, 60));

    let response = root
        .router()
        .oneshot(upload_request("/pictures/p1?width=45", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(jpeg_dimensions(&root.file("images/p1.jpg")), (45, 30));
}

#[tokio::test]
async fn test_png_with_alpha_upload() {
    let root = TestRoot::new();
    let body = picture_body("transparent.PNG", &create_test_png_rgba(64, 32));

    let response = root
        .router()
        .oneshot(upload_request("/pictures/alpha?width=32", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(jpeg_dimensions(&root.file("images/alpha.jpg")), (32, 16));
}

#[tokio::test]
async fn test_gif_upload_stored_as_jpeg() {
    let root = TestRoot::new();
    let body = picture_body("anim.gif", &create_test_gif(50, 100));

    let response = root
        .router()
        .oneshot(upload_request("/pictures/g1?width=25", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(jpeg_dimensions(&root.file("images/g1.jpg")), (25, 50));
}

#[tokio::test]
async fn test_default_width_applies() {
    let root = TestRoot::new();
    let body = picture_body("a.jpg", &create_test_jpeg(200, 200));

    let response = root
        .router()
        .oneshot(upload_request("/pictures/d1", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(jpeg_dimensions(&root.file("images/d1.jpg")), (100, 100));
}

#[tokio::test]
async fn test_zero_width_keeps_original_size() {
    let root = TestRoot::new();
    let body = picture_body("a.jpg", &create_test_jpeg(123, 77));

    let response = root
        .router()
        .oneshot(upload_request("/pictures/orig?width=0", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(jpeg_dimensions(&root.file("images/orig.jpg")), (123, 77));
}

#[tokio::test]
async fn test_picture_found_among_other_fields() {
    let root = TestRoot::new();
    let jpeg = create_test_jpeg(20, 20);
    let body = multipart_body(&[
        Part::Text {
            name: "caption",
            value: "hello",
        },
        Part::File {
            name: "other_file",
            filename: "ignored.png",
            data: b"not read",
        },
        Part::File {
            name: "get_picture",
            filename: "me.jpg",
            data: &jpeg,
        },
    ]);

    let response = root
        .router()
        .oneshot(upload_request("/pictures/multi?width=10", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(jpeg_dimensions(&root.file("images/multi.jpg")), (10, 10));
}

#[tokio::test]
async fn test_same_identifier_overwrites() {
    let root = TestRoot::new();
    let router = root.router();

    let first = router
        .clone()
        .oneshot(upload_request(
            "/pictures/same?width=80",
            picture_body("a.jpg", &create_test_jpeg(160, 160)),
        ))
        .await
        .unwrap();
    let first_path = json_body(first).await["path"].clone();

    let second = router
        .oneshot(upload_request(
            "/pictures/same?width=40",
            picture_body("b.png", &create_test_png(80, 20)),
        ))
        .await
        .unwrap();
    let second_path = json_body(second).await["path"].clone();

    assert_eq!(first_path, second_path);
    assert_eq!(root.image_count(), 1);
    assert_eq!(jpeg_dimensions(&root.file("images/same.jpg")), (40, 10));
}

// =============================================================================
// Rejected Uploads
// =============================================================================

#[tokio::test]
async fn test_unrecognized_extension_rejected() {
    let root = TestRoot::new();
    let body = picture_body("doc.pdf", b"%PDF-1.4 not an image");

    let response = root
        .router()
        .oneshot(upload_request("/pictures/doc", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let json = json_body(response).await;
    assert_eq!(json["error"], "unsupported_format");
    assert_eq!(root.image_count(), 0);
}

#[tokio::test]
async fn test_filename_without_extension_rejected() {
    let root = TestRoot::new();
    let body = picture_body("picture", &create_test_jpeg(10, 10));

    let response = root
        .router()
        .oneshot(upload_request("/pictures/noext", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(root.image_count(), 0);
}

#[tokio::test]
async fn test_corrupt_png_rejected() {
    let root = TestRoot::new();
    let mut png = create_test_png(64, 64);
    png.truncate(png.len() / 2);

    let response = root
        .router()
        .oneshot(upload_request("/pictures/a", picture_body("a.png", &png)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert_eq!(json["error"], "decode_error");
    assert_eq!(root.image_count(), 0);
}

#[tokio::test]
async fn test_mismatched_extension_rejected() {
    let root = TestRoot::new();
    // PNG bytes declared as JPEG: no content sniffing
    let body = picture_body("photo.jpg", &create_test_png(16, 16));

    let response = root
        .router()
        .oneshot(upload_request("/pictures/mismatch", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!root.file("images/mismatch.jpg").exists());
}

#[tokio::test]
async fn test_missing_destination_directory() {
    let root = TestRoot::new();
    let router = root.router_with(
        picture_upload::RouterConfig::new("/missing/").with_tracing(false),
    );

    let response = router
        .oneshot(upload_request(
            "/pictures/x",
            picture_body("x.jpg", &create_test_jpeg(10, 10)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "io_error");
    assert!(!root.path().join("missing").exists());
}

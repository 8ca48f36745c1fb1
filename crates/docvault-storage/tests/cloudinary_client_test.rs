//! Integration tests for the Cloudinary client against a mock HTTP server.
//!
//! Verifies the request shape (endpoint, signed form fields) and how remote
//! responses map onto store errors.

use docvault_core::{Error, FileType, ObjectStore, ResourceKind, UploadObject};
use docvault_storage::{CloudinaryConfig, CloudinaryStore};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "top-secret-value";

fn store_for(server: &MockServer) -> CloudinaryStore {
    let mut config = CloudinaryConfig::new("demo", "api-key-123", SECRET);
    config.base_url = server.uri();
    config.timeout_seconds = 5;
    CloudinaryStore::new(config).expect("Failed to create store")
}

fn upload_object() -> UploadObject {
    UploadObject {
        desired_id: "4f1c2a".to_string(),
        folder: "documents".to_string(),
        file_type: FileType::Pdf,
        kind: ResourceKind::Image,
    }
}

#[tokio::test]
async fn test_upload_posts_signed_multipart() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/upload"))
        .and(body_string_contains("name=\"signature\""))
        .and(body_string_contains("name=\"api_key\""))
        .and(body_string_contains("api-key-123"))
        .and(body_string_contains("4f1c2a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "public_id": "documents/4f1c2a",
            "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/documents/4f1c2a.pdf",
            "format": "pdf",
            "bytes": 7
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let stored = store
        .upload(b"%PDF-1.", &upload_object())
        .await
        .expect("upload should succeed");

    assert_eq!(stored.remote_id, "documents/4f1c2a");
    assert_eq!(
        stored.locator,
        "https://res.cloudinary.com/demo/image/upload/v1/documents/4f1c2a.pdf"
    );
}

#[tokio::test]
async fn test_upload_rejection_is_upload_error_without_secret() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/upload"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "message": "Invalid Signature" }
        })))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let err = store
        .upload(b"%PDF-1.", &upload_object())
        .await
        .expect_err("401 must fail the upload");

    match err {
        Error::Upload(msg) => {
            assert!(msg.contains("Invalid Signature"), "got {msg}");
            assert!(!msg.contains(SECRET));
        }
        other => panic!("expected upload error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_malformed_response_is_upload_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let err = store.upload(b"x", &upload_object()).await.unwrap_err();
    assert!(matches!(err, Error::Upload(_)), "got {err:?}");
}

#[tokio::test]
async fn test_destroy_ok() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/destroy"))
        .and(body_string_contains("public_id=documents%2F4f1c2a"))
        .and(body_string_contains("invalidate=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": "ok"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    store
        .delete("documents/4f1c2a", ResourceKind::Image)
        .await
        .expect("destroy should succeed");
}

#[tokio::test]
async fn test_destroy_not_found_is_ok() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/destroy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": "not found"
        })))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    assert!(store
        .delete("documents/missing", ResourceKind::Image)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_destroy_server_error_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/destroy"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let err = store
        .delete("documents/4f1c2a", ResourceKind::Image)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Request(_)), "got {err:?}");
}

//! GitHub content store contract tests.
//!
//! Verify the request shapes sent to the README and contents endpoints and
//! how API responses map onto `StorageError`.

use serde_json::json;
use timebar_core::RepositoryId;
use timebar_storage::github::encode_content;
use timebar_storage::{ContentStore, GitHubContentStore, StorageError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store(server: &MockServer) -> GitHubContentStore {
    let repo = RepositoryId::new("octocat/profile").unwrap();
    GitHubContentStore::new(server.uri(), "test-token", repo).unwrap()
}

#[tokio::test]
async fn test_fetch_decodes_readme() {
    let server = MockServer::start().await;

    // GitHub line-wraps the base64 body.
    let mut encoded = encode_content("# Hello\n\nworld\n");
    encoded.insert(8, '\n');

    Mock::given(method("GET"))
        .and(path("/repos/octocat/profile/readme"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "file",
            "encoding": "base64",
            "name": "README.md",
            "path": "README.md",
            "sha": "3d21ec53a331a6f037a91c368710b99387d012c1",
            "content": encoded,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let doc = store(&server).fetch_document().await.unwrap();
    assert_eq!(doc.content, "# Hello\n\nworld\n");
    assert_eq!(doc.path, "README.md");
    assert_eq!(doc.revision, "3d21ec53a331a6f037a91c368710b99387d012c1");
}

#[tokio::test]
async fn test_fetch_unauthorized_is_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/profile/readme"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = store(&server).fetch_document().await.unwrap_err();
    match err {
        StorageError::Authentication { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("Bad credentials"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_missing_repo_is_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/profile/readme"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = store(&server).fetch_document().await.unwrap_err();
    assert!(matches!(err, StorageError::Authentication { status: 404, .. }));
}

#[tokio::test]
async fn test_fetch_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/profile/readme"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = store(&server).fetch_document().await.unwrap_err();
    assert!(matches!(err, StorageError::Api { status: 502, .. }));
}

#[tokio::test]
async fn test_update_sends_encoded_content_and_sha() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/repos/octocat/profile/contents/README.md"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "message": "Update progress",
            "content": encode_content("new body"),
            "sha": "abc123",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": { "path": "README.md", "sha": "def456" },
            "commit": { "sha": "0123456789" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .update_document("README.md", "new body", "abc123", "Update progress")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_with_stale_sha_is_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/repos/octocat/profile/contents/README.md"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "README.md does not match abc123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = store(&server)
        .update_document("README.md", "new body", "abc123", "Update progress")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict(_)));
}

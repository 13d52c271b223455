use serde_json::{Value, json};
use wiremock::MockServer;

use crate::support::TestServer;

#[tokio::test]
async fn session_lifecycle_over_http() {
    let upstream = MockServer::start().await;
    let server = TestServer::start(&upstream.uri(), Some("test-key")).await;
    let client = reqwest::Client::new();

    // Create.
    let created = client
        .post(server.url("/api/create-style-session"))
        .json(&json!({
            "projectId": "voyage-1",
            "baseStyle": "Film Noir",
            "styleImage": {"base64": "aGk=", "mimeType": "image/png"}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 200);
    let body: Value = created.json().await.unwrap();
    assert_eq!(body, json!({"sessionId": "voyage-1", "status": "created"}));

    // Get.
    let fetched = client
        .get(server.url("/api/style-session/voyage-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(fetched.status(), 200);
    let session: Value = fetched.json().await.unwrap();
    assert_eq!(session["base_style"], "Film Noir");
    assert_eq!(session["style_image"]["mimeType"], "image/png");
    assert_eq!(session["generated_images"], json!([]));
    assert_eq!(session["style_keywords"], json!([]));

    // Delete, twice: idempotent.
    for _ in 0..2 {
        let deleted = client
            .delete(server.url("/api/style-session/voyage-1"))
            .send()
            .await
            .unwrap();
        assert_eq!(deleted.status(), 200);
        let body: Value = deleted.json().await.unwrap();
        assert_eq!(body["status"], "cleared");
    }

    // Gone.
    let missing = client
        .get(server.url("/api/style-session/voyage-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn create_without_project_id_is_a_validation_error() {
    let upstream = MockServer::start().await;
    let server = TestServer::start(&upstream.uri(), Some("test-key")).await;

    let response = reqwest::Client::new()
        .post(server.url("/api/create-style-session"))
        .json(&json!({"baseStyle": "Film Noir"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Project ID"));
}

#[tokio::test]
async fn create_replaces_an_existing_session() {
    let upstream = MockServer::start().await;
    let server = TestServer::start(&upstream.uri(), Some("test-key")).await;
    let client = reqwest::Client::new();

    for style in ["Film Noir", "Watercolor"] {
        client
            .post(server.url("/api/create-style-session"))
            .json(&json!({"projectId": "voyage-1", "baseStyle": style}))
            .send()
            .await
            .unwrap();
    }

    let session: Value = client
        .get(server.url("/api/style-session/voyage-1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["base_style"], "Watercolor");
}

#[tokio::test]
async fn create_defaults_the_base_style() {
    let upstream = MockServer::start().await;
    let server = TestServer::start(&upstream.uri(), Some("test-key")).await;
    let client = reqwest::Client::new();

    client
        .post(server.url("/api/create-style-session"))
        .json(&json!({"projectId": "p1"}))
        .send()
        .await
        .unwrap();

    let session: Value = client
        .get(server.url("/api/style-session/p1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["base_style"], "Cinematic Realism");
}

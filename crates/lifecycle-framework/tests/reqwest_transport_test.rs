use chrono::{DateTime, Utc};
use lifecycle_framework::{
    EntityStatus, LifecycleEntity, ReqwestTransport, ResourceClient, ResourceConfig, Validate,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Note {
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(default)]
    status: EntityStatus,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct NoteDraft {
    text: Option<String>,
}

impl Validate for NoteDraft {
    fn required_fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![("text", self.text.as_deref())]
    }
}

impl LifecycleEntity for Note {
    type Create = NoteDraft;
    type Update = NoteDraft;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn status(&self) -> EntityStatus {
        self.status
    }

    fn set_status(&mut self, status: EntityStatus) {
        self.status = status;
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    fn on_update(&mut self, update: NoteDraft) {
        if let Some(text) = update.text {
            self.text = text;
        }
    }
}

fn client(base: &str, timeout: Option<Duration>) -> ResourceClient<Note> {
    let config = ResourceConfig::parse(base).unwrap();
    let transport = ReqwestTransport::new(timeout).unwrap();
    ResourceClient::new(config, Arc::new(transport))
}

#[tokio::test]
async fn test_create_posts_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "text": "hello" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "1", "text": "hello", "status": "A" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&format!("{}/api/notes", server.uri()), None);
    let result = client
        .create(&NoteDraft {
            text: Some("hello".into()),
        })
        .await;

    assert!(result.success);
    assert_eq!(result.status, 201);
    assert!(result.data.unwrap().is_active());
}

#[tokio::test]
async fn test_activate_walks_verbs_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/notes/5/activate"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/notes/5/activate"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&format!("{}/api/notes", server.uri()), None);
    let result = client.activate("5").await;

    assert!(result.success);
    assert_eq!(result.status, 204);
}

#[tokio::test]
async fn test_search_sends_query_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes/search"))
        .and(query_param("query", "a b"))
        .and(query_param("status", "A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&format!("{}/api/notes", server.uri()), None);
    let result = client
        .search("a b", lifecycle_framework::StatusFilter::Active)
        .await;

    assert!(result.success);
    assert_eq!(result.data.map(|notes| notes.len()), Some(0));
}

#[tokio::test]
async fn test_timeout_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = client(
        &format!("{}/api/notes", server.uri()),
        Some(Duration::from_millis(100)),
    );
    let result = client.fetch_active().await;

    assert!(!result.success);
    assert_eq!(result.status, 0);
    assert!(result.error.unwrap().starts_with("Network error: request timed out"));
}

#[tokio::test]
async fn test_server_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes/9"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Note 9 does not exist" })),
        )
        .mount(&server)
        .await;

    let client = client(&format!("{}/api/notes", server.uri()), None);
    let result = client.fetch_by_id("9").await;

    assert_eq!(result.status, 404);
    assert_eq!(result.error.as_deref(), Some("Note 9 does not exist"));
}

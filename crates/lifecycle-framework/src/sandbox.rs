//! # Sandbox Backend
//!
//! An in-process stand-in for a lifecycle-managed REST service, built as an
//! actor: [`SandboxBackend`] owns the record store and processes requests
//! sequentially from an mpsc channel, while [`SandboxTransport`] is the
//! cloneable handle a [`ResourceClient`](crate::ResourceClient) sends
//! through. Each request is answered over a oneshot channel.
//!
//! It understands the same routes the client speaks:
//!
//! - `GET /`, `/all`, `/inactive`, `/stats`, `/search?query=|term=&status=`
//! - `GET /{id}`, `GET /{owner_segment}/{ownerId}`, plus configured lookups
//! - `POST /`, `PUT /{id}`
//! - `PATCH|PUT|POST /{id}/{action}` for every action named by the
//!   config's activate and deactivate plans (`activate`, `restore`, ...)
//! - `DELETE /{id}` and `POST /{id}/delete`
//!
//! Verbs can be switched off with [`SandboxBackend::reject_verb`] so that
//! fallback behavior is exercised against real state.
//!
//! ```rust,ignore
//! let (backend, transport) = SandboxBackend::new(&config, 32);
//! tokio::spawn(backend.reject_verb(HttpVerb::Patch).run());
//! let client = ResourceClient::<Doc>::new(config, Arc::new(transport));
//! ```

use crate::config::ResourceConfig;
use crate::error::TransportError;
use crate::plan::{FallbackPlan, HttpVerb, ID_PLACEHOLDER};
use crate::status::{normalize_status, EntityStatus};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use url::Url;

type Record = Map<String, Value>;

/// Action segments of the `{id}/<action>` attempts in `plan`.
fn status_actions(plan: &FallbackPlan) -> HashSet<String> {
    plan.attempts()
        .iter()
        .filter_map(|attempt| attempt.path.trim_matches('/').split_once('/'))
        .filter(|(head, action)| *head == ID_PLACEHOLDER && !action.contains('/'))
        .map(|(_, action)| action.to_string())
        .collect()
}

struct SandboxRequest {
    request: HttpRequest,
    respond_to: oneshot::Sender<HttpResponse>,
}

/// The server half: owns the store, answers one request at a time.
pub struct SandboxBackend {
    receiver: mpsc::Receiver<SandboxRequest>,
    base_path: String,
    owner_segment: String,
    owner_field: String,
    lookups: HashMap<String, String>,
    activate_actions: HashSet<String>,
    deactivate_actions: HashSet<String>,
    rejected: HashSet<HttpVerb>,
    stats_enabled: bool,
    empty_acknowledgements: bool,
    store: BTreeMap<u64, Record>,
    next_id: u64,
}

impl SandboxBackend {
    /// Creates a backend serving the resource at `config.base_url`, and the
    /// transport that talks to it.
    pub fn new(config: &ResourceConfig, buffer_size: usize) -> (Self, SandboxTransport) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let backend = Self {
            receiver,
            base_path: config.base_url.path().trim_end_matches('/').to_string(),
            owner_segment: config.owner_segment.clone(),
            owner_field: "ownerId".to_string(),
            lookups: HashMap::new(),
            activate_actions: status_actions(&config.activate),
            deactivate_actions: status_actions(&config.deactivate),
            rejected: HashSet::new(),
            stats_enabled: true,
            empty_acknowledgements: false,
            store: BTreeMap::new(),
            next_id: 1,
        };
        (backend, SandboxTransport { sender })
    }

    /// Record field compared against `{ownerId}` in owner listings.
    pub fn with_owner_field(mut self, field: impl Into<String>) -> Self {
        self.owner_field = field.into();
        self
    }

    /// Serves `GET /{segment}/{value}` as a single-record lookup on `field`.
    pub fn with_lookup(mut self, segment: impl Into<String>, field: impl Into<String>) -> Self {
        self.lookups.insert(segment.into(), field.into());
        self
    }

    /// Answers every request using `verb` with `405 Method Not Allowed`.
    pub fn reject_verb(mut self, verb: HttpVerb) -> Self {
        self.rejected.insert(verb);
        self
    }

    /// Makes `GET /stats` answer 404.
    pub fn without_stats(mut self) -> Self {
        self.stats_enabled = false;
        self
    }

    /// Answers status changes with `204` and no body.
    pub fn with_empty_acknowledgements(mut self) -> Self {
        self.empty_acknowledgements = true;
        self
    }

    /// Inserts a record before the backend starts. Non-object values are ignored.
    pub fn seed(mut self, record: Value) -> Self {
        if let Value::Object(fields) = record {
            self.insert(fields);
        }
        self
    }

    /// Runs the event loop until every transport handle is dropped.
    pub async fn run(mut self) {
        info!(resource = %self.base_path, size = self.store.len(), "Sandbox started");
        while let Some(SandboxRequest {
            request,
            respond_to,
        }) = self.receiver.recv().await
        {
            let verb = request.verb;
            let path = request.url.path().to_string();
            let response = self.handle(request);
            debug!(resource = %self.base_path, %verb, %path, status = response.status, "Handled");
            let _ = respond_to.send(response);
        }
        info!(resource = %self.base_path, "Sandbox stopped");
    }

    fn handle(&mut self, request: HttpRequest) -> HttpResponse {
        if self.rejected.contains(&request.verb) {
            return HttpResponse::empty(405);
        }
        let Some(rest) = request
            .url
            .path()
            .strip_prefix(self.base_path.as_str())
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        else {
            return not_found("Route not found");
        };
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

        match (request.verb, segments.as_slice()) {
            (HttpVerb::Get, []) => self.list(|status| status.is_active()),
            (HttpVerb::Get, ["all"]) => self.list(|_| true),
            (HttpVerb::Get, ["inactive"]) => self.list(|status| !status.is_active()),
            (HttpVerb::Get, ["stats"]) => self.stats(),
            (HttpVerb::Get, ["search"]) => self.search(&request.url),
            (HttpVerb::Get, [segment, value]) if *segment == self.owner_segment => {
                let field = self.owner_field.clone();
                self.matching(&field, value)
            }
            (HttpVerb::Get, [segment, value]) if self.lookups.contains_key(*segment) => {
                self.lookup(segment, value)
            }
            (HttpVerb::Get, [id]) => match self.find(id) {
                Some((_, record)) => HttpResponse::json(200, &Value::Object(record.clone())),
                None => not_found("Record not found"),
            },
            (HttpVerb::Post, []) => self.create(request.body),
            (HttpVerb::Put, [id]) => self.update(id, request.body),
            (HttpVerb::Patch | HttpVerb::Put | HttpVerb::Post, [id, action])
                if self.activate_actions.contains(*action) =>
            {
                self.set_status(id, EntityStatus::Active)
            }
            (HttpVerb::Patch | HttpVerb::Put | HttpVerb::Post, [id, action])
                if self.deactivate_actions.contains(*action) =>
            {
                self.set_status(id, EntityStatus::Inactive)
            }
            (HttpVerb::Delete, [id]) | (HttpVerb::Post, [id, "delete"]) => self.remove(id),
            _ => not_found("Route not found"),
        }
    }

    fn insert(&mut self, mut fields: Record) -> Record {
        let id = self.next_id;
        self.next_id += 1;
        let now = Utc::now().to_rfc3339();
        fields.insert("id".into(), Value::String(id.to_string()));
        fields
            .entry("status")
            .or_insert_with(|| Value::String(EntityStatus::Active.code().into()));
        fields
            .entry("createdAt")
            .or_insert_with(|| Value::String(now.clone()));
        fields.entry("updatedAt").or_insert(Value::String(now));
        self.store.insert(id, fields.clone());
        fields
    }

    fn find(&self, id: &str) -> Option<(u64, &Record)> {
        let key = id.parse::<u64>().ok()?;
        self.store.get(&key).map(|record| (key, record))
    }

    fn list(&self, keep: impl Fn(EntityStatus) -> bool) -> HttpResponse {
        let items: Vec<Value> = self
            .store
            .values()
            .filter(|record| keep(status_of(record)))
            .cloned()
            .map(Value::Object)
            .collect();
        HttpResponse::json(200, &Value::Array(items))
    }

    fn stats(&self) -> HttpResponse {
        if !self.stats_enabled {
            return not_found("Stats not available");
        }
        let active = self
            .store
            .values()
            .filter(|record| status_of(record).is_active())
            .count();
        let total = self.store.len();
        HttpResponse::json(
            200,
            &json!({ "total": total, "active": active, "inactive": total - active }),
        )
    }

    fn search(&self, url: &Url) -> HttpResponse {
        let mut term = String::new();
        let mut wanted = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "query" | "term" => term = value.to_lowercase(),
                "status" => wanted = Some(normalize_status(Some(value.as_ref()))),
                _ => {}
            }
        }
        let items: Vec<Value> = self
            .store
            .values()
            .filter(|record| wanted.map_or(true, |status| status_of(record) == status))
            .filter(|record| {
                record.values().any(|value| {
                    value
                        .as_str()
                        .is_some_and(|text| text.to_lowercase().contains(&term))
                })
            })
            .cloned()
            .map(Value::Object)
            .collect();
        HttpResponse::json(200, &Value::Array(items))
    }

    fn matching(&self, field: &str, encoded: &str) -> HttpResponse {
        let items: Vec<Value> = self
            .store
            .values()
            .filter(|record| field_matches(record, field, encoded))
            .cloned()
            .map(Value::Object)
            .collect();
        HttpResponse::json(200, &Value::Array(items))
    }

    fn lookup(&self, segment: &str, encoded: &str) -> HttpResponse {
        let Some(field) = self.lookups.get(segment) else {
            return not_found("Route not found");
        };
        match self
            .store
            .values()
            .find(|record| field_matches(record, field, encoded))
        {
            Some(record) => HttpResponse::json(200, &Value::Object(record.clone())),
            None => not_found("Record not found"),
        }
    }

    fn create(&mut self, body: Option<Value>) -> HttpResponse {
        let Some(Value::Object(mut fields)) = body else {
            return bad_request("Body must be a JSON object");
        };
        fields.remove("id");
        let record = self.insert(fields);
        HttpResponse::json(201, &Value::Object(record))
    }

    fn update(&mut self, id: &str, body: Option<Value>) -> HttpResponse {
        let Some(Value::Object(fields)) = body else {
            return bad_request("Body must be a JSON object");
        };
        let Some((key, _)) = self.find(id) else {
            return not_found("Record not found");
        };
        let Some(record) = self.store.get_mut(&key) else {
            return not_found("Record not found");
        };
        for (name, value) in fields {
            if name != "id" && !value.is_null() {
                record.insert(name, value);
            }
        }
        record.insert("updatedAt".into(), Value::String(Utc::now().to_rfc3339()));
        HttpResponse::json(200, &Value::Object(record.clone()))
    }

    fn set_status(&mut self, id: &str, status: EntityStatus) -> HttpResponse {
        let Some((key, _)) = self.find(id) else {
            return not_found("Record not found");
        };
        let Some(record) = self.store.get_mut(&key) else {
            return not_found("Record not found");
        };
        record.insert("status".into(), Value::String(status.code().into()));
        record.insert("updatedAt".into(), Value::String(Utc::now().to_rfc3339()));
        if self.empty_acknowledgements {
            HttpResponse::empty(204)
        } else {
            HttpResponse::json(200, &Value::Object(record.clone()))
        }
    }

    fn remove(&mut self, id: &str) -> HttpResponse {
        match self.find(id).map(|(key, _)| key) {
            Some(key) => {
                self.store.remove(&key);
                HttpResponse::empty(204)
            }
            None => not_found("Record not found"),
        }
    }
}

fn status_of(record: &Record) -> EntityStatus {
    normalize_status(record.get("status").and_then(Value::as_str))
}

/// Compares in percent-encoded form, as the value arrived in the path.
fn field_matches(record: &Record, field: &str, encoded: &str) -> bool {
    match record.get(field) {
        Some(Value::String(text)) => encode_segment(text) == encoded,
        Some(Value::Number(number)) => number.to_string() == encoded,
        _ => false,
    }
}

fn encode_segment(raw: &str) -> String {
    let Ok(mut url) = Url::parse("http://sandbox.invalid/") else {
        return raw.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(raw);
    }
    url.path().trim_start_matches('/').to_string()
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::json(404, &json!({ "message": message }))
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::json(400, &json!({ "message": message }))
}

/// Client half of the sandbox. Cheap to clone.
#[derive(Clone)]
pub struct SandboxTransport {
    sender: mpsc::Sender<SandboxRequest>,
}

#[async_trait]
impl Transport for SandboxTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SandboxRequest {
                request,
                respond_to,
            })
            .await
            .map_err(|_| TransportError::Connect("sandbox closed".into()))?;
        response
            .await
            .map_err(|_| TransportError::Other("sandbox dropped response channel".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(verb: HttpVerb, url: &str) -> HttpRequest {
        HttpRequest::new(verb, Url::parse(url).unwrap())
    }

    fn spawn(configure: impl FnOnce(SandboxBackend) -> SandboxBackend) -> SandboxTransport {
        let config = ResourceConfig::parse("http://sandbox.local/api/things").unwrap();
        let (backend, transport) = SandboxBackend::new(&config, 8);
        tokio::spawn(configure(backend).run());
        transport
    }

    fn body(response: &HttpResponse) -> Value {
        serde_json::from_slice(&response.body).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_active_status() {
        let transport = spawn(|b| b);
        let response = transport
            .send(
                request(HttpVerb::Post, "http://sandbox.local/api/things")
                    .with_body(json!({ "name": "lamp" })),
            )
            .await
            .unwrap();
        assert_eq!(response.status, 201);
        assert_eq!(body(&response)["id"], "1");
        assert_eq!(body(&response)["status"], "A");
    }

    #[tokio::test]
    async fn test_rejected_verb_answers_405() {
        let transport = spawn(|b| b.reject_verb(HttpVerb::Patch).seed(json!({ "name": "x" })));
        let response = transport
            .send(request(HttpVerb::Patch, "http://sandbox.local/api/things/1/deactivate"))
            .await
            .unwrap();
        assert_eq!(response.status, 405);

        let response = transport
            .send(request(HttpVerb::Put, "http://sandbox.local/api/things/1/deactivate"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(body(&response)["status"], "I");
    }

    #[tokio::test]
    async fn test_lookup_matches_encoded_value() {
        let transport = spawn(|b| {
            b.with_lookup("email", "email")
                .seed(json!({ "email": "ana+tag@x.io" }))
        });
        let mut url = Url::parse("http://sandbox.local/api/things").unwrap();
        url.path_segments_mut().unwrap().push("email").push("ana+tag@x.io");

        let response = transport.send(HttpRequest::new(HttpVerb::Get, url)).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(body(&response)["email"], "ana+tag@x.io");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_with_message() {
        let transport = spawn(|b| b);
        let response = transport
            .send(request(HttpVerb::Get, "http://sandbox.local/other"))
            .await
            .unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(body(&response)["message"], "Route not found");
    }

    #[tokio::test]
    async fn test_sibling_paths_are_not_the_resource() {
        let transport = spawn(|b| b.seed(json!({ "name": "x" })));
        for url in [
            "http://sandbox.local/api/thingsX",
            "http://sandbox.local/api/things-archive/1",
        ] {
            let response = transport.send(request(HttpVerb::Get, url)).await.unwrap();
            assert_eq!(response.status, 404, "{url}");
        }
        let response = transport
            .send(request(HttpVerb::Get, "http://sandbox.local/api/things/1"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_status_routes_follow_configured_plans() {
        let config = ResourceConfig::parse("http://sandbox.local/api/things")
            .unwrap()
            .with_activate_plan(FallbackPlan::status_change("restore"));
        let (backend, transport) = SandboxBackend::new(&config, 8);
        tokio::spawn(backend.seed(json!({ "name": "x", "status": "I" })).run());

        let restored = transport
            .send(request(HttpVerb::Patch, "http://sandbox.local/api/things/1/restore"))
            .await
            .unwrap();
        assert_eq!(restored.status, 200);
        assert_eq!(body(&restored)["status"], "A");

        let old_route = transport
            .send(request(HttpVerb::Patch, "http://sandbox.local/api/things/1/activate"))
            .await
            .unwrap();
        assert_eq!(old_route.status, 404);

        let deactivated = transport
            .send(request(HttpVerb::Post, "http://sandbox.local/api/things/1/deactivate"))
            .await
            .unwrap();
        assert_eq!(body(&deactivated)["status"], "I");
    }
}

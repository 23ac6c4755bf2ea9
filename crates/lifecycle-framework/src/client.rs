//! # Generic Resource Client
//!
//! [`ResourceClient<T>`] is the single engine behind every domain client. It
//! owns the URL conventions of a lifecycle-managed REST resource:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `fetch_active` | `GET /` |
//! | `fetch_all` | `GET /all` |
//! | `fetch_inactive` | `GET /inactive` |
//! | `fetch_by_id` | `GET /{id}` |
//! | `fetch_by_owner` | `GET /{owner_segment}/{ownerId}` |
//! | `search` | `GET /search?query=..&status=..` |
//! | `stats` | `GET /stats`, with local fallback |
//! | `create` | `POST /` |
//! | `update` | `PUT /{id}` |
//! | `activate` / `deactivate` / `hard_delete` | configured [`FallbackPlan`] |
//!
//! Every operation resolves to an [`ApiResult`]; nothing here panics or
//! returns `Err` to the caller.
//!
//! ## Response interpretation
//!
//! - Non-2xx: the body's `message` field if present, otherwise
//!   `"Error {status}: {statusText}"`.
//! - Reads require a JSON body. An empty or malformed 2xx body is a parse
//!   failure carrying the response status.
//! - Status changes and deletes accept an empty 2xx body and synthesize a
//!   `{ success: true }` acknowledgement.
//! - No automatic retries. The only repeated requests come from walking a
//!   fallback plan after a `405`.

use crate::config::ResourceConfig;
use crate::entity::{entity_type, LifecycleEntity};
use crate::envelope::{Acknowledged, ApiResult, StatusChange};
use crate::error::ClientError;
use crate::plan::{FallbackPlan, HttpVerb};
use crate::stats::EntityStats;
use crate::status::{StatusFilter, Transition};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::validation::{require_id, Validate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

const METHOD_NOT_ALLOWED: u16 = 405;

/// A type-safe client for one lifecycle-managed REST resource.
///
/// Cheap to clone: the transport and configuration are shared behind `Arc`s,
/// and the client holds no per-call state, so concurrent calls from clones
/// never interfere.
pub struct ResourceClient<T: LifecycleEntity> {
    transport: Arc<dyn Transport>,
    config: Arc<ResourceConfig>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: LifecycleEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
            _entity: PhantomData,
        }
    }
}

impl<T: LifecycleEntity> ResourceClient<T> {
    pub fn new(config: ResourceConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config: Arc::new(config),
            _entity: PhantomData,
        }
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    // --- Reads ---

    #[instrument(skip(self))]
    pub async fn fetch_active(&self) -> ApiResult<Vec<T>> {
        self.fetch_list_at(&[]).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> ApiResult<Vec<T>> {
        self.fetch_list_at(&["all"]).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_inactive(&self) -> ApiResult<Vec<T>> {
        self.fetch_list_at(&["inactive"]).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_by_id(&self, id: &str) -> ApiResult<T> {
        let result = match require_id("id", id) {
            Ok(id) => self.get_json(&[id], &[]).await,
            Err(e) => Err(e.into()),
        };
        self.finish("fetch_by_id", result)
    }

    #[instrument(skip(self))]
    pub async fn fetch_by_owner(&self, owner_id: &str) -> ApiResult<Vec<T>> {
        let result = match require_id("ownerId", owner_id) {
            Ok(owner) => {
                self.get_json(&[self.config.owner_segment.as_str(), owner], &[])
                    .await
            }
            Err(e) => Err(e.into()),
        };
        self.finish("fetch_by_owner", result)
    }

    /// Searches server-side. `StatusFilter::All` omits the status parameter.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, filter: StatusFilter) -> ApiResult<Vec<T>> {
        let mut params = vec![("query", query)];
        if let Some(code) = filter.query_value() {
            params.push(("status", code));
        }
        self.fetch_query_at(&["search"], &params).await
    }

    /// Decodes whatever JSON lives at `segments` below the base URL.
    pub async fn fetch_at<R: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<R> {
        self.fetch_query_at(segments, &[]).await
    }

    pub async fn fetch_list_at(&self, segments: &[&str]) -> ApiResult<Vec<T>> {
        self.fetch_at(segments).await
    }

    /// Like [`ResourceClient::fetch_at`] with query parameters appended.
    pub async fn fetch_query_at<R: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> ApiResult<R> {
        let result = self.get_json(segments, query).await;
        self.finish("fetch", result)
    }

    /// Server statistics, falling back to counting `fetch_all` locally, and
    /// finally to zeroed counts. Always successful.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> ApiResult<EntityStats> {
        let entity_type = entity_type::<T>();
        match self.get_json::<EntityStats>(&["stats"], &[]).await {
            Ok((status, stats)) => return ApiResult::ok(status, stats),
            Err(e) => warn!(entity_type, error = %e, "Stats endpoint failed, counting locally"),
        }

        match self.get_json::<Vec<T>>(&["all"], &[]).await {
            Ok((_, items)) => ApiResult::synthesized(EntityStats::from_entities(&items)),
            Err(e) => {
                warn!(entity_type, error = %e, "Listing failed, reporting empty stats");
                ApiResult::synthesized(EntityStats::default())
            }
        }
    }

    // --- Mutations ---

    #[instrument(skip(self, candidate))]
    pub async fn create(&self, candidate: &T::Create) -> ApiResult<T> {
        let result = self.try_create(candidate).await;
        self.finish("create", result)
    }

    #[instrument(skip(self, candidate))]
    pub async fn update(&self, id: &str, candidate: &T::Update) -> ApiResult<T> {
        let result = self.try_update(id, candidate).await;
        self.finish("update", result)
    }

    #[instrument(skip(self))]
    pub async fn activate(&self, id: &str) -> ApiResult<StatusChange<T>> {
        let result = self.try_change_status(id, Transition::Activate).await;
        self.finish("activate", result)
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: &str) -> ApiResult<StatusChange<T>> {
        let result = self.try_change_status(id, Transition::Deactivate).await;
        self.finish("deactivate", result)
    }

    #[instrument(skip(self))]
    pub async fn hard_delete(&self, id: &str) -> ApiResult<Acknowledged> {
        let result = self.try_hard_delete(id).await;
        self.finish("hard_delete", result)
    }

    // --- Internals ---

    async fn try_create(&self, candidate: &T::Create) -> Result<(u16, T), ClientError> {
        candidate.validate()?;
        let url = self.url_for(&[], &[])?;
        let request = HttpRequest::new(HttpVerb::Post, url).with_body(encode_body(candidate)?);
        let (status, created) = decode_json::<T>(self.send(request).await?)?;
        info!(
            entity_type = entity_type::<T>(),
            id = created.id().unwrap_or("-"),
            "Created"
        );
        Ok((status, created))
    }

    async fn try_update(&self, id: &str, candidate: &T::Update) -> Result<(u16, T), ClientError> {
        let id = require_id("id", id)?;
        candidate.validate()?;
        let url = self.url_for(&[id], &[])?;
        let request = HttpRequest::new(HttpVerb::Put, url).with_body(encode_body(candidate)?);
        let updated = decode_json::<T>(self.send(request).await?)?;
        info!(entity_type = entity_type::<T>(), %id, "Updated");
        Ok(updated)
    }

    async fn try_change_status(
        &self,
        id: &str,
        transition: Transition,
    ) -> Result<(u16, StatusChange<T>), ClientError> {
        let id = require_id("id", id)?;
        let response = ensure_success(
            self.execute_plan(self.config.plan_for(transition), id)
                .await?,
        )?;
        info!(
            entity_type = entity_type::<T>(),
            %id,
            ?transition,
            status = response.status,
            "Status changed"
        );
        Ok((response.status, decode_status_change(&response)))
    }

    async fn try_hard_delete(&self, id: &str) -> Result<(u16, Acknowledged), ClientError> {
        let id = require_id("id", id)?;
        let response = ensure_success(self.execute_plan(&self.config.hard_delete, id).await?)?;
        info!(entity_type = entity_type::<T>(), %id, "Deleted");
        Ok((response.status, Acknowledged::default()))
    }

    /// Walks the plan, advancing only past a `405` while attempts remain.
    async fn execute_plan(
        &self,
        plan: &FallbackPlan,
        id: &str,
    ) -> Result<HttpResponse, ClientError> {
        let entity_type = entity_type::<T>();
        let mut attempts = plan.attempts().iter().peekable();
        while let Some(attempt) = attempts.next() {
            let url = self.url_for(&attempt.segments(id), &[])?;
            let response = self.send(HttpRequest::new(attempt.verb, url)).await?;
            if response.status == METHOD_NOT_ALLOWED && attempts.peek().is_some() {
                debug!(
                    entity_type,
                    verb = %attempt.verb,
                    path = %attempt.path,
                    "Method not allowed, trying next attempt"
                );
                continue;
            }
            return Ok(response);
        }
        Err(ClientError::Transport(format!(
            "no request configured for this {entity_type} operation"
        )))
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<(u16, R), ClientError> {
        let url = self.url_for(segments, query)?;
        decode_json(self.send(HttpRequest::new(HttpVerb::Get, url)).await?)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        debug!(verb = %request.verb, url = %request.url, "Sending request");
        let response = self.transport.send(request).await.map_err(|e| {
            warn!(error = %e, "Transport failed");
            ClientError::from(e)
        })?;
        debug!(status = response.status, "Received response");
        Ok(response)
    }

    /// Appends percent-encoded segments and query pairs to the base URL.
    fn url_for(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = self.config.base_url.clone();
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| {
                    ClientError::Transport(format!(
                        "base URL {} cannot carry a path",
                        self.config.base_url
                    ))
                })?
                .pop_if_empty()
                .extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn finish<R>(&self, operation: &'static str, result: Result<(u16, R), ClientError>) -> ApiResult<R> {
        let entity_type = entity_type::<T>();
        match &result {
            Ok((status, _)) => debug!(entity_type, operation, status, "Completed"),
            Err(e) => warn!(entity_type, operation, status = e.status(), error = %e, "Failed"),
        }
        result.into()
    }
}

fn encode_body<C: Serialize>(candidate: &C) -> Result<serde_json::Value, ClientError> {
    serde_json::to_value(candidate)
        .map_err(|e| ClientError::Transport(format!("failed to encode request body: {e}")))
}

fn ensure_success(response: HttpResponse) -> Result<HttpResponse, ClientError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(http_error(&response))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn http_error(response: &HttpResponse) -> ClientError {
    let message = serde_json::from_slice::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("Error {}: {}", response.status, response.status_text));
    ClientError::Http {
        status: response.status,
        message,
    }
}

fn decode_json<R: DeserializeOwned>(response: HttpResponse) -> Result<(u16, R), ClientError> {
    let response = ensure_success(response)?;
    serde_json::from_slice(&response.body)
        .map(|data| (response.status, data))
        .map_err(|e| ClientError::Parse {
            status: response.status,
            message: e.to_string(),
        })
}

/// The updated entity when the body holds one, otherwise an acknowledgement.
fn decode_status_change<T: DeserializeOwned>(response: &HttpResponse) -> StatusChange<T> {
    if response.is_blank() {
        return StatusChange::Acknowledged(Acknowledged::default());
    }
    serde_json::from_slice::<T>(&response.body)
        .map(StatusChange::Entity)
        .unwrap_or_else(|_| StatusChange::Acknowledged(Acknowledged::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::fixtures::{widget, Widget};
    use crate::mock::MockTransport;
    use crate::status::EntityStatus;

    fn client(mock: &MockTransport) -> ResourceClient<Widget> {
        let config = ResourceConfig::parse("http://mock.local/api/widgets").unwrap();
        ResourceClient::new(config, mock.transport())
    }

    #[tokio::test]
    async fn test_ids_are_percent_encoded() {
        let mock = MockTransport::new();
        mock.expect(HttpVerb::Get, "/api/widgets/a%2Fb%20c")
            .respond_json(200, &widget("a/b c", EntityStatus::Active));

        let result = client(&mock).fetch_by_id("a/b c").await;
        assert!(result.success);
        mock.verify();
    }

    #[tokio::test]
    async fn test_error_message_prefers_body() {
        let mock = MockTransport::new();
        mock.expect(HttpVerb::Get, "/api/widgets/9")
            .respond_json(404, &serde_json::json!({ "message": "Widget 9 not found" }));
        mock.expect(HttpVerb::Get, "/api/widgets/10").respond(500);

        let client = client(&mock);
        let result = client.fetch_by_id("9").await;
        assert_eq!(result.status, 404);
        assert_eq!(result.error.as_deref(), Some("Widget 9 not found"));

        let result = client.fetch_by_id("10").await;
        assert_eq!(result.error.as_deref(), Some("Error 500: Internal Server Error"));
        mock.verify();
    }

    #[tokio::test]
    async fn test_search_appends_status_only_when_filtered() {
        let mock = MockTransport::new();
        mock.expect(HttpVerb::Get, "/api/widgets/search")
            .respond_json(200, &Vec::<Widget>::new());
        mock.expect(HttpVerb::Get, "/api/widgets/search")
            .respond_json(200, &Vec::<Widget>::new());

        let client = client(&mock);
        client.search("ana", StatusFilter::All).await;
        client.search("ana", StatusFilter::Inactive).await;

        let queries: Vec<Option<String>> =
            mock.requests().into_iter().map(|r| r.query).collect();
        assert_eq!(
            queries,
            vec![
                Some("query=ana".to_string()),
                Some("query=ana&status=I".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_dot_segment_ids_never_reach_the_network() {
        let mock = MockTransport::new();
        let client = client(&mock);

        let deleted = client.hard_delete("..").await;
        assert!(!deleted.success);
        assert_eq!(deleted.status, 400);
        assert_eq!(deleted.error.as_deref(), Some("id is invalid"));

        assert_eq!(client.deactivate(" . ").await.status, 400);
        assert_eq!(client.fetch_by_id("..").await.status, 400);
        assert_eq!(client.fetch_by_owner(".").await.status, 400);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_numeric_ids_are_read_as_text() {
        let mock = MockTransport::new();
        mock.expect(HttpVerb::Get, "/api/widgets").respond_json(
            200,
            &serde_json::json!([
                { "id": 5, "name": "lamp", "status": "A" },
                { "id": "6", "name": "desk", "status": "A" }
            ]),
        );

        let result = client(&mock).fetch_active().await;

        assert!(result.success);
        let ids: Vec<String> = result
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|w| w.id)
            .collect();
        assert_eq!(ids, vec!["5", "6"]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_empty_plan_is_reported() {
        let mock = MockTransport::new();
        let config = ResourceConfig::parse("http://mock.local/api/widgets")
            .unwrap()
            .with_hard_delete_plan(FallbackPlan::new(Vec::new()));
        let client: ResourceClient<Widget> = ResourceClient::new(config, mock.transport());

        let result = client.hard_delete("1").await;
        assert!(!result.success);
        assert_eq!(result.status, 0);
        assert_eq!(mock.call_count(), 0);
    }
}

//! # User Client
//!
//! High-level API for the users service. It wraps a `ResourceClient<User>`
//! and adds lookups by email and document number, which the service
//! exposes as `/email/{email}` and `/document/{number}`.
use crate::clients::entity_client::EntityClient;
use crate::errors::UserError;
use crate::model::{User, UserCreate, UserUpdate};
use async_trait::async_trait;
use lifecycle_framework::validation::require_id;
use lifecycle_framework::{ApiResult, BulkReport, ResourceClient, StatusFilter};
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn create_user(&self, params: &UserCreate) -> ApiResult<User> {
        debug!("Sending request");
        self.inner.create(params).await
    }

    #[instrument(skip(self, params))]
    pub async fn update_user(&self, id: &str, params: &UserUpdate) -> ApiResult<User> {
        debug!("Sending request");
        if let Err(e) = Self::check_id(id) {
            return ApiResult::failure(&e);
        }
        self.inner.update(id, params).await
    }

    #[instrument(skip(self))]
    pub async fn search_users(&self, term: &str, filter: StatusFilter) -> ApiResult<Vec<User>> {
        debug!("Sending request");
        self.inner.search(term, filter).await
    }

    /// `Ok(None)` when the service answers 404.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.lookup("email", email).await
    }

    /// `Ok(None)` when the service answers 404.
    #[instrument(skip(self))]
    pub async fn find_by_document_number(&self, number: &str) -> Result<Option<User>, UserError> {
        self.lookup("document", number).await
    }

    /// Lookup failures are logged and reported as `false`.
    pub async fn email_exists(&self, email: &str) -> bool {
        match self.find_by_email(email).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(error = %e, "Email lookup failed");
                false
            }
        }
    }

    /// Lookup failures are logged and reported as `false`.
    pub async fn document_number_exists(&self, number: &str) -> bool {
        match self.find_by_document_number(number).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(error = %e, "Document number lookup failed");
                false
            }
        }
    }

    pub async fn activate_many(&self, ids: &[String]) -> ApiResult<BulkReport> {
        self.inner.activate_many(ids).await
    }

    pub async fn deactivate_many(&self, ids: &[String]) -> ApiResult<BulkReport> {
        self.inner.deactivate_many(ids).await
    }

    pub async fn delete_many(&self, ids: &[String]) -> ApiResult<BulkReport> {
        self.inner.delete_many(ids).await
    }

    async fn lookup(&self, segment: &str, value: &str) -> Result<Option<User>, UserError> {
        let Ok(value) = require_id("value", value) else {
            return Ok(None);
        };
        debug!(segment, "Sending request");
        let result = self.inner.fetch_at::<User>(&[segment, value]).await;
        if result.status == 404 {
            return Ok(None);
        }
        Self::into_domain(result).map(Some)
    }
}

#[async_trait]
impl EntityClient<User> for UserClient {
    type Error = UserError;
    const ID_LABEL: &'static str = "User ID";

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }

    fn map_error(status: u16, message: String) -> Self::Error {
        UserError::from_status(status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifecycle_framework::mock::MockTransport;
    use lifecycle_framework::{FallbackPlan, HttpVerb, LifecycleEntity, ResourceConfig, TransportError};
    use serde_json::json;

    fn client(mock: &MockTransport) -> UserClient {
        let config = ResourceConfig::parse("http://mock.local/api/users").unwrap();
        UserClient::new(ResourceClient::new(config, mock.transport()))
    }

    #[tokio::test]
    async fn test_find_by_email_encodes_segment() {
        let mock = MockTransport::new();
        mock.expect(HttpVerb::Get, "/api/users/email/ana%20r@x.io")
            .respond_json(200, &json!({ "id": "1", "email": "ana r@x.io", "status": "A" }));

        let found = client(&mock).find_by_email("ana r@x.io").await.unwrap();

        assert_eq!(found.unwrap().id.as_deref(), Some("1"));
        mock.verify();
    }

    #[tokio::test]
    async fn test_missing_lookup_is_none() {
        let mock = MockTransport::new();
        mock.expect(HttpVerb::Get, "/api/users/document/999")
            .respond_json(404, &json!({ "message": "User not found" }));

        let client = client(&mock);
        assert_eq!(client.find_by_document_number("999").await, Ok(None));
        mock.verify();
    }

    #[tokio::test]
    async fn test_exists_swallows_errors() {
        let mock = MockTransport::new();
        mock.expect(HttpVerb::Get, "/api/users/email/a@b.co")
            .fail(TransportError::Connect("refused".into()));
        mock.expect(HttpVerb::Get, "/api/users/email/c@d.co")
            .respond_json(200, &json!({ "id": "2", "email": "c@d.co" }));

        let client = client(&mock);
        assert!(!client.email_exists("a@b.co").await);
        assert!(client.email_exists("c@d.co").await);
        mock.verify();
    }

    #[tokio::test]
    async fn test_blank_id_uses_user_label() {
        let mock = MockTransport::new();
        let result = client(&mock).deactivate("  ").await;

        assert!(!result.success);
        assert_eq!(result.status, 400);
        assert_eq!(result.error.as_deref(), Some("User ID is required"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_restore_is_the_activate_route() {
        let mock = MockTransport::new();
        mock.expect(HttpVerb::Patch, "/api/users/7/restore")
            .respond_json(200, &json!({ "id": "7", "status": "A" }));

        let config = ResourceConfig::parse("http://mock.local/api/users")
            .unwrap()
            .with_activate_plan(FallbackPlan::status_change("restore"));
        let client = UserClient::new(ResourceClient::new(config, mock.transport()));
        let result = client.activate("7").await;

        assert!(result.success);
        assert!(result.data.unwrap().entity().unwrap().is_active());
        mock.verify();
    }
}

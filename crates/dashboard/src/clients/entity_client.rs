//! # Entity Client Trait
//!
//! Domain clients wrap a [`ResourceClient`] and add the operations that are
//! specific to their resource. The operations every lifecycle resource
//! shares (reads, status transitions, hard delete, stats) are provided here
//! once, so a domain client only has to say how to reach its
//! `ResourceClient` and how to name its errors.
//!
//! ```rust,ignore
//! #[async_trait]
//! impl EntityClient<User> for UserClient {
//!     type Error = UserError;
//!     const ID_LABEL: &'static str = "User ID";
//!
//!     fn inner(&self) -> &ResourceClient<User> { &self.inner }
//!     fn map_error(status: u16, message: String) -> UserError {
//!         UserError::from_status(status, message)
//!     }
//! }
//! ```
//!
//! Envelope-returning methods never fail; [`EntityClient::into_domain`]
//! turns an envelope into a `Result` for callers that prefer `?`.

use async_trait::async_trait;
use lifecycle_framework::validation::require_id;
use lifecycle_framework::{
    Acknowledged, ApiResult, ClientError, EntityStats, LifecycleEntity, ResourceClient,
    StatusChange,
};
use tracing::{debug, instrument};

#[async_trait]
pub trait EntityClient<T: LifecycleEntity>: Send + Sync {
    type Error: Send;

    /// Label used in the messages for a blank or dot-segment id.
    const ID_LABEL: &'static str;

    fn inner(&self) -> &ResourceClient<T>;

    fn map_error(status: u16, message: String) -> Self::Error;

    /// Unwraps a successful envelope or maps its failure.
    fn into_domain<R>(result: ApiResult<R>) -> Result<R, Self::Error> {
        let ApiResult {
            data,
            error,
            status,
            success,
        } = result;
        match data {
            Some(data) if success => Ok(data),
            _ => Err(Self::map_error(
                status,
                error.unwrap_or_else(|| format!("Error {status}: empty response")),
            )),
        }
    }

    /// Local id check with this client's label, before any request.
    fn check_id(id: &str) -> Result<(), ClientError> {
        require_id(Self::ID_LABEL, id)
            .map(|_| ())
            .map_err(ClientError::from)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> ApiResult<T> {
        debug!("Sending request");
        if let Err(e) = Self::check_id(id) {
            return ApiResult::failure(&e);
        }
        self.inner().fetch_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn list_active(&self) -> ApiResult<Vec<T>> {
        debug!("Sending request");
        self.inner().fetch_active().await
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> ApiResult<Vec<T>> {
        debug!("Sending request");
        self.inner().fetch_all().await
    }

    #[instrument(skip(self))]
    async fn list_inactive(&self) -> ApiResult<Vec<T>> {
        debug!("Sending request");
        self.inner().fetch_inactive().await
    }

    #[instrument(skip(self))]
    async fn activate(&self, id: &str) -> ApiResult<StatusChange<T>> {
        debug!("Sending request");
        if let Err(e) = Self::check_id(id) {
            return ApiResult::failure(&e);
        }
        self.inner().activate(id).await
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: &str) -> ApiResult<StatusChange<T>> {
        debug!("Sending request");
        if let Err(e) = Self::check_id(id) {
            return ApiResult::failure(&e);
        }
        self.inner().deactivate(id).await
    }

    #[instrument(skip(self))]
    async fn hard_delete(&self, id: &str) -> ApiResult<Acknowledged> {
        debug!("Sending request");
        if let Err(e) = Self::check_id(id) {
            return ApiResult::failure(&e);
        }
        self.inner().hard_delete(id).await
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> ApiResult<EntityStats> {
        debug!("Sending request");
        self.inner().stats().await
    }
}

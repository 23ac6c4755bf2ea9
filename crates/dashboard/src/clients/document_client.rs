//! # Document Client
//!
//! High-level API for the documents service. It wraps a
//! `ResourceClient<UserDocument>` and adds per-user listings, local
//! filters over the active documents and per-user statistics.
use crate::clients::entity_client::EntityClient;
use crate::errors::DocumentError;
use crate::model::{DocumentCreate, DocumentUpdate, UserDocument, UserDocumentStats};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lifecycle_framework::{ApiResult, BulkReport, ResourceClient, StatusFilter};
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct DocumentClient {
    inner: ResourceClient<UserDocument>,
}

impl DocumentClient {
    pub fn new(inner: ResourceClient<UserDocument>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(file_name = %params.file_name))]
    pub async fn create_document(&self, params: &DocumentCreate) -> ApiResult<UserDocument> {
        debug!("Sending request");
        self.inner.create(params).await
    }

    #[instrument(skip(self, params))]
    pub async fn update_document(
        &self,
        id: &str,
        params: &DocumentUpdate,
    ) -> ApiResult<UserDocument> {
        debug!("Sending request");
        if let Err(e) = Self::check_id(id) {
            return ApiResult::failure(&e);
        }
        self.inner.update(id, params).await
    }

    /// Documents listed under `/user/{userId}`.
    #[instrument(skip(self))]
    pub async fn documents_by_user(&self, user_id: &str) -> ApiResult<Vec<UserDocument>> {
        debug!("Sending request");
        self.inner.fetch_by_owner(user_id).await
    }

    #[instrument(skip(self))]
    pub async fn search_documents(
        &self,
        term: &str,
        filter: StatusFilter,
    ) -> ApiResult<Vec<UserDocument>> {
        debug!("Sending request");
        self.inner.search(term, filter).await
    }

    /// Active documents whose `fileType` equals `file_type`.
    #[instrument(skip(self))]
    pub async fn documents_by_file_type(&self, file_type: &str) -> ApiResult<Vec<UserDocument>> {
        self.inner.fetch_active().await.map(|documents| {
            documents
                .into_iter()
                .filter(|d| d.file_type == file_type)
                .collect()
        })
    }

    /// Active documents uploaded within `[start, end]`. Documents without
    /// an upload time are left out.
    #[instrument(skip(self))]
    pub async fn documents_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ApiResult<Vec<UserDocument>> {
        self.inner.fetch_active().await.map(|documents| {
            documents
                .into_iter()
                .filter(|d| d.uploaded_at.is_some_and(|at| start <= at && at <= end))
                .collect()
        })
    }

    /// Counts for one user, computed from the full listing.
    #[instrument(skip(self))]
    pub async fn user_document_stats(&self, user_id: &str) -> ApiResult<UserDocumentStats> {
        let result = self
            .inner
            .fetch_all()
            .await
            .map(|documents| UserDocumentStats::for_user(user_id, &documents));
        if let Some(stats) = &result.data {
            info!(
                user_id,
                total = stats.total_documents,
                active = stats.active_documents,
                "User document stats computed"
            );
        }
        result
    }

    /// Like [`DocumentClient::user_document_stats`], as a `Result`.
    pub async fn try_user_document_stats(
        &self,
        user_id: &str,
    ) -> Result<UserDocumentStats, DocumentError> {
        Self::into_domain(self.user_document_stats(user_id).await)
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
}

#[async_trait]
impl EntityClient<UserDocument> for DocumentClient {
    type Error = DocumentError;
    const ID_LABEL: &'static str = "Document ID";

    fn inner(&self) -> &ResourceClient<UserDocument> {
        &self.inner
    }

    fn map_error(status: u16, message: String) -> Self::Error {
        DocumentError::from_status(status, message)
    }
}

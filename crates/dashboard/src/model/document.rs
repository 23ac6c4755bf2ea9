use chrono::{DateTime, Utc};
use lifecycle_framework::{EntityStatus, LifecycleEntity, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A file attached to a user (scan, report, certificate).
///
/// Documents are owned by a user through `user_id`; the documents service
/// lists them under `/user/{userId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lifecycle_framework::id::optional"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lifecycle_framework::id::required")]
    pub user_id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub uploaded_by: String,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: EntityStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a new document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCreate {
    pub user_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub uploaded_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl DocumentCreate {
    /// Candidate stamped with the current upload time.
    pub fn new(
        user_id: impl Into<String>,
        file_name: impl Into<String>,
        file_type: impl Into<String>,
        file_url: impl Into<String>,
        uploaded_by: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            file_name: file_name.into(),
            file_type: file_type.into(),
            file_url: file_url.into(),
            uploaded_by: uploaded_by.into(),
            description: None,
            uploaded_at: Some(Utc::now()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Validate for DocumentCreate {
    fn required_fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("userId", Some(self.user_id.as_str())),
            ("fileName", Some(self.file_name.as_str())),
            ("fileType", Some(self.file_type.as_str())),
            ("fileUrl", Some(self.file_url.as_str())),
            ("uploadedBy", Some(self.uploaded_by.as_str())),
        ]
    }
}

/// Payload for updating an existing document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpdate {
    pub user_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub uploaded_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&UserDocument> for DocumentUpdate {
    fn from(document: &UserDocument) -> Self {
        Self {
            user_id: document.user_id.clone(),
            file_name: document.file_name.clone(),
            file_type: document.file_type.clone(),
            file_url: document.file_url.clone(),
            uploaded_by: document.uploaded_by.clone(),
            description: document.description.clone(),
        }
    }
}

impl Validate for DocumentUpdate {
    fn required_fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("userId", Some(self.user_id.as_str())),
            ("fileName", Some(self.file_name.as_str())),
            ("fileType", Some(self.file_type.as_str())),
            ("fileUrl", Some(self.file_url.as_str())),
            ("uploadedBy", Some(self.uploaded_by.as_str())),
        ]
    }
}

impl LifecycleEntity for UserDocument {
    type Create = DocumentCreate;
    type Update = DocumentUpdate;

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

    fn on_update(&mut self, update: DocumentUpdate) {
        self.user_id = update.user_id;
        self.file_name = update.file_name;
        self.file_type = update.file_type;
        self.file_url = update.file_url;
        self.uploaded_by = update.uploaded_by;
        if update.description.is_some() {
            self.description = update.description;
        }
    }
}

/// Per-user document counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocumentStats {
    pub total_documents: usize,
    pub active_documents: usize,
    pub inactive_documents: usize,
    /// Active documents per file type.
    pub documents_by_type: BTreeMap<String, usize>,
}

impl UserDocumentStats {
    /// Counts every document in `documents` that belongs to `user_id`.
    pub fn for_user(user_id: &str, documents: &[UserDocument]) -> Self {
        let mut stats = Self::default();
        for document in documents.iter().filter(|d| d.user_id == user_id) {
            stats.total_documents += 1;
            if document.is_active() {
                stats.active_documents += 1;
                *stats
                    .documents_by_type
                    .entry(document.file_type.clone())
                    .or_insert(0) += 1;
            } else {
                stats.inactive_documents += 1;
            }
        }
        stats
    }
}

use chrono::{DateTime, Utc};
use lifecycle_framework::{EntityStatus, LifecycleEntity, Validate};
use serde::{Deserialize, Serialize};

fn default_role() -> String {
    "USER".to_string()
}

/// A registered person (patient, parent, staff member) managed by the
/// users service.
///
/// # Lifecycle
/// This struct implements [`LifecycleEntity`], so a
/// [`ResourceClient<User>`](lifecycle_framework::ResourceClient) can drive it.
/// See the trait impl for the candidate types:
/// - Creation payload ([`UserCreate`]), which requires a password
/// - Update payload ([`UserUpdate`]), where the password is optional
///
/// The password is write-only and never part of this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lifecycle_framework::id::optional"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub document_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_image: Option<String>,
    #[serde(default)]
    pub status: EntityStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Builds an unsaved, active user from a creation payload.
    pub fn new(params: &UserCreate) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            firstname: params.firstname.clone(),
            lastname: params.lastname.clone(),
            document_type: params.document_type.clone(),
            document_number: params.document_number.clone(),
            email: params.email.clone(),
            phone: params.phone.clone(),
            role: params.role.clone(),
            user_image: params.user_image.clone(),
            status: EntityStatus::Active,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// `"first last"`, trimmed when either part is empty.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }

    /// Case-insensitive match on name, email or document number.
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            self.full_name(),
            self.email.clone(),
            self.document_number.clone(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Payload for creating a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub firstname: String,
    pub lastname: String,
    pub document_type: String,
    pub document_number: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_image: Option<String>,
}

impl Default for UserCreate {
    fn default() -> Self {
        Self {
            firstname: String::new(),
            lastname: String::new(),
            document_type: String::new(),
            document_number: String::new(),
            email: String::new(),
            phone: String::new(),
            password: String::new(),
            role: default_role(),
            user_image: None,
        }
    }
}

impl Validate for UserCreate {
    fn required_fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("firstname", Some(self.firstname.as_str())),
            ("lastname", Some(self.lastname.as_str())),
            ("documentType", Some(self.document_type.as_str())),
            ("documentNumber", Some(self.document_number.as_str())),
            ("email", Some(self.email.as_str())),
            ("phone", Some(self.phone.as_str())),
            ("role", Some(self.role.as_str())),
            ("password", Some(self.password.as_str())),
        ]
    }

    fn email(&self) -> Option<&str> {
        Some(&self.email)
    }
}

/// Payload for updating an existing user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub firstname: String,
    pub lastname: String,
    pub document_type: String,
    pub document_number: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    /// Only sent when the password changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_image: Option<String>,
}

impl From<&User> for UserUpdate {
    fn from(user: &User) -> Self {
        Self {
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            document_type: user.document_type.clone(),
            document_number: user.document_number.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role.clone(),
            password: None,
            user_image: user.user_image.clone(),
        }
    }
}

impl Validate for UserUpdate {
    fn required_fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("firstname", Some(self.firstname.as_str())),
            ("lastname", Some(self.lastname.as_str())),
            ("documentType", Some(self.document_type.as_str())),
            ("documentNumber", Some(self.document_number.as_str())),
            ("email", Some(self.email.as_str())),
            ("phone", Some(self.phone.as_str())),
            ("role", Some(self.role.as_str())),
        ]
    }

    fn email(&self) -> Option<&str> {
        Some(&self.email)
    }
}

impl LifecycleEntity for User {
    type Create = UserCreate;
    type Update = UserUpdate;

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

    fn on_update(&mut self, update: UserUpdate) {
        self.firstname = update.firstname;
        self.lastname = update.lastname;
        self.document_type = update.document_type;
        self.document_number = update.document_number;
        self.email = update.email;
        self.phone = update.phone;
        self.role = update.role;
        if update.user_image.is_some() {
            self.user_image = update.user_image;
        }
    }
}

//! # Candidate Validation
//!
//! Pure predicates run on the client side before any request is sent. A
//! candidate that fails validation never reaches the transport: the client
//! short-circuits with a 400-style [`ValidationError`].
//!
//! Rules:
//! - A required field is satisfied when present and non-blank after trimming.
//! - Missing fields are checked first. Email format is only checked once every
//!   required field is present.
//! - Email shape is `local@domain.tld` with no whitespace and no extra `@`.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

/// Client-side rejection of a request before it is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// An identifier argument was blank.
    #[error("{0} is required")]
    Required(&'static str),
    /// An identifier that would not survive as a single path segment.
    #[error("{0} is invalid")]
    InvalidId(&'static str),
    #[error("Required fields are missing: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid email format")]
    InvalidEmail,
}

/// A candidate payload that knows which of its fields are mandatory.
///
/// Implementors only list their fields; the provided methods apply the shared
/// rules so that create and update checks cannot drift apart.
pub trait Validate {
    /// `(name, value)` for each field that must be present.
    fn required_fields(&self) -> Vec<(&'static str, Option<&str>)>;

    /// Email to format-check, if this candidate carries one.
    fn email(&self) -> Option<&str> {
        None
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let missing = missing_fields(self.required_fields());
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }
        match self.email() {
            Some(email) if !is_valid_email(email) => Err(ValidationError::InvalidEmail),
            _ => Ok(()),
        }
    }

    fn is_well_formed(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Names of the fields that are absent or blank, in declaration order.
pub fn missing_fields<'a, I>(fields: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = (&'static str, Option<&'a str>)>,
{
    fields
        .into_iter()
        .filter(|(_, value)| !is_present(*value))
        .map(|(name, _)| name)
        .collect()
}

/// `true` when the value exists and is not blank after trimming.
pub fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Rejects blank identifiers, and the dot segments `.` and `..` that URL
/// normalization would fold into the parent path, before they are spliced
/// into a URL.
pub fn require_id<'a>(label: &'static str, id: &'a str) -> Result<&'a str, ValidationError> {
    match id.trim() {
        "" => Err(ValidationError::Required(label)),
        "." | ".." => Err(ValidationError::InvalidId(label)),
        trimmed => Ok(trimmed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Candidate {
        name: Option<String>,
        email: Option<String>,
    }

    impl Validate for Candidate {
        fn required_fields(&self) -> Vec<(&'static str, Option<&str>)> {
            vec![("name", self.name.as_deref()), ("email", self.email.as_deref())]
        }

        fn email(&self) -> Option<&str> {
            self.email.as_deref()
        }
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("ana@x.io"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("ana@x"));
        assert!(!is_valid_email("ana x@x.io"));
        assert!(!is_valid_email("a@b@c.io"));
        assert!(!is_valid_email("@x.io"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_blank_fields_are_missing() {
        let missing = missing_fields([("a", Some("  ")), ("b", None), ("c", Some("x"))]);
        assert_eq!(missing, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_fields_reported_before_email_format() {
        let candidate = Candidate {
            name: None,
            email: Some("not-an-email".into()),
        };
        assert_eq!(
            candidate.validate(),
            Err(ValidationError::MissingFields(vec!["name"]))
        );

        let candidate = Candidate {
            name: Some("Ana".into()),
            email: Some("not-an-email".into()),
        };
        assert_eq!(candidate.validate(), Err(ValidationError::InvalidEmail));
        assert!(!candidate.is_well_formed());
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id("id", " 7 "), Ok("7"));
        assert_eq!(require_id("id", "   "), Err(ValidationError::Required("id")));
        assert_eq!(require_id("id", ".."), Err(ValidationError::InvalidId("id")));
        assert_eq!(require_id("id", " . "), Err(ValidationError::InvalidId("id")));
        assert_eq!(require_id("id", "...").map(str::len), Ok(3));
        assert_eq!(require_id("id", "a.b"), Ok("a.b"));
        assert_eq!(
            ValidationError::Required("Document ID").to_string(),
            "Document ID is required"
        );
    }
}

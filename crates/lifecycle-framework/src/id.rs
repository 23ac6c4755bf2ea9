//! Identifier fields that arrive as JSON strings or integers.
//!
//! Backends differ on whether `id` is `"5"` or `5`. Records keep ids as
//! opaque text, so both spellings deserialize to the same `String`:
//!
//! ```rust,ignore
//! #[derive(Deserialize)]
//! struct Document {
//!     #[serde(default, deserialize_with = "lifecycle_framework::id::optional")]
//!     id: Option<String>,
//!     #[serde(default, deserialize_with = "lifecycle_framework::id::required")]
//!     user_id: String,
//! }
//! ```

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

/// `null` becomes `None`; strings and integers become their text.
pub fn optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    deserializer.deserialize_any(IdVisitor)
}

/// Like [`optional`], with `null` read as an empty id.
pub fn required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    optional(deserializer).map(Option::unwrap_or_default)
}

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or integer identifier")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(self)
    }
}

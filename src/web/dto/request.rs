//! Request DTOs for Web API.
//!
//! Every field is optional at the wire level; absent and empty strings are
//! treated alike. Identifier fields accept both camelCase and snake_case.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use validator::Validate;

use super::validation::DocumentModel;

/// Deserialize any scalar as its string form.
///
/// Numbers and booleans are converted, `null` is absent, and arrays or
/// objects are absent as well, so a well-formed body never fails to
/// deserialize because of a field's type.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientString)
}

struct LenientString;

impl<'de> Visitor<'de> for LenientString {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number or boolean")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

/// Return the value if it is present and non-empty.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Create thread request.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequest {
    /// Thread text.
    #[validate(
        required(message = "Path `text` is required."),
        length(min = 1, message = "Path `text` is required.")
    )]
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
    /// Deletion password.
    #[validate(
        required(message = "Path `password` is required."),
        length(min = 1, message = "Path `password` is required.")
    )]
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
}

impl DocumentModel for CreateThreadRequest {
    const MODEL: &'static str = "Thread";
}

/// Create reply request.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReplyRequest {
    /// Thread to reply to.
    #[serde(default, alias = "thread_id", deserialize_with = "lenient_string")]
    pub thread_id: Option<String>,
    /// Reply text.
    #[validate(
        required(message = "Path `text` is required."),
        length(min = 1, message = "Path `text` is required.")
    )]
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
    /// Deletion password.
    #[validate(
        required(message = "Path `password` is required."),
        length(min = 1, message = "Path `password` is required.")
    )]
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
}

impl DocumentModel for CreateReplyRequest {
    const MODEL: &'static str = "Reply";
}

/// Delete thread request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteThreadRequest {
    #[serde(default, alias = "thread_id", deserialize_with = "lenient_string")]
    pub thread_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
}

/// Report thread request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportThreadRequest {
    #[serde(default, alias = "thread_id", deserialize_with = "lenient_string")]
    pub thread_id: Option<String>,
}

/// Delete reply request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReplyRequest {
    #[serde(default, alias = "thread_id", deserialize_with = "lenient_string")]
    pub thread_id: Option<String>,
    #[serde(default, alias = "reply_id", deserialize_with = "lenient_string")]
    pub reply_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
}

/// Report reply request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportReplyRequest {
    #[serde(default, alias = "thread_id", deserialize_with = "lenient_string")]
    pub thread_id: Option<String>,
    #[serde(default, alias = "reply_id", deserialize_with = "lenient_string")]
    pub reply_id: Option<String>,
}

/// Query string selecting a single thread.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadQuery {
    #[serde(default, alias = "thread_id", deserialize_with = "lenient_string")]
    pub thread_id: Option<String>,
}

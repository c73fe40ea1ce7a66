//! Response DTOs for Web API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::board::{Reply, Thread};
use crate::db::{ReplyId, ThreadId};

/// Serialize a timestamp as RFC 3339 with millisecond precision.
fn serialize_timestamp<S: Serializer>(
    value: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Thread response.
///
/// `password` and `reported` are only present on the full view returned
/// to the poster; listings use the public view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadResponse {
    #[serde(rename = "_id")]
    pub id: ThreadId,
    pub board: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub bumped_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported: Option<bool>,
    pub replies: Vec<ReplyResponse>,
}

impl ThreadResponse {
    /// Every stored field, including the password.
    pub fn full(thread: Thread) -> Self {
        Self {
            id: thread.id,
            board: thread.board,
            text: thread.text,
            password: Some(thread.password),
            created_at: thread.created_at,
            bumped_at: thread.bumped_at,
            reported: Some(thread.reported),
            replies: thread.replies.into_iter().map(ReplyResponse::full).collect(),
        }
    }

    /// Without password and reported flag, on the thread and its replies.
    pub fn public(thread: Thread) -> Self {
        Self {
            id: thread.id,
            board: thread.board,
            text: thread.text,
            password: None,
            created_at: thread.created_at,
            bumped_at: thread.bumped_at,
            reported: None,
            replies: thread
                .replies
                .into_iter()
                .map(ReplyResponse::public)
                .collect(),
        }
    }
}

/// Reply response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    #[serde(rename = "_id")]
    pub id: ReplyId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported: Option<bool>,
}

impl ReplyResponse {
    pub fn full(reply: Reply) -> Self {
        Self {
            id: reply.id,
            text: reply.text,
            password: Some(reply.password),
            created_at: reply.created_at,
            reported: Some(reply.reported),
        }
    }

    pub fn public(reply: Reply) -> Self {
        Self {
            id: reply.id,
            text: reply.text,
            password: None,
            created_at: reply.created_at,
            reported: None,
        }
    }
}

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_thread() -> Thread {
        let created_at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let thread_id = ThreadId::generate();
        Thread {
            id: thread_id,
            board: "general".to_string(),
            text: "hello".to_string(),
            password: "s3cr3t".to_string(),
            created_at,
            bumped_at: created_at,
            reported: false,
            replies: vec![Reply {
                id: ReplyId::generate(),
                thread_id,
                text: "reply".to_string(),
                password: "rpw".to_string(),
                created_at,
                reported: true,
            }],
        }
    }

    #[test]
    fn test_full_view() {
        let thread = sample_thread();
        let id = thread.id;
        let json = serde_json::to_value(ThreadResponse::full(thread)).unwrap();

        assert_eq!(json["_id"], id.to_string());
        assert_eq!(json["board"], "general");
        assert_eq!(json["password"], "s3cr3t");
        assert_eq!(json["reported"], false);
        assert_eq!(json["createdAt"], "2023-11-14T22:13:20.123Z");
        assert_eq!(json["bumpedAt"], json["createdAt"]);
        assert_eq!(json["replies"][0]["password"], "rpw");
        assert_eq!(json["replies"][0]["reported"], true);
    }

    #[test]
    fn test_public_view_hides_secrets() {
        let json = serde_json::to_value(ThreadResponse::public(sample_thread())).unwrap();
        let object = json.as_object().unwrap();

        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("reported"));

        let reply = json["replies"][0].as_object().unwrap();
        assert!(!reply.contains_key("password"));
        assert!(!reply.contains_key("reported"));
        assert_eq!(reply["text"], "reply");
    }

    #[test]
    fn test_message_response() {
        let json = serde_json::to_value(MessageResponse::new("reported")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "reported" }));
    }
}

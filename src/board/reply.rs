//! Reply model.

use chrono::{DateTime, Utc};

use crate::db::{ReplyId, ThreadId};

/// Text a deleted reply is replaced with.
pub const DELETED_REPLY_TEXT: &str = "[deleted]";

/// A comment attached to exactly one thread.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Unique reply ID.
    pub id: ReplyId,
    /// Thread this reply belongs to.
    pub thread_id: ThreadId,
    /// Reply body.
    pub text: String,
    /// Plaintext deletion password.
    pub password: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Whether the reply has been reported.
    pub reported: bool,
}

impl Reply {
    /// Check if the reply has been deleted by its author.
    pub fn is_deleted(&self) -> bool {
        self.text == DELETED_REPLY_TEXT
    }
}

/// Data for creating a new reply.
#[derive(Debug, Clone)]
pub struct NewReply {
    /// Thread to reply to.
    pub thread_id: ThreadId,
    /// Reply body.
    pub text: String,
    /// Deletion password.
    pub password: String,
}

impl NewReply {
    /// Create a new reply with required fields.
    pub fn new(thread_id: ThreadId, text: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            thread_id,
            text: text.into(),
            password: password.into(),
        }
    }
}

//! Thread model.

use chrono::{DateTime, Utc};

use super::reply::Reply;
use crate::db::ThreadId;

/// A top-level post on a board together with its replies.
#[derive(Debug, Clone)]
pub struct Thread {
    /// Unique thread ID.
    pub id: ThreadId,
    /// Name of the board this thread belongs to.
    pub board: String,
    /// Thread body.
    pub text: String,
    /// Plaintext deletion password.
    pub password: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Creation time of the latest reply, or `created_at` if there is none.
    pub bumped_at: DateTime<Utc>,
    /// Whether the thread has been reported.
    pub reported: bool,
    /// Replies in chronological order.
    ///
    /// Board listings load only the most recent few.
    pub replies: Vec<Reply>,
}

/// Data for creating a new thread.
#[derive(Debug, Clone)]
pub struct NewThread {
    /// Board to post to.
    pub board: String,
    /// Thread body.
    pub text: String,
    /// Deletion password.
    pub password: String,
}

impl NewThread {
    /// Create a new thread with required fields.
    pub fn new(
        board: impl Into<String>,
        text: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            board: board.into(),
            text: text.into(),
            password: password.into(),
        }
    }
}

//! Board service.
//!
//! High-level operations behind the HTTP API. Client-supplied identifiers
//! arrive as raw strings: a malformed id is indistinguishable from an id
//! that matches nothing, and every password failure looks the same to the
//! caller.

use crate::db::{DbPool, ReplyId, ThreadId};
use crate::Result;

use super::reply::NewReply;
use super::reply_repository::ReplyRepository;
use super::thread::{NewThread, Thread};
use super::thread_repository::ThreadRepository;

/// Default maximum number of threads in a board listing.
pub const DEFAULT_MAX_THREADS: u32 = 10;

/// Default maximum number of replies embedded per listed thread.
pub const DEFAULT_MAX_REPLIES: u32 = 3;

/// Caps applied to board listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingLimits {
    /// Maximum number of threads returned.
    pub max_threads: u32,
    /// Maximum number of replies embedded in each thread.
    pub max_replies: u32,
}

impl ListingLimits {
    /// Create listing limits.
    pub fn new(max_threads: u32, max_replies: u32) -> Self {
        Self {
            max_threads,
            max_replies,
        }
    }
}

impl Default for ListingLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_THREADS, DEFAULT_MAX_REPLIES)
    }
}

/// Result of creating a reply.
#[derive(Debug)]
pub enum ReplyOutcome {
    /// The reply was stored; carries the bumped thread with all replies.
    Created(Thread),
    /// The thread does not exist on this board.
    ThreadNotFound,
}

/// Result of a password-protected deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The document was deleted.
    Deleted,
    /// Missing or wrong password, or nothing to delete.
    IncorrectPassword,
}

/// Result of reporting a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The document is now flagged.
    Reported,
    /// Nothing matched.
    NotFound,
}

/// Board service providing the thread and reply operations.
pub struct BoardService<'a> {
    pool: &'a DbPool,
    limits: ListingLimits,
}

impl<'a> BoardService<'a> {
    /// Create a new BoardService with default listing limits.
    pub fn new(pool: &'a DbPool) -> Self {
        Self {
            pool,
            limits: ListingLimits::default(),
        }
    }

    /// Override the listing limits.
    pub fn with_limits(mut self, limits: ListingLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Create a new thread on a board.
    pub async fn create_thread(&self, board: &str, text: &str, password: &str) -> Result<Thread> {
        let thread = ThreadRepository::new(self.pool)
            .create(&NewThread::new(board, text, password))
            .await?;
        tracing::info!(board, thread_id = %thread.id, "Thread created");
        Ok(thread)
    }

    /// List the most recently bumped threads of a board.
    ///
    /// Unknown boards simply have no threads.
    pub async fn list_threads(&self, board: &str) -> Result<Vec<Thread>> {
        ThreadRepository::new(self.pool)
            .list_by_board(
                board,
                i64::from(self.limits.max_threads),
                i64::from(self.limits.max_replies),
            )
            .await
    }

    /// Get a single thread with every reply.
    pub async fn get_thread(&self, board: &str, thread_id: &str) -> Result<Option<Thread>> {
        let Some(id) = ThreadId::parse(thread_id) else {
            return Ok(None);
        };
        ThreadRepository::new(self.pool).get_by_id(board, id).await
    }

    /// Delete a thread and its replies.
    ///
    /// Succeeds only if the id resolves to a thread on this board and the
    /// password matches exactly.
    pub async fn delete_thread(
        &self,
        board: &str,
        thread_id: Option<&str>,
        password: Option<&str>,
    ) -> Result<DeleteOutcome> {
        let (Some(id), Some(password)) = (thread_id.and_then(ThreadId::parse), password) else {
            tracing::debug!(board, "Thread deletion rejected: missing or malformed input");
            return Ok(DeleteOutcome::IncorrectPassword);
        };

        if ThreadRepository::new(self.pool)
            .delete_with_password(board, id, password)
            .await?
        {
            tracing::info!(board, thread_id = %id, "Thread deleted");
            Ok(DeleteOutcome::Deleted)
        } else {
            tracing::debug!(board, thread_id = %id, "Thread deletion rejected");
            Ok(DeleteOutcome::IncorrectPassword)
        }
    }

    /// Flag a thread as reported.
    pub async fn report_thread(&self, board: &str, thread_id: &str) -> Result<ReportOutcome> {
        let Some(id) = ThreadId::parse(thread_id) else {
            return Ok(ReportOutcome::NotFound);
        };

        if ThreadRepository::new(self.pool).report(board, id).await? {
            tracing::info!(board, thread_id = %id, "Thread reported");
            Ok(ReportOutcome::Reported)
        } else {
            Ok(ReportOutcome::NotFound)
        }
    }

    /// Reply to a thread, bumping it.
    pub async fn create_reply(
        &self,
        board: &str,
        thread_id: &str,
        text: &str,
        password: &str,
    ) -> Result<ReplyOutcome> {
        let Some(id) = ThreadId::parse(thread_id) else {
            return Ok(ReplyOutcome::ThreadNotFound);
        };

        match ReplyRepository::new(self.pool)
            .create_and_bump(board, &NewReply::new(id, text, password))
            .await?
        {
            Some(thread) => {
                tracing::info!(board, thread_id = %id, replies = thread.replies.len(), "Reply created");
                Ok(ReplyOutcome::Created(thread))
            }
            None => Ok(ReplyOutcome::ThreadNotFound),
        }
    }

    /// Mark a reply as deleted.
    ///
    /// Same rules as thread deletion; the reply additionally has to belong
    /// to the given thread.
    pub async fn delete_reply(
        &self,
        board: &str,
        thread_id: Option<&str>,
        reply_id: Option<&str>,
        password: Option<&str>,
    ) -> Result<DeleteOutcome> {
        let thread_id = thread_id.and_then(ThreadId::parse);
        let reply_id = reply_id.and_then(ReplyId::parse);
        let (Some(thread_id), Some(reply_id), Some(password)) = (thread_id, reply_id, password)
        else {
            tracing::debug!(board, "Reply deletion rejected: missing or malformed input");
            return Ok(DeleteOutcome::IncorrectPassword);
        };

        if ReplyRepository::new(self.pool)
            .delete_with_password(board, thread_id, reply_id, password)
            .await?
        {
            tracing::info!(board, %thread_id, %reply_id, "Reply deleted");
            Ok(DeleteOutcome::Deleted)
        } else {
            tracing::debug!(board, %thread_id, %reply_id, "Reply deletion rejected");
            Ok(DeleteOutcome::IncorrectPassword)
        }
    }

    /// Flag a reply as reported.
    pub async fn report_reply(
        &self,
        board: &str,
        thread_id: &str,
        reply_id: &str,
    ) -> Result<ReportOutcome> {
        let (Some(thread_id), Some(reply_id)) =
            (ThreadId::parse(thread_id), ReplyId::parse(reply_id))
        else {
            return Ok(ReportOutcome::NotFound);
        };

        if ReplyRepository::new(self.pool)
            .report(board, thread_id, reply_id)
            .await?
        {
            tracing::info!(board, %thread_id, %reply_id, "Reply reported");
            Ok(ReportOutcome::Reported)
        } else {
            Ok(ReportOutcome::NotFound)
        }
    }
}

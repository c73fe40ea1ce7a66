//! Reply repository.

use sqlx::SqliteConnection;

use super::reply::{NewReply, Reply, DELETED_REPLY_TEXT};
use super::thread::Thread;
use super::thread_repository::fetch_thread;
use crate::db::{from_millis, now_millis, to_millis, DbPool, ReplyId, ThreadId};
use crate::{BoardError, Result};

const REPLY_COLUMNS: &str = "id, thread_id, text, password, created_at, reported";

/// Repository for reply documents.
pub struct ReplyRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ReplyRepository<'a> {
    /// Create a new ReplyRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Append a reply to a thread and bump the thread.
    ///
    /// Runs in one transaction: the thread's `bumped_at` is moved to the
    /// reply's creation time, the reply is inserted, and the updated thread
    /// is read back with all replies. The bump is the first statement so the
    /// write lock is taken before anything is read.
    ///
    /// Returns `None` (and writes nothing) if the thread does not exist on
    /// this board.
    pub async fn create_and_bump(
        &self,
        board: &str,
        new_reply: &NewReply,
    ) -> Result<Option<Thread>> {
        let mut tx = self.pool.begin().await?;

        // never move bumped_at backwards, even if the clock does
        let bumped_at: Option<i64> = sqlx::query_scalar(
            "UPDATE threads
             SET bumped_at = MAX(bumped_at, ?),
                 bump_seq = (SELECT MAX(bump_seq) FROM threads) + 1
             WHERE id = ? AND board = ? RETURNING bumped_at",
        )
        .bind(to_millis(now_millis()))
        .bind(new_reply.thread_id.to_string())
        .bind(board)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(created_at) = bumped_at else {
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO replies (id, thread_id, text, password, created_at, reported)
             VALUES (?, ?, ?, ?, ?, 0)",
        )
        .bind(ReplyId::generate().to_string())
        .bind(new_reply.thread_id.to_string())
        .bind(&new_reply.text)
        .bind(&new_reply.password)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        let thread = fetch_thread(&mut tx, board, new_reply.thread_id).await?;
        tx.commit().await?;

        Ok(thread)
    }

    /// Get a single reply of a thread.
    pub async fn get_by_id(&self, thread_id: ThreadId, id: ReplyId) -> Result<Option<Reply>> {
        let query = format!("SELECT {REPLY_COLUMNS} FROM replies WHERE id = ? AND thread_id = ?");
        let row: Option<ReplyRow> = sqlx::query_as(&query)
            .bind(id.to_string())
            .bind(thread_id.to_string())
            .fetch_optional(self.pool)
            .await?;

        row.map(ReplyRow::into_reply).transpose()
    }

    /// Replace the text of a reply with the deleted marker if the password matches.
    ///
    /// The reply keeps its place in the thread. Returns false if the reply
    /// does not belong to that thread on this board or the password is wrong.
    pub async fn delete_with_password(
        &self,
        board: &str,
        thread_id: ThreadId,
        id: ReplyId,
        password: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE replies SET text = ?
             WHERE id = ? AND thread_id = ? AND password = ?
               AND EXISTS (SELECT 1 FROM threads WHERE threads.id = replies.thread_id AND board = ?)",
        )
        .bind(DELETED_REPLY_TEXT)
        .bind(id.to_string())
        .bind(thread_id.to_string())
        .bind(password)
        .bind(board)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flag a reply as reported.
    ///
    /// Returns false if the reply does not belong to that thread on this board.
    pub async fn report(&self, board: &str, thread_id: ThreadId, id: ReplyId) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE replies SET reported = 1
             WHERE id = ? AND thread_id = ?
               AND EXISTS (SELECT 1 FROM threads WHERE threads.id = replies.thread_id AND board = ?)",
        )
        .bind(id.to_string())
        .bind(thread_id.to_string())
        .bind(board)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count replies in a thread.
    pub async fn count_by_thread(&self, thread_id: ThreadId) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM replies WHERE thread_id = ?")
            .bind(thread_id.to_string())
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

/// Load every reply of a thread in chronological order.
pub(super) async fn fetch_all_replies(
    conn: &mut SqliteConnection,
    thread_id: ThreadId,
) -> Result<Vec<Reply>> {
    let query = format!(
        "SELECT {REPLY_COLUMNS} FROM replies WHERE thread_id = ? ORDER BY created_at ASC, seq ASC"
    );
    let rows: Vec<ReplyRow> = sqlx::query_as(&query)
        .bind(thread_id.to_string())
        .fetch_all(&mut *conn)
        .await?;

    rows.into_iter().map(ReplyRow::into_reply).collect()
}

/// Load the `limit` most recent replies of a thread, oldest first.
pub(super) async fn fetch_recent_replies(
    conn: &mut SqliteConnection,
    thread_id: ThreadId,
    limit: i64,
) -> Result<Vec<Reply>> {
    let query = format!(
        "SELECT {REPLY_COLUMNS} FROM replies WHERE thread_id = ?
         ORDER BY created_at DESC, seq DESC LIMIT ?"
    );
    let rows: Vec<ReplyRow> = sqlx::query_as(&query)
        .bind(thread_id.to_string())
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

    let mut replies = rows
        .into_iter()
        .map(ReplyRow::into_reply)
        .collect::<Result<Vec<_>>>()?;
    replies.reverse();
    Ok(replies)
}

/// Internal struct for mapping database rows to Reply.
#[derive(sqlx::FromRow)]
struct ReplyRow {
    id: String,
    thread_id: String,
    text: String,
    password: String,
    created_at: i64,
    reported: bool,
}

impl ReplyRow {
    fn into_reply(self) -> Result<Reply> {
        let id = ReplyId::parse(&self.id).ok_or_else(|| {
            BoardError::Database(format!("malformed stored reply id: {}", self.id))
        })?;
        let thread_id = ThreadId::parse(&self.thread_id).ok_or_else(|| {
            BoardError::Database(format!("malformed stored thread id: {}", self.thread_id))
        })?;

        Ok(Reply {
            id,
            thread_id,
            text: self.text,
            password: self.password,
            created_at: from_millis(self.created_at),
            reported: self.reported,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{NewThread, ThreadRepository};
    use crate::Database;

    async fn setup() -> (Database, Thread) {
        let db = Database::open_in_memory().await.unwrap();
        let thread = ThreadRepository::new(db.pool())
            .create(&NewThread::new("general", "Thread text", "s3cr3t"))
            .await
            .unwrap();
        (db, thread)
    }

    #[tokio::test]
    async fn test_create_and_bump() {
        let (db, thread) = setup().await;
        let repo = ReplyRepository::new(db.pool());

        let updated = repo
            .create_and_bump("general", &NewReply::new(thread.id, "reply text", "pw"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, thread.id);
        assert_eq!(updated.replies.len(), 1);

        let reply = &updated.replies[0];
        assert_eq!(reply.text, "reply text");
        assert_eq!(reply.password, "pw");
        assert_eq!(reply.thread_id, thread.id);
        assert!(!reply.reported);
        assert_eq!(updated.bumped_at, reply.created_at);
        assert!(updated.bumped_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_create_keeps_insertion_order() {
        let (db, thread) = setup().await;
        let repo = ReplyRepository::new(db.pool());

        for text in ["first", "second", "third"] {
            repo.create_and_bump("general", &NewReply::new(thread.id, text, "pw"))
                .await
                .unwrap();
        }

        let updated = ThreadRepository::new(db.pool())
            .get_by_id("general", thread.id)
            .await
            .unwrap()
            .unwrap();
        let texts: Vec<&str> = updated.replies.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(updated.bumped_at, updated.replies[2].created_at);
    }

    #[tokio::test]
    async fn test_create_on_missing_thread() {
        let (db, thread) = setup().await;
        let repo = ReplyRepository::new(db.pool());

        let missing = repo
            .create_and_bump("general", &NewReply::new(ThreadId::generate(), "x", "pw"))
            .await
            .unwrap();
        assert!(missing.is_none());

        let wrong_board = repo
            .create_and_bump("other", &NewReply::new(thread.id, "x", "pw"))
            .await
            .unwrap();
        assert!(wrong_board.is_none());
        assert_eq!(repo.count_by_thread(thread.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_with_password() {
        let (db, thread) = setup().await;
        let repo = ReplyRepository::new(db.pool());
        let updated = repo
            .create_and_bump("general", &NewReply::new(thread.id, "oops", "right"))
            .await
            .unwrap()
            .unwrap();
        let reply_id = updated.replies[0].id;

        assert!(!repo
            .delete_with_password("general", thread.id, reply_id, "wrong")
            .await
            .unwrap());
        assert!(!repo
            .delete_with_password("other", thread.id, reply_id, "right")
            .await
            .unwrap());
        assert!(repo
            .delete_with_password("general", thread.id, reply_id, "right")
            .await
            .unwrap());

        let reply = repo.get_by_id(thread.id, reply_id).await.unwrap().unwrap();
        assert!(reply.is_deleted());
        assert_eq!(repo.count_by_thread(thread.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_report() {
        let (db, thread) = setup().await;
        let repo = ReplyRepository::new(db.pool());
        let updated = repo
            .create_and_bump("general", &NewReply::new(thread.id, "spam", "pw"))
            .await
            .unwrap()
            .unwrap();
        let reply_id = updated.replies[0].id;

        assert!(!repo.report("general", thread.id, ReplyId::generate()).await.unwrap());
        assert!(repo.report("general", thread.id, reply_id).await.unwrap());

        let reply = repo.get_by_id(thread.id, reply_id).await.unwrap().unwrap();
        assert!(reply.reported);
    }
}

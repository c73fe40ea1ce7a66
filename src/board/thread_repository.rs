//! Thread repository.
//!
//! Threads are always addressed together with their board, so a thread id
//! posted under the wrong board behaves as if it did not exist.

use sqlx::SqliteConnection;

use super::reply::Reply;
use super::reply_repository::{fetch_all_replies, fetch_recent_replies};
use super::thread::{NewThread, Thread};
use crate::db::{from_millis, now_millis, to_millis, DbPool, ThreadId};
use crate::{BoardError, Result};

const THREAD_COLUMNS: &str = "id, board, text, password, created_at, bumped_at, reported";

/// Repository for thread documents.
pub struct ThreadRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ThreadRepository<'a> {
    /// Create a new ThreadRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new thread.
    ///
    /// `bumped_at` starts out equal to `created_at` and the reply list is empty.
    pub async fn create(&self, new_thread: &NewThread) -> Result<Thread> {
        let id = ThreadId::generate();
        let now = now_millis();

        sqlx::query(
            "INSERT INTO threads (id, board, text, password, created_at, bumped_at, bump_seq, reported)
             VALUES (?, ?, ?, ?, ?, ?, (SELECT COALESCE(MAX(bump_seq), 0) + 1 FROM threads), 0)",
        )
        .bind(id.to_string())
        .bind(&new_thread.board)
        .bind(&new_thread.text)
        .bind(&new_thread.password)
        .bind(to_millis(now))
        .bind(to_millis(now))
        .execute(self.pool)
        .await?;

        Ok(Thread {
            id,
            board: new_thread.board.clone(),
            text: new_thread.text.clone(),
            password: new_thread.password.clone(),
            created_at: now,
            bumped_at: now,
            reported: false,
            replies: Vec::new(),
        })
    }

    /// Get a thread on a board with all of its replies.
    pub async fn get_by_id(&self, board: &str, id: ThreadId) -> Result<Option<Thread>> {
        let mut conn = self.pool.acquire().await?;
        fetch_thread(&mut conn, board, id).await
    }

    /// List the most recently bumped threads of a board.
    ///
    /// Each thread carries at most `reply_limit` of its latest replies,
    /// in chronological order.
    pub async fn list_by_board(
        &self,
        board: &str,
        limit: i64,
        reply_limit: i64,
    ) -> Result<Vec<Thread>> {
        let mut conn = self.pool.acquire().await?;

        let query = format!(
            "SELECT {THREAD_COLUMNS} FROM threads WHERE board = ?
             ORDER BY bumped_at DESC, bump_seq DESC LIMIT ?"
        );
        let rows: Vec<ThreadRow> = sqlx::query_as(&query)
            .bind(board)
            .bind(limit)
            .fetch_all(&mut *conn)
            .await?;

        let mut threads = Vec::with_capacity(rows.len());
        for row in rows {
            let id = parse_stored_id(&row.id)?;
            let replies = fetch_recent_replies(&mut conn, id, reply_limit).await?;
            threads.push(row.into_thread(id, replies));
        }
        Ok(threads)
    }

    /// Delete a thread if the password matches.
    ///
    /// Replies are removed with it. Returns false if the thread does not
    /// exist on this board or the password is wrong.
    pub async fn delete_with_password(
        &self,
        board: &str,
        id: ThreadId,
        password: &str,
    ) -> Result<bool> {
        let result = sqlx::query("DELETE FROM threads WHERE id = ? AND board = ? AND password = ?")
            .bind(id.to_string())
            .bind(board)
            .bind(password)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flag a thread as reported.
    ///
    /// Returns false if the thread does not exist on this board.
    pub async fn report(&self, board: &str, id: ThreadId) -> Result<bool> {
        let result = sqlx::query("UPDATE threads SET reported = 1 WHERE id = ? AND board = ?")
            .bind(id.to_string())
            .bind(board)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count threads on a board.
    pub async fn count_by_board(&self, board: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM threads WHERE board = ?")
            .bind(board)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

/// Load a thread with all of its replies on an open connection.
pub(super) async fn fetch_thread(
    conn: &mut SqliteConnection,
    board: &str,
    id: ThreadId,
) -> Result<Option<Thread>> {
    let query = format!("SELECT {THREAD_COLUMNS} FROM threads WHERE id = ? AND board = ?");
    let row: Option<ThreadRow> = sqlx::query_as(&query)
        .bind(id.to_string())
        .bind(board)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => {
            let replies = fetch_all_replies(conn, id).await?;
            Ok(Some(row.into_thread(id, replies)))
        }
        None => Ok(None),
    }
}

pub(super) fn parse_stored_id(id: &str) -> Result<ThreadId> {
    ThreadId::parse(id)
        .ok_or_else(|| BoardError::Database(format!("malformed stored thread id: {id}")))
}

/// Internal struct for mapping database rows to Thread.
#[derive(sqlx::FromRow)]
struct ThreadRow {
    id: String,
    board: String,
    text: String,
    password: String,
    created_at: i64,
    bumped_at: i64,
    reported: bool,
}

impl ThreadRow {
    fn into_thread(self, id: ThreadId, replies: Vec<Reply>) -> Thread {
        Thread {
            id,
            board: self.board,
            text: self.text,
            password: self.password,
            created_at: from_millis(self.created_at),
            bumped_at: from_millis(self.bumped_at),
            reported: self.reported,
            replies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{NewReply, ReplyRepository};
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_thread() {
        let db = setup_db().await;
        let repo = ThreadRepository::new(db.pool());

        let thread = repo
            .create(&NewThread::new("general", "Thread text", "s3cr3t"))
            .await
            .unwrap();

        assert_eq!(thread.board, "general");
        assert_eq!(thread.text, "Thread text");
        assert_eq!(thread.password, "s3cr3t");
        assert_eq!(thread.created_at, thread.bumped_at);
        assert!(!thread.reported);
        assert!(thread.replies.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = setup_db().await;
        let repo = ThreadRepository::new(db.pool());
        let created = repo
            .create(&NewThread::new("general", "Thread text", "pw"))
            .await
            .unwrap();

        let found = repo.get_by_id("general", created.id).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.created_at, created.created_at);

        assert!(repo.get_by_id("other", created.id).await.unwrap().is_none());
        assert!(repo
            .get_by_id("general", ThreadId::generate())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_by_board_limits_and_filters() {
        let db = setup_db().await;
        let repo = ThreadRepository::new(db.pool());

        for i in 0..5 {
            repo.create(&NewThread::new("general", format!("thread {i}"), "pw"))
                .await
                .unwrap();
        }
        repo.create(&NewThread::new("other", "elsewhere", "pw"))
            .await
            .unwrap();

        let threads = repo.list_by_board("general", 3, 3).await.unwrap();
        assert_eq!(threads.len(), 3);
        assert!(threads.iter().all(|t| t.board == "general"));
        // newest first
        assert_eq!(threads[0].text, "thread 4");
        assert_eq!(threads[2].text, "thread 2");

        assert_eq!(repo.count_by_board("general").await.unwrap(), 5);
        assert!(repo.list_by_board("empty", 10, 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_board_caps_replies() {
        let db = setup_db().await;
        let repo = ThreadRepository::new(db.pool());
        let reply_repo = ReplyRepository::new(db.pool());

        let thread = repo
            .create(&NewThread::new("general", "busy thread", "pw"))
            .await
            .unwrap();
        for i in 0..5 {
            reply_repo
                .create_and_bump("general", &NewReply::new(thread.id, format!("reply {i}"), "pw"))
                .await
                .unwrap();
        }

        let threads = repo.list_by_board("general", 10, 3).await.unwrap();
        let texts: Vec<&str> = threads[0].replies.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["reply 2", "reply 3", "reply 4"]);

        let full = repo.get_by_id("general", thread.id).await.unwrap().unwrap();
        assert_eq!(full.replies.len(), 5);
    }

    #[tokio::test]
    async fn test_delete_with_password() {
        let db = setup_db().await;
        let repo = ThreadRepository::new(db.pool());
        let thread = repo
            .create(&NewThread::new("general", "to delete", "right"))
            .await
            .unwrap();

        assert!(!repo.delete_with_password("general", thread.id, "wrong").await.unwrap());
        assert!(!repo.delete_with_password("other", thread.id, "right").await.unwrap());
        assert!(repo.delete_with_password("general", thread.id, "right").await.unwrap());
        assert!(repo.get_by_id("general", thread.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_replies() {
        let db = setup_db().await;
        let repo = ThreadRepository::new(db.pool());
        let reply_repo = ReplyRepository::new(db.pool());

        let thread = repo
            .create(&NewThread::new("general", "with replies", "pw"))
            .await
            .unwrap();
        reply_repo
            .create_and_bump("general", &NewReply::new(thread.id, "reply", "pw"))
            .await
            .unwrap();
        assert_eq!(reply_repo.count_by_thread(thread.id).await.unwrap(), 1);

        assert!(repo.delete_with_password("general", thread.id, "pw").await.unwrap());
        assert_eq!(reply_repo.count_by_thread(thread.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_report() {
        let db = setup_db().await;
        let repo = ThreadRepository::new(db.pool());
        let thread = repo
            .create(&NewThread::new("general", "report me", "pw"))
            .await
            .unwrap();

        assert!(repo.report("general", thread.id).await.unwrap());
        assert!(!repo.report("general", ThreadId::generate()).await.unwrap());

        let found = repo.get_by_id("general", thread.id).await.unwrap().unwrap();
        assert!(found.reported);
    }
}

//! Database schema and migrations.
//!
//! Migrations are applied in order when the database is opened; the
//! `schema_version` table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: threads and their replies
    r#"
CREATE TABLE threads (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    id          TEXT NOT NULL UNIQUE,
    board       TEXT NOT NULL,
    text        TEXT NOT NULL,
    password    TEXT NOT NULL,
    created_at  INTEGER NOT NULL,           -- unix epoch millis
    bumped_at   INTEGER NOT NULL,           -- unix epoch millis
    bump_seq    INTEGER NOT NULL,           -- order of the latest bump, breaks ties
    reported    INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX idx_threads_board_bumped ON threads(board, bumped_at DESC, bump_seq DESC);

CREATE TABLE replies (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    id          TEXT NOT NULL UNIQUE,
    thread_id   TEXT NOT NULL REFERENCES threads(id) ON DELETE CASCADE,
    text        TEXT NOT NULL,
    password    TEXT NOT NULL,
    created_at  INTEGER NOT NULL,
    reported    INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX idx_replies_thread ON replies(thread_id, created_at);
"#,
];

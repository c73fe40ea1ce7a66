//! Anonymous message board.
//!
//! An HTTP JSON API for posting threads and replies to named boards,
//! backed by SQLite.

pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use board::{BoardService, Reply, Thread};
pub use config::Config;
pub use db::Database;
pub use error::{BoardError, Result};
pub use web::WebServer;

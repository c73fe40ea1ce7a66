//! Board module.
//!
//! Threads and replies posted to named boards. A board is only a filter
//! key on its threads; it is never stored on its own.

mod reply;
mod reply_repository;
mod service;
mod thread;
mod thread_repository;

pub use reply::{NewReply, Reply, DELETED_REPLY_TEXT};
pub use reply_repository::ReplyRepository;
pub use service::{
    BoardService, DeleteOutcome, ListingLimits, ReplyOutcome, ReportOutcome, DEFAULT_MAX_REPLIES,
    DEFAULT_MAX_THREADS,
};
pub use thread::{NewThread, Thread};
pub use thread_repository::ThreadRepository;

//! API handlers for the message board.

pub mod replies;
pub mod threads;

pub use replies::*;
pub use threads::*;

use crate::board::{BoardService, ListingLimits};
use crate::Database;

/// Message returned when a thread is deleted.
pub const THREAD_DELETED: &str = "thread successful deleted";
/// Message returned when a reply is deleted.
pub const REPLY_DELETED: &str = "reply successful deleted";
/// Message returned when a thread or reply is reported.
pub const REPORTED: &str = "reported";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Database,
    /// Caps applied to board listings.
    pub limits: ListingLimits,
}

impl AppState {
    /// Create a new AppState with default listing limits.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            limits: ListingLimits::default(),
        }
    }

    /// Override the listing limits.
    pub fn with_limits(mut self, limits: ListingLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Board service bound to this state.
    pub fn board_service(&self) -> BoardService<'_> {
        BoardService::new(self.db.pool()).with_limits(self.limits)
    }
}

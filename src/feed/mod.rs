//! The feed engine: a live, paginated, searchable, auto-refreshing message
//! collection with optimistic sends.
//!
//! DESIGN
//! ======
//! The store is the single source of truth for one workspace's messages.
//! Pagination, polling, and optimistic sends all mutate it through the
//! session's constrained API; search and date grouping are pure projections
//! computed on demand. Everything here is synchronous and I/O-free except
//! `poll`, which owns the tokio timer task.

pub mod cursor;
pub mod groups;
pub mod poll;
pub mod search;
pub mod send;
pub mod session;
pub mod store;

/// Feed-level error taxonomy. Only `Load` is fatal to the current view; all
/// other failures leave the feed displaying its last-known-good state.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("load failed: {reason}")]
    Load { reason: String },
    #[error("page fetch failed: {reason}")]
    Pagination { reason: String },
    #[error("refresh failed: {reason}")]
    Refresh { reason: String },
    #[error("send failed: {reason}")]
    Send { reason: String },
    #[error("{reason}")]
    Validation { reason: String },
}

impl FeedError {
    pub(crate) fn load(reason: impl std::fmt::Display) -> Self {
        Self::Load { reason: reason.to_string() }
    }

    pub(crate) fn pagination(reason: impl std::fmt::Display) -> Self {
        Self::Pagination { reason: reason.to_string() }
    }

    pub(crate) fn refresh(reason: impl std::fmt::Display) -> Self {
        Self::Refresh { reason: reason.to_string() }
    }

    pub(crate) fn send(reason: impl std::fmt::Display) -> Self {
        Self::Send { reason: reason.to_string() }
    }

    pub(crate) fn validation(reason: impl std::fmt::Display) -> Self {
        Self::Validation { reason: reason.to_string() }
    }

    /// True when the current view has nothing left to display.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Load { .. })
    }
}

/// Ephemeral, UI-local query state. Never persisted; derived views are
/// recomputed from it on demand.
#[derive(Debug, Clone)]
pub struct QueryState {
    pub search_term: String,
    pub auto_refresh_enabled: bool,
    /// Message id the view is anchored to, if the user scrolled away from
    /// the tail.
    pub scroll_anchor: Option<String>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            auto_refresh_enabled: true,
            scroll_anchor: None,
        }
    }
}

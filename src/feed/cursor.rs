//! Pagination cursor — forward-only page fetches with an in-flight guard.
//!
//! DESIGN
//! ======
//! `Idle -> Fetching -> Idle` on both success and failure; on failure the
//! position is unchanged. `begin_fetch` returns a typed no-op instead of an
//! error when a fetch is already in flight or no pages remain, so rapid
//! double-triggers never produce duplicate concurrent requests.

#[cfg(test)]
#[path = "cursor_test.rs"]
mod cursor_test;

use crate::net::types::PageInfo;

/// Outcome of asking the cursor for the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStart {
    /// Fetch this page number.
    Begin { page: u32 },
    /// A fetch is already in flight; nothing to do.
    AlreadyFetching,
    /// All pages are loaded; nothing to do.
    Exhausted,
}

/// Pagination position and fetch state for one feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    info: PageInfo,
    fetching: bool,
}

impl PageCursor {
    /// Cursor positioned at a freshly loaded page (normally page 1).
    #[must_use]
    pub fn at(info: PageInfo) -> Self {
        Self { info, fetching: false }
    }

    /// Deepest page loaded so far.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.info.page
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.info.total_pages
    }

    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.info.total_count
    }

    /// True while a page fetch is in flight.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    /// True when older pages remain on the server.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.info.page < self.info.total_pages
    }

    /// Try to start fetching the next page. Transitions to `Fetching` only
    /// when a fetch is actually warranted.
    pub fn begin_fetch(&mut self) -> FetchStart {
        if self.fetching {
            return FetchStart::AlreadyFetching;
        }
        if !self.has_more() {
            return FetchStart::Exhausted;
        }
        self.fetching = true;
        FetchStart::Begin { page: self.info.page + 1 }
    }

    /// Record a successful page fetch and return to `Idle`.
    pub fn complete(&mut self, info: PageInfo) {
        self.info = info;
        self.fetching = false;
    }

    /// Record a failed page fetch: back to `Idle`, position unchanged.
    pub fn fail(&mut self) {
        self.fetching = false;
    }

    /// Absorb refreshed totals without moving the position. Used by poll
    /// refreshes, which report page-1 bookkeeping while the user may have
    /// paged deeper.
    pub fn sync_totals(&mut self, info: PageInfo) {
        self.info.total_pages = info.total_pages;
        self.info.total_count = info.total_count;
    }

    /// Bump the known total after a confirmed send.
    pub fn record_created(&mut self) {
        self.info.total_count += 1;
    }
}

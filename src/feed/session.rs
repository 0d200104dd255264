//! Feed session — the single constrained mutation API over store + cursor.
//!
//! DESIGN
//! ======
//! Every asynchronous operation is split into `begin_*` (issue a request
//! token, set a loading flag) and `apply_*` (reconcile the response). Tokens
//! carry the workspace id and a generation counter; the generation bumps on
//! every wholesale replace (workspace switch, full reload), so a response
//! that arrives late for a stale workspace is discarded silently instead of
//! corrupting the new feed. All methods are synchronous; the async driver
//! owns the awaits in between.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use time::OffsetDateTime;

use crate::feed::FeedError;
use crate::feed::cursor::FetchStart;
use crate::feed::store::Feed;
use crate::net::api::ApiError;
use crate::net::types::MessagePage;

/// Which fetches are currently in flight. The poll gate and the UI both
/// read these.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadingFlags {
    pub initial: bool,
    pub page: bool,
    pub refresh: bool,
}

impl LoadingFlags {
    /// True when any fetch is in flight.
    #[must_use]
    pub fn any(&self) -> bool {
        self.initial || self.page || self.refresh
    }
}

/// Proof that a request was started against a particular feed incarnation.
#[derive(Debug, Clone)]
pub struct RequestToken {
    workspace_id: String,
    generation: u64,
}

impl RequestToken {
    /// Workspace the request targets; the driver uses this for the URL.
    #[must_use]
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }
}

/// Outcome of asking for the next older page.
#[derive(Debug, Clone)]
pub enum PageFetch {
    Begin { token: RequestToken, page: u32 },
    AlreadyFetching,
    Exhausted,
    NotLoaded,
}

/// Whether a response was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

/// Per-view feed lifecycle: created on first load, replaced wholesale on
/// workspace switch, discarded on teardown.
#[derive(Debug, Default)]
pub struct FeedSession {
    active_workspace: Option<String>,
    generation: u64,
    feed: Option<Feed>,
    loading: LoadingFlags,
}

impl FeedSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `workspace_id` the active workspace. Switching discards the
    /// current feed and invalidates every in-flight request token.
    ///
    /// # Errors
    ///
    /// `FeedError::Load` when the id is empty.
    pub fn select_workspace(&mut self, workspace_id: &str) -> Result<(), FeedError> {
        if workspace_id.trim().is_empty() {
            return Err(FeedError::load("workspace id must not be empty"));
        }
        if self.active_workspace.as_deref() == Some(workspace_id) {
            return Ok(());
        }
        self.active_workspace = Some(workspace_id.to_owned());
        self.generation += 1;
        self.feed = None;
        self.loading = LoadingFlags::default();
        Ok(())
    }

    /// Start an initial (or full re-) load of the active workspace.
    ///
    /// # Errors
    ///
    /// `FeedError::Load` when no workspace is selected.
    pub fn begin_initial_load(&mut self) -> Result<RequestToken, FeedError> {
        let Some(workspace_id) = self.active_workspace.clone() else {
            return Err(FeedError::load("no workspace selected"));
        };
        self.loading.initial = true;
        Ok(RequestToken { workspace_id, generation: self.generation })
    }

    /// Apply an initial-load response. A stale token (workspace switched or
    /// feed replaced since issue) is discarded without touching state.
    ///
    /// # Errors
    ///
    /// `FeedError::Load` when the fetch failed; the view has nothing to show.
    pub fn apply_initial_load(
        &mut self,
        token: &RequestToken,
        result: Result<MessagePage, ApiError>,
        now: OffsetDateTime,
    ) -> Result<Applied, FeedError> {
        if self.is_stale(token) {
            return Ok(Applied::Stale);
        }
        match result {
            Ok(page) => {
                self.loading = LoadingFlags::default();
                self.feed = Some(Feed::from_page(&token.workspace_id, page, now)?);
                // A wholesale replace: older tokens must not land on it.
                self.generation += 1;
                Ok(Applied::Applied)
            }
            Err(err) => {
                self.loading.initial = false;
                Err(FeedError::load(err))
            }
        }
    }

    /// Ask for the next older page. Typed no-ops guard against duplicate
    /// concurrent fetches and paging before the first load.
    pub fn begin_page_fetch(&mut self) -> PageFetch {
        let Some(feed) = self.feed.as_mut() else {
            return PageFetch::NotLoaded;
        };
        match feed.cursor.begin_fetch() {
            FetchStart::Begin { page } => {
                self.loading.page = true;
                PageFetch::Begin {
                    token: RequestToken {
                        workspace_id: feed.workspace_id().to_owned(),
                        generation: self.generation,
                    },
                    page,
                }
            }
            FetchStart::AlreadyFetching => PageFetch::AlreadyFetching,
            FetchStart::Exhausted => PageFetch::Exhausted,
        }
    }

    /// Apply a page-fetch response. Failures leave the existing feed intact
    /// and re-enable the load-more control.
    ///
    /// # Errors
    ///
    /// `FeedError::Pagination` when the fetch failed.
    pub fn apply_page_fetch(
        &mut self,
        token: &RequestToken,
        result: Result<MessagePage, ApiError>,
        now: OffsetDateTime,
    ) -> Result<Applied, FeedError> {
        if self.is_stale(token) {
            return Ok(Applied::Stale);
        }
        let Some(feed) = self.feed.as_mut() else {
            return Ok(Applied::Stale);
        };
        self.loading.page = false;
        match result {
            Ok(page) => {
                feed.append_older(page.messages, page.info, now);
                Ok(Applied::Applied)
            }
            Err(err) => {
                feed.cursor.fail();
                Err(FeedError::pagination(err))
            }
        }
    }

    /// Start a refresh, unless any fetch is already in flight (the tick is
    /// dropped, never queued) or nothing is loaded yet.
    pub fn begin_refresh(&mut self) -> Option<RequestToken> {
        if self.loading.any() {
            return None;
        }
        let feed = self.feed.as_ref()?;
        self.loading.refresh = true;
        Some(RequestToken {
            workspace_id: feed.workspace_id().to_owned(),
            generation: self.generation,
        })
    }

    /// Apply a refresh response. Failures leave the feed unchanged; the
    /// caller logs and moves on.
    ///
    /// # Errors
    ///
    /// `FeedError::Refresh` when the fetch failed.
    pub fn apply_refresh(
        &mut self,
        token: &RequestToken,
        result: Result<MessagePage, ApiError>,
        now: OffsetDateTime,
    ) -> Result<Applied, FeedError> {
        if self.is_stale(token) {
            return Ok(Applied::Stale);
        }
        let Some(feed) = self.feed.as_mut() else {
            return Ok(Applied::Stale);
        };
        self.loading.refresh = false;
        match result {
            Ok(page) => {
                feed.merge_latest(page.messages, page.info, now);
                Ok(Applied::Applied)
            }
            Err(err) => Err(FeedError::refresh(err)),
        }
    }

    fn is_stale(&self, token: &RequestToken) -> bool {
        token.generation != self.generation
            || self.active_workspace.as_deref() != Some(token.workspace_id.as_str())
    }

    #[must_use]
    pub fn workspace_id(&self) -> Option<&str> {
        self.active_workspace.as_deref()
    }

    #[must_use]
    pub fn feed(&self) -> Option<&Feed> {
        self.feed.as_ref()
    }

    #[must_use]
    pub fn feed_mut(&mut self) -> Option<&mut Feed> {
        self.feed.as_mut()
    }

    #[must_use]
    pub fn loading(&self) -> LoadingFlags {
        self.loading
    }
}

//! Feed client — binds the HTTP API to the session, send coordinator, and
//! query state.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures are classified here by the operation that was in
//! flight: initial loads are fatal to the view, pagination failures leave
//! the feed intact, refresh failures are logged and swallowed, send
//! failures roll back the optimistic entry and raise a notice.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::borrow::Cow;
use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::feed::FeedError;
use crate::feed::QueryState;
use crate::feed::send::SendCoordinator;
use crate::feed::session::{Applied, FeedSession, PageFetch};
use crate::net::api::WorkspaceApi;
use crate::net::types::Message;

/// One user-visible feed view and everything that mutates it.
pub struct FeedClient {
    api: Arc<dyn WorkspaceApi + Send + Sync>,
    pub session: FeedSession,
    pub sender: SendCoordinator,
    pub query: QueryState,
}

impl FeedClient {
    #[must_use]
    pub fn new(api: Arc<dyn WorkspaceApi + Send + Sync>) -> Self {
        Self {
            api,
            session: FeedSession::new(),
            sender: SendCoordinator::new(),
            query: QueryState::default(),
        }
    }

    /// Select a workspace and load its first page.
    ///
    /// # Errors
    ///
    /// `FeedError::Load` when the listing fails; the view has nothing to
    /// show and offers a retry.
    pub async fn open(&mut self, workspace_id: &str) -> Result<(), FeedError> {
        self.session.select_workspace(workspace_id)?;
        let token = self.session.begin_initial_load()?;
        let result = self.api.list_messages(token.workspace_id(), 1).await;
        self.session
            .apply_initial_load(&token, result, OffsetDateTime::now_utc())?;
        Ok(())
    }

    /// Fetch the next older page. Returns false when there was nothing to do
    /// (no more pages, fetch already in flight, or nothing loaded).
    ///
    /// # Errors
    ///
    /// `FeedError::Pagination` when the fetch fails; the feed keeps its
    /// current contents and the control re-enables.
    pub async fn load_older(&mut self) -> Result<bool, FeedError> {
        let (token, page) = match self.session.begin_page_fetch() {
            PageFetch::Begin { token, page } => (token, page),
            PageFetch::AlreadyFetching | PageFetch::Exhausted | PageFetch::NotLoaded => return Ok(false),
        };
        let result = self.api.list_messages(token.workspace_id(), page).await;
        self.session
            .apply_page_fetch(&token, result, OffsetDateTime::now_utc())?;
        Ok(true)
    }

    /// Refresh the newest window. Returns false when the round was skipped
    /// (busy or not loaded) or failed; refresh failures are logged and never
    /// disturb the displayed feed.
    pub async fn refresh(&mut self) -> bool {
        let Some(token) = self.session.begin_refresh() else {
            debug!("refresh skipped: fetch in flight or nothing loaded");
            return false;
        };
        let result = self.api.list_messages(token.workspace_id(), 1).await;
        match self
            .session
            .apply_refresh(&token, result, OffsetDateTime::now_utc())
        {
            Ok(applied) => applied == Applied::Applied,
            Err(err) => {
                warn!(error = %err, "background refresh failed");
                false
            }
        }
    }

    /// Send a message optimistically. Returns false when the call was
    /// ignored (a send is already in flight).
    ///
    /// # Errors
    ///
    /// `FeedError::Validation` for empty content (no network call);
    /// `FeedError::Send` when the server rejects the create, after rolling
    /// back the placeholder and restoring the draft.
    pub async fn send(&mut self, content: &str, author: &str) -> Result<bool, FeedError> {
        let now = OffsetDateTime::now_utc();
        let (workspace_id, pending) = {
            let Some(feed) = self.session.feed_mut() else {
                return Err(FeedError::send("no workspace loaded"));
            };
            let workspace_id = feed.workspace_id().to_owned();
            match self.sender.begin(feed, content, author, now)? {
                Some(pending) => (workspace_id, pending),
                None => return Ok(false),
            }
        };

        let result = self.api.create_message(&workspace_id, &pending.draft).await;
        let now = OffsetDateTime::now_utc();
        let Some(feed) = self.session.feed_mut() else {
            // The view switched away mid-send; nothing left to reconcile.
            self.sender.cancel();
            return Ok(false);
        };
        match result {
            Ok(confirmed) => {
                self.sender.complete(feed, &pending, confirmed, now);
                Ok(true)
            }
            Err(err) => {
                self.sender.fail(feed, &pending, &err, now);
                Err(FeedError::send(err))
            }
        }
    }

    /// The displayed sequence: the feed filtered by the current search term.
    #[must_use]
    pub fn displayed(&self) -> Cow<'_, [Message]> {
        match self.session.feed() {
            Some(feed) => crate::feed::search::filter(feed.messages(), &self.query.search_term),
            None => Cow::Borrowed(&[]),
        }
    }
}

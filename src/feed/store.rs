//! Feed store — the ordered, deduplicated message collection for one
//! workspace.
//!
//! DESIGN
//! ======
//! Four update sources feed this store: initial load (`replace`), pagination
//! (`append_older`), poll refresh (`merge_latest`), and optimistic sends.
//! Server ordering is trusted and never re-sorted client-side; `id` is the
//! sole dedup key. Unconfirmed optimistic messages sit logically last and
//! survive refreshes until the server confirms or rejects them.
//!
//! Every mutation is synchronous and atomic: callers never observe a
//! partially applied update.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashSet;

use time::OffsetDateTime;

use crate::feed::FeedError;
use crate::feed::cursor::PageCursor;
use crate::net::types::{Message, MessagePage, PageInfo};

/// Per-workspace feed: messages in ascending `created_at` order, pagination
/// bookkeeping, and the last successful server contact.
#[derive(Debug, Clone)]
pub struct Feed {
    workspace_id: String,
    messages: Vec<Message>,
    /// Ids of optimistic messages awaiting server confirmation.
    pending: Vec<String>,
    pub cursor: PageCursor,
    last_refreshed_at: Option<OffsetDateTime>,
}

impl Feed {
    /// Build a feed from a freshly loaded first page.
    ///
    /// # Errors
    ///
    /// `FeedError::Load` when `workspace_id` is empty.
    pub fn from_page(workspace_id: &str, page: MessagePage, now: OffsetDateTime) -> Result<Self, FeedError> {
        if workspace_id.trim().is_empty() {
            return Err(FeedError::load("workspace id must not be empty"));
        }
        Ok(Self {
            workspace_id: workspace_id.to_owned(),
            messages: dedup_in_order(page.messages),
            pending: Vec::new(),
            cursor: PageCursor::at(page.info),
            last_refreshed_at: Some(now),
        })
    }

    /// Reset the feed entirely. Used on workspace switch or a full reload;
    /// drops unconfirmed optimistic messages along with everything else.
    ///
    /// # Errors
    ///
    /// `FeedError::Load` when `workspace_id` is empty.
    pub fn replace(&mut self, workspace_id: &str, page: MessagePage, now: OffsetDateTime) -> Result<(), FeedError> {
        *self = Self::from_page(workspace_id, page, now)?;
        Ok(())
    }

    /// Insert an older page before the current head. The caller supplies the
    /// page pre-ordered oldest-first; messages already present are silently
    /// dropped, making repeated delivery idempotent.
    pub fn append_older(&mut self, older: Vec<Message>, info: PageInfo, now: OffsetDateTime) {
        let known: HashSet<&str> = self.messages.iter().map(|m| m.id.as_str()).collect();
        let fresh = dedup_in_order(older.into_iter().filter(|m| !known.contains(m.id.as_str())).collect());

        let tail = std::mem::take(&mut self.messages);
        self.messages = fresh;
        self.messages.extend(tail);

        self.cursor.complete(info);
        self.last_refreshed_at = Some(now);
    }

    /// Apply a poll refresh: the server's current page-1 snapshot replaces
    /// the newest window of the feed. Messages older than the window survive
    /// as loaded; unconfirmed optimistic messages are re-appended after the
    /// merge unless the snapshot already contains their id.
    pub fn merge_latest(&mut self, fresh: Vec<Message>, info: PageInfo, now: OffsetDateTime) {
        let fresh = dedup_in_order(fresh);
        let fresh_ids: HashSet<String> = fresh.iter().map(|m| m.id.clone()).collect();
        let pending_ids: HashSet<&str> = self.pending.iter().map(String::as_str).collect();

        let window_start = fresh.first().map(|m| m.created_at);
        let current = std::mem::take(&mut self.messages);

        let mut merged: Vec<Message> = Vec::with_capacity(current.len().max(fresh.len()));
        let mut optimistic: Vec<Message> = Vec::new();
        for msg in current {
            if pending_ids.contains(msg.id.as_str()) {
                if !fresh_ids.contains(msg.id.as_str()) {
                    optimistic.push(msg);
                }
                continue;
            }
            // Keep only messages strictly older than the refreshed window;
            // anything inside the window is owned by the snapshot now.
            if let Some(start) = window_start {
                if msg.created_at < start && !fresh_ids.contains(msg.id.as_str()) {
                    merged.push(msg);
                }
            }
        }
        merged.extend(fresh);
        merged.extend(optimistic);

        self.messages = merged;
        self.pending.retain(|id| !fresh_ids.contains(id.as_str()));
        self.cursor.sync_totals(info);
        self.last_refreshed_at = Some(now);
    }

    /// Insert a provisional message at the logical end, ahead of server
    /// confirmation. Does not count as server contact.
    pub fn append_optimistic(&mut self, message: Message) {
        self.pending.push(message.id.clone());
        self.messages.push(message);
    }

    /// Replace the optimistic placeholder with the server-confirmed record,
    /// preserving its position. Returns false when the placeholder is gone
    /// (e.g. the feed was replaced while the send was in flight).
    pub fn confirm_optimistic(&mut self, temp_id: &str, confirmed: Message, now: OffsetDateTime) -> bool {
        let Some(pos) = self.messages.iter().position(|m| m.id == temp_id) else {
            return false;
        };
        let already_merged = self.messages.iter().any(|m| m.id == confirmed.id);
        if already_merged {
            // A refresh raced the confirmation and already delivered the
            // server record; drop the placeholder instead of duplicating.
            self.messages.remove(pos);
        } else {
            self.messages[pos] = confirmed;
        }
        self.pending.retain(|id| id != temp_id);
        self.last_refreshed_at = Some(now);
        true
    }

    /// Roll back a rejected send. Returns false when the placeholder is gone.
    pub fn remove_optimistic(&mut self, temp_id: &str) -> bool {
        let Some(pos) = self.messages.iter().position(|m| m.id == temp_id) else {
            return false;
        };
        self.messages.remove(pos);
        self.pending.retain(|id| id != temp_id);
        true
    }

    #[must_use]
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of optimistic messages still awaiting confirmation.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn last_refreshed_at(&self) -> Option<OffsetDateTime> {
        self.last_refreshed_at
    }
}

/// Drop same-id duplicates, keeping the first occurrence and the incoming
/// order otherwise.
fn dedup_in_order(messages: Vec<Message>) -> Vec<Message> {
    let mut seen: HashSet<String> = HashSet::with_capacity(messages.len());
    messages.into_iter().filter(|m| seen.insert(m.id.clone())).collect()
}

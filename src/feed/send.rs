//! Optimistic send coordinator.
//!
//! DESIGN
//! ======
//! A send appends a provisional message immediately, then reconciles with
//! the server's confirmed record. The displayed feed never shows a message
//! the server rejected: failures remove the placeholder and hand the typed
//! content back for the input box. One send in flight at a time; a second
//! `begin` while pending is a silent no-op so rapid double-submission cannot
//! duplicate a message.

#[cfg(test)]
#[path = "send_test.rs"]
mod send_test;

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::feed::FeedError;
use crate::feed::store::Feed;
use crate::net::types::{Author, AuthorDraft, Message, MessageDraft, MessageKind};

/// Author name used when the sender leaves the field blank.
pub const DEFAULT_AUTHOR: &str = "Anonymous User";

const SUCCESS_NOTICE_TTL: Duration = Duration::seconds(4);
const ERROR_NOTICE_TTL: Duration = Duration::seconds(8);

// =============================================================================
// NOTICES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient user-facing notice that auto-clears after a fixed delay
/// (errors linger longer than successes).
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    expires_at: OffsetDateTime,
}

impl Notice {
    fn raise(kind: NoticeKind, text: String, now: OffsetDateTime) -> Self {
        let ttl = match kind {
            NoticeKind::Success => SUCCESS_NOTICE_TTL,
            NoticeKind::Error => ERROR_NOTICE_TTL,
        };
        Self { kind, text, expires_at: now + ttl }
    }

    #[must_use]
    pub fn is_visible(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }
}

// =============================================================================
// COORDINATOR
// =============================================================================

/// A send accepted by [`SendCoordinator::begin`]: the placeholder's temp id,
/// the wire payload, and the typed content kept for draft restore.
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub temp_id: String,
    pub draft: MessageDraft,
    typed: String,
}

/// Issues create requests and reconciles the feed with the outcome.
#[derive(Debug, Default)]
pub struct SendCoordinator {
    sending: bool,
    temp_seq: u64,
    notice: Option<Notice>,
    restored_draft: Option<String>,
}

impl SendCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a send awaits its server response.
    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Validate and stage a send: append the provisional message and return
    /// the payload to put on the wire.
    ///
    /// Returns `Ok(None)` when a send is already in flight (the call is
    /// ignored, not an error).
    ///
    /// # Errors
    ///
    /// `FeedError::Validation` when the trimmed content is empty; nothing
    /// touches the network in that case.
    pub fn begin(
        &mut self,
        feed: &mut Feed,
        content: &str,
        author_name: &str,
        now: OffsetDateTime,
    ) -> Result<Option<PendingSend>, FeedError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(FeedError::validation("message content must not be empty"));
        }
        if self.sending {
            return Ok(None);
        }

        let author = match author_name.trim() {
            "" => DEFAULT_AUTHOR,
            name => name,
        };
        let temp_id = self.next_temp_id();

        feed.append_optimistic(Message {
            id: temp_id.clone(),
            workspace_id: feed.workspace_id().to_owned(),
            content: trimmed.to_owned(),
            author: Author { name: author.to_owned(), user_id: None, avatar: None },
            kind: MessageKind::Text,
            created_at: now,
            is_edited: false,
        });
        self.sending = true;

        Ok(Some(PendingSend {
            temp_id,
            draft: MessageDraft {
                content: trimmed.to_owned(),
                author: AuthorDraft { name: author.to_owned() },
                kind: MessageKind::Text,
            },
            typed: content.to_owned(),
        }))
    }

    /// Reconcile a confirmed send: swap the placeholder for the server
    /// record, bump the known total, raise a success notice.
    pub fn complete(&mut self, feed: &mut Feed, pending: &PendingSend, confirmed: Message, now: OffsetDateTime) {
        self.sending = false;
        if feed.confirm_optimistic(&pending.temp_id, confirmed, now) {
            feed.cursor.record_created();
        }
        self.notice = Some(Notice::raise(NoticeKind::Success, "Message sent".to_owned(), now));
    }

    /// Roll back a rejected send: remove the placeholder, keep the typed
    /// content for the input box, raise an error notice.
    pub fn fail(&mut self, feed: &mut Feed, pending: &PendingSend, reason: impl std::fmt::Display, now: OffsetDateTime) {
        self.sending = false;
        feed.remove_optimistic(&pending.temp_id);
        self.restored_draft = Some(pending.typed.clone());
        self.notice = Some(Notice::raise(
            NoticeKind::Error,
            format!("Failed to send message: {reason}"),
            now,
        ));
    }

    /// Abandon an in-flight send whose feed is gone (view switched away
    /// mid-request). Clears the guard so the next send is accepted.
    pub fn cancel(&mut self) {
        self.sending = false;
    }

    /// Current notice, if it has not auto-cleared yet.
    #[must_use]
    pub fn notice(&self, now: OffsetDateTime) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| n.is_visible(now))
    }

    /// Draft content restored by the last failed send, handed over once.
    pub fn take_restored_draft(&mut self) -> Option<String> {
        self.restored_draft.take()
    }

    fn next_temp_id(&mut self) -> String {
        self.temp_seq += 1;
        // Server ids are bare object ids; the prefix plus a random component
        // keeps temp ids out of their namespace.
        format!("pending-{}-{}", self.temp_seq, Uuid::new_v4())
    }
}

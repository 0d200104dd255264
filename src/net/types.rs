//! Wire types for the workspace chat API.
//!
//! Field names mirror the server's JSON exactly (`_id`, `workspaceId`,
//! `createdAt`, ...). Records are immutable once received: a `Message` is
//! never edited client-side, and `is_edited` is display-only metadata.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// =============================================================================
// MESSAGE
// =============================================================================

/// A single chat message as returned by the server.
///
/// `id` is globally unique and is the sole deduplication key. `created_at`
/// is server-assigned and defines the canonical ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    pub workspace_id: String,
    pub content: String,
    pub author: Author,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub is_edited: bool,
}

/// Message author. `user_id` is absent for anonymous senders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Message type tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    File,
    System,
}

// =============================================================================
// WORKSPACE
// =============================================================================

/// A workspace as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: WorkspaceKind,
}

/// Workspace visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceKind {
    #[default]
    Public,
    Private,
}

// =============================================================================
// CREATE PAYLOADS
// =============================================================================

/// Body for `POST /api/workspaces/:id/messages`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    pub content: String,
    pub author: AuthorDraft,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

/// Author portion of a message draft.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDraft {
    pub name: String,
}

/// Body for `POST /api/workspaces`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: WorkspaceKind,
}

// =============================================================================
// LIST ENVELOPE
// =============================================================================

/// Generic response envelope: `{ success, data, page?, pages?, total? }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Pagination bookkeeping for one feed: current page, total pages, and the
/// server's total message count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

impl PageInfo {
    /// Bookkeeping for a feed that has never been loaded.
    #[must_use]
    pub fn empty() -> Self {
        Self { page: 0, total_pages: 0, total_count: 0 }
    }
}

/// One page of messages with its bookkeeping, as decoded from the envelope.
#[derive(Debug, Clone)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub info: PageInfo,
}

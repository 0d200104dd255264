//! Workspace selection and creation rules.
//!
//! Selection precedence when opening the app: an explicitly requested id,
//! then the persisted last selection, then the first workspace the server
//! returns. Creation is a plain create-then-display flow; only the name
//! rules live here.

#[cfg(test)]
#[path = "workspaces_test.rs"]
mod workspaces_test;

use crate::feed::FeedError;
use crate::net::types::{Workspace, WorkspaceDraft, WorkspaceKind};

/// Minimum workspace name length, matching the server's validation.
const MIN_NAME_LEN: usize = 3;

/// Pick the active workspace from the listed ones.
///
/// `explicit` (CLI flag / env) wins, then `stored` (persisted last
/// selection), then the first listed workspace. A candidate id that the
/// server no longer lists falls through to the next source.
#[must_use]
pub fn choose<'a>(
    listed: &'a [Workspace],
    explicit: Option<&str>,
    stored: Option<&str>,
) -> Option<&'a Workspace> {
    let by_id = |id: &str| listed.iter().find(|w| w.id == id);
    explicit
        .and_then(by_id)
        .or_else(|| stored.and_then(by_id))
        .or_else(|| listed.first())
}

/// Build a validated create-workspace payload.
///
/// # Errors
///
/// `FeedError::Validation` when the trimmed name is empty or shorter than
/// three characters.
pub fn draft(name: &str, description: Option<&str>, kind: WorkspaceKind) -> Result<WorkspaceDraft, FeedError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FeedError::validation("workspace name is required"));
    }
    if name.chars().count() < MIN_NAME_LEN {
        return Err(FeedError::validation(format!(
            "workspace name must be at least {MIN_NAME_LEN} characters"
        )));
    }
    let description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(ToOwned::to_owned);
    Ok(WorkspaceDraft { name: name.to_owned(), description, kind })
}

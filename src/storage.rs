//! Client-local persisted state: the last selected workspace.
//!
//! One JSON file, one key. Reads are tolerant: a missing or corrupt file is
//! treated as "nothing stored" so a damaged state file can never block
//! startup.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_workspace_id: Option<String>,
}

/// Handle to the state file.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Last selected workspace id, if one was stored and the file is intact.
    #[must_use]
    pub fn last_workspace(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let state: PersistedState = serde_json::from_str(&raw).ok()?;
        state.last_workspace_id
    }

    /// Persist the selected workspace id, creating parent directories as
    /// needed.
    ///
    /// # Errors
    ///
    /// Propagates filesystem errors; callers treat persistence as best
    /// effort.
    pub fn store_last_workspace(&self, workspace_id: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let state = PersistedState { last_workspace_id: Some(workspace_id.to_owned()) };
        let json = serde_json::to_string_pretty(&state).map_err(io::Error::other)?;
        fs::write(&self.path, json)
    }
}

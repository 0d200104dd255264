//! REST client for the workspace chat server.
//!
//! ERROR HANDLING
//! ==============
//! Transport and protocol failures surface as `ApiError`; callers classify
//! them into the feed error taxonomy (load vs pagination vs refresh vs send)
//! at the point where they know which operation was in flight.

use async_trait::async_trait;

use super::types::{Envelope, Message, MessageDraft, MessagePage, PageInfo, Workspace, WorkspaceDraft};

/// Errors from the HTTP transport or the server's response envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned status {status} for {path}")]
    Status { status: u16, path: String },
    #[error("server rejected request: {message}")]
    Rejected { message: String },
    #[error("response envelope missing data payload")]
    MissingData,
}

/// The chat server's API surface as consumed by the feed engine.
///
/// Production uses [`HttpApi`]; tests substitute in-memory fakes.
#[async_trait]
pub trait WorkspaceApi {
    async fn list_workspaces(&self) -> Result<Vec<Workspace>, ApiError>;
    async fn list_messages(&self, workspace_id: &str, page: u32) -> Result<MessagePage, ApiError>;
    async fn create_message(&self, workspace_id: &str, draft: &MessageDraft) -> Result<Message, ApiError>;
    async fn create_workspace(&self, draft: &WorkspaceDraft) -> Result<Workspace, ApiError>;
}

/// `WorkspaceApi` over HTTP via reqwest.
pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpApi {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Unwrap the server envelope, translating `success: false` and missing
/// payloads into errors.
fn unwrap_data<T>(env: Envelope<T>) -> Result<(T, Option<PageInfo>), ApiError> {
    if !env.success {
        return Err(ApiError::Rejected {
            message: env.message.unwrap_or_else(|| "unknown server error".to_owned()),
        });
    }
    let info = match (env.page, env.pages) {
        (Some(page), Some(pages)) => Some(PageInfo {
            page,
            total_pages: pages,
            total_count: env.total.unwrap_or_default(),
        }),
        _ => None,
    };
    let data = env.data.ok_or(ApiError::MissingData)?;
    Ok((data, info))
}

#[async_trait]
impl WorkspaceApi for HttpApi {
    async fn list_workspaces(&self) -> Result<Vec<Workspace>, ApiError> {
        let path = "/api/workspaces";
        let resp = self.client.get(self.url(path)).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status { status: resp.status().as_u16(), path: path.to_owned() });
        }
        let env: Envelope<Vec<Workspace>> = resp.json().await?;
        let (data, _) = unwrap_data(env)?;
        Ok(data)
    }

    async fn list_messages(&self, workspace_id: &str, page: u32) -> Result<MessagePage, ApiError> {
        let path = format!("/api/workspaces/{workspace_id}/messages");
        let resp = self
            .client
            .get(self.url(&path))
            .query(&[("page", page)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status { status: resp.status().as_u16(), path });
        }
        let env: Envelope<Vec<Message>> = resp.json().await?;
        let (messages, info) = unwrap_data(env)?;
        // A list endpoint that omits page bookkeeping is a single-page feed.
        let info = info.unwrap_or(PageInfo {
            page: 1,
            total_pages: 1,
            total_count: messages.len() as u64,
        });
        Ok(MessagePage { messages, info })
    }

    async fn create_message(&self, workspace_id: &str, draft: &MessageDraft) -> Result<Message, ApiError> {
        let path = format!("/api/workspaces/{workspace_id}/messages");
        let resp = self.client.post(self.url(&path)).json(draft).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status { status: resp.status().as_u16(), path });
        }
        let env: Envelope<Message> = resp.json().await?;
        let (message, _) = unwrap_data(env)?;
        Ok(message)
    }

    async fn create_workspace(&self, draft: &WorkspaceDraft) -> Result<Workspace, ApiError> {
        let path = "/api/workspaces";
        let resp = self.client.post(self.url(path)).json(draft).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status { status: resp.status().as_u16(), path: path.to_owned() });
        }
        let env: Envelope<Workspace> = resp.json().await?;
        let (workspace, _) = unwrap_data(env)?;
        Ok(workspace)
    }
}

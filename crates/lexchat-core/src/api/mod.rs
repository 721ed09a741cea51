//! HTTP client for the chat backend.
//!
//! Only the `chat/` routes are consumed. Authentication is a plain bearer
//! token; obtaining it is someone else's job.

mod types;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

pub use types::{
    ChatStats, CreateSessionRequest, ListQuery, QuickQueryResponse, SendMessageResponse,
    SessionDetail, SessionList,
};
use types::{ErrorBody, SendMessageRequest, StatsResponse};

use crate::config::Config;
use crate::model::{MAX_MESSAGE_CHARS, Message, SessionId, SessionSummary};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid backend URL '{0}'")]
    InvalidUrl(String),
    #[error("backend request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("backend returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },
    #[error("failed to decode backend response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("{0}")]
    Invalid(String),
}

impl BackendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Checks message content against the backend's limits.
pub fn validate_content(content: &str) -> BackendResult<()> {
    if content.trim().is_empty() {
        return Err(BackendError::Invalid("message is empty".to_string()));
    }
    let len = content.chars().count();
    if len > MAX_MESSAGE_CHARS {
        return Err(BackendError::Invalid(format!(
            "message is {len} characters; the limit is {MAX_MESSAGE_CHARS}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: &str, token: Option<String>) -> BackendResult<Self> {
        Self::with_http(base_url, token, reqwest::Client::new())
    }

    pub fn from_config(config: &Config) -> BackendResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(BackendError::Transport)?;
        Self::with_http(
            &config.base_url,
            config.effective_api_token().map(str::to_string),
            http,
        )
    }

    fn with_http(base_url: &str, token: Option<String>, http: reqwest::Client) -> BackendResult<Self> {
        // Url::join drops the last segment unless the base ends with '/'.
        let normalized = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base_url =
            Url::parse(&normalized).map_err(|_| BackendError::InvalidUrl(base_url.to_string()))?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list_sessions(&self, query: &ListQuery) -> BackendResult<Vec<SessionSummary>> {
        let mut url = self.url("chat/sessions")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("page_size", &query.page_size.to_string());
            if let Some(kind) = query.session_type {
                pairs.append_pair("session_type", kind.as_str());
            }
        }
        let list: SessionList = self.send(self.request(Method::GET, url)).await?;
        Ok(list.sessions)
    }

    pub async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> BackendResult<SessionSummary> {
        let url = self.url("chat/sessions")?;
        self.send_json(Method::POST, url, request).await
    }

    pub async fn get_session(&self, id: &SessionId) -> BackendResult<SessionDetail> {
        let url = self.session_url(id, None)?;
        self.send(self.request(Method::GET, url)).await
    }

    /// Posts one user message; only the assistant reply comes back.
    pub async fn send_message(&self, id: &SessionId, content: &str) -> BackendResult<Message> {
        validate_content(content)?;
        let url = self.session_url(id, Some("messages"))?;
        let response: SendMessageResponse = self
            .send_json(Method::POST, url, &SendMessageRequest { content })
            .await?;
        Ok(response.into_reply())
    }

    pub async fn rename_session(&self, id: &SessionId, title: &str) -> BackendResult<SessionSummary> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BackendError::Invalid("title is empty".to_string()));
        }
        let mut url = self.session_url(id, None)?;
        url.query_pairs_mut().append_pair("title", title);
        self.send(self.request(Method::PUT, url)).await
    }

    pub async fn delete_session(&self, id: &SessionId) -> BackendResult<()> {
        let url = self.session_url(id, None)?;
        let _: serde_json::Value = self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    /// One-off question without a session.
    pub async fn quick_query(&self, query: &str) -> BackendResult<QuickQueryResponse> {
        let query = query.trim();
        if query.chars().count() < 3 {
            return Err(BackendError::Invalid(
                "query must be at least 3 characters".to_string(),
            ));
        }
        let mut url = self.url("chat/query")?;
        url.query_pairs_mut().append_pair("query", query);
        self.send(self.request(Method::POST, url)).await
    }

    pub async fn stats(&self) -> BackendResult<ChatStats> {
        let url = self.url("chat/stats")?;
        let response: StatsResponse = self.send(self.request(Method::GET, url)).await?;
        Ok(response.stats)
    }

    fn url(&self, path: &str) -> BackendResult<Url> {
        self.base_url
            .join(path)
            .map_err(|_| BackendError::InvalidUrl(format!("{}{path}", self.base_url)))
    }

    fn session_url(&self, id: &SessionId, tail: Option<&str>) -> BackendResult<Url> {
        let mut url = self.url("chat/sessions/")?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| BackendError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push(id.as_str());
            if let Some(tail) = tail {
                segments.push(tail);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> BackendResult<T> {
        self.send(self.request(method, url).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> BackendResult<T> {
        let response = request.send().await.map_err(BackendError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.message())
                .unwrap_or_else(|_| {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        status
                            .canonical_reason()
                            .unwrap_or("request failed")
                            .to_string()
                    } else {
                        trimmed.to_string()
                    }
                });
            return Err(BackendError::Status { status, detail });
        }
        response.json().await.map_err(BackendError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_keeps_version_prefix() {
        let client = BackendClient::new("http://localhost:8000/api/v1", None).unwrap();
        let url = client.url("chat/sessions").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/chat/sessions");
    }

    #[test]
    fn test_session_url_escapes_id() {
        let client = BackendClient::new("http://localhost:8000/api/v1/", None).unwrap();
        let url = client
            .session_url(&SessionId::new("a b/c"), Some("messages"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/chat/sessions/a%20b%2Fc/messages"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            BackendClient::new("not a url", None),
            Err(BackendError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validate_content_limits() {
        assert!(validate_content("   ").is_err());
        assert!(validate_content("What is a contract?").is_ok());
        assert!(validate_content(&"x".repeat(MAX_MESSAGE_CHARS)).is_ok());
        assert!(validate_content(&"x".repeat(MAX_MESSAGE_CHARS + 1)).is_err());
    }
}

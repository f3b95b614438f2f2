//! HTTP client for the chat API

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;
use crate::types::{
    ChatReply, ChatRequest, Credentials, ErrorBody, RenameRequest, Session, SessionDetail,
};
use crate::Result;

/// Client for the chat server.
///
/// Cloning is cheap and clones share one cookie jar, so a login performed
/// through any clone authenticates all of them.
#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Self::with_client(base_url, http)
    }

    /// `http` must keep a cookie store for authentication to persist
    /// between calls.
    fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn signup(&self, username: &str, password: &str) -> Result<()> {
        self.authenticate("signup", username, password).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.authenticate("login", username, password).await
    }

    /// Callers clear their local state whatever this returns.
    pub async fn logout(&self) -> Result<()> {
        let url = self.endpoint(&["logout"])?;
        let response = self.send(self.http.post(url)).await?;
        ensure_success(response, "Logout failed").await?;
        Ok(())
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        let url = self.endpoint(&["sessions"])?;
        let response = self.send(self.http.get(url)).await?;
        let response = ensure_success(response, "Failed to load sessions").await?;
        decode(response).await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<SessionDetail> {
        let url = self.endpoint(&["sessions", session_id])?;
        let response = self.send(self.http.get(url)).await?;
        let response = ensure_success(response, "Failed to load session").await?;
        decode(response).await
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint(&["sessions", session_id])?;
        let response = self.send(self.http.delete(url)).await?;
        ensure_success(response, "Delete failed").await?;
        Ok(())
    }

    pub async fn rename_session(&self, session_id: &str, title: &str) -> Result<()> {
        let url = self.endpoint(&["sessions", session_id, "rename"])?;
        let request = self.http.post(url).json(&RenameRequest { title });
        let response = self.send(request).await?;
        ensure_success(response, "Rename failed").await?;
        Ok(())
    }

    /// Send a chat message. Without a session id the server allocates a new
    /// session and returns its id in the reply.
    pub async fn send_chat(&self, message: &str, session_id: Option<&str>) -> Result<ChatReply> {
        let url = self.endpoint(&["chat"])?;
        let request = self.http.post(url).json(&ChatRequest {
            message,
            session_id,
        });
        let response = self.send(request).await?;
        let response = ensure_success(response, "Chat error").await?;
        decode(response).await
    }

    async fn authenticate(&self, path: &str, username: &str, password: &str) -> Result<()> {
        let url = self.endpoint(&[path])?;
        let request = self.http.post(url).json(&Credentials { username, password });
        let response = self.send(request).await?;

        // A 401 here means rejected credentials, which the caller shows as-is.
        if !response.status().is_success() {
            return Err(failure_from(response, "Auth failed").await);
        }

        tracing::info!(username = %username, endpoint = %path, "Authenticated");
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request failed to complete");
            ApiError::from(e)
        })?;

        tracing::debug!(
            url = %response.url(),
            status = response.status().as_u16(),
            "API response"
        );

        Ok(response)
    }
}

async fn ensure_success(response: Response, fallback: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::AuthRequired);
    }
    Err(failure_from(response, fallback).await)
}

async fn failure_from(response: Response, fallback: &str) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty());

    match message {
        Some(message) => ApiError::RequestFailed { status, message },
        None => ApiError::RequestFailedGeneric {
            status,
            message: fallback.to_string(),
        },
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

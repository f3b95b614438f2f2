//! Chatdesk API Client
//!
//! Thin wrapper over the chat server's HTTP API:
//! - Credentials ride on the cookie jar, never on explicit tokens
//! - Every call is a single request/response, no retries
//! - A 401 is reported as `ApiError::AuthRequired`, never as a generic failure
//! - Server `{"error": ...}` bodies are surfaced verbatim

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{ChatReply, Message, Role, Session, SessionDetail};

pub type Result<T> = std::result::Result<T, ApiError>;

//! API error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not authenticated")]
    AuthRequired,

    /// Non-2xx response carrying a server error message
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// Non-2xx response without a usable message; `message` is the fallback text
    #[error("{message}")]
    RequestFailedGeneric { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    pub fn is_auth_required(&self) -> bool {
        matches!(self, ApiError::AuthRequired)
    }

    /// HTTP status of a failed response, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthRequired => Some(401),
            ApiError::RequestFailed { status, .. }
            | ApiError::RequestFailedGeneric { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] chatdesk_api::ApiError),

    #[error(transparent)]
    Session(#[from] chatdesk_session::SessionError),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// The server rejected our credentials or we never had any
    pub fn is_auth_required(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_auth_required(),
            CoreError::Session(e) => e.is_auth_required(),
            CoreError::NotAuthenticated => true,
            CoreError::Config(_) => false,
        }
    }
}

impl From<chatdesk_auth::AuthError> for CoreError {
    fn from(err: chatdesk_auth::AuthError) -> Self {
        match err {
            chatdesk_auth::AuthError::NotAuthenticated => CoreError::NotAuthenticated,
        }
    }
}

//! Session error types

use chatdesk_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("A message is already being sent")]
    SendInFlight,

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Session title cannot be empty")]
    EmptyTitle,
}

impl SessionError {
    pub fn is_auth_required(&self) -> bool {
        matches!(self, SessionError::Api(e) if e.is_auth_required())
    }
}

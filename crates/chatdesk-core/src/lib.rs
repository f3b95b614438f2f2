//! Chatdesk Core
//!
//! Central coordination layer for the chat client.
//! The core owns all state; presentation only sends intents and renders
//! snapshots.

mod client;
mod config;
mod error;
mod intent;

pub use client::Client;
pub use config::Config;
pub use error::CoreError;
pub use intent::{Credentials, Intent, Outcome};

// Re-export core components
pub use chatdesk_api::{ApiClient, ApiError, ChatReply, Message, Role, Session, SessionDetail};
pub use chatdesk_auth::{AuthError, AuthEvent, AuthGate, AuthState};
pub use chatdesk_session::{ClientState, Reconcile, SessionError, SessionStore};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

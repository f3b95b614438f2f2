//! Chatdesk Session Store
//!
//! Mirrors the server's chat sessions for one client:
//! - The session list is replaced wholesale on every refresh
//! - Exactly one session's messages are loaded at a time
//! - At most one chat send is in flight
//! - Responses that lost a race to a newer request are discarded
//! - Any 401 closes the auth gate and leaves state stale, not cleared

mod error;
mod state;
mod store;

pub use error::SessionError;
pub use state::ClientState;
pub use store::{Reconcile, SessionStore};

pub type Result<T> = std::result::Result<T, SessionError>;

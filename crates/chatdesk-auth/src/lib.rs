//! Chatdesk Auth Gate
//!
//! Two-state machine deciding whether session operations may run:
//! - Unauthenticated until login, signup or a successful startup probe
//! - Back to Unauthenticated on any 401 or on logout
//! - No terminal state; the cycle repeats across login/logout

mod error;
mod gate;
mod state;

pub use error::AuthError;
pub use gate::AuthGate;
pub use state::{AuthEvent, AuthState};

pub type Result<T> = std::result::Result<T, AuthError>;

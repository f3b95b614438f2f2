//! Shared auth gate

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::AuthError;
use crate::state::{AuthEvent, AuthState};
use crate::Result;

/// Single owner of the `authenticated` flag.
///
/// Clones share the same state, so the session store can revoke access on a
/// 401 while the coordinator checks it before every gated call.
#[derive(Debug, Default)]
pub struct AuthGate {
    state: Arc<RwLock<AuthState>>,
}

impl AuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AuthState {
        *self.state.read()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Apply an event and return the resulting state
    pub fn record(&self, event: AuthEvent) -> AuthState {
        let (from, to) = {
            let mut state = self.state.write();
            let from = *state;
            *state = from.apply(event);
            (from, *state)
        };

        if from != to {
            tracing::info!(from = %from, to = %to, cause = %event, "Auth state changed");
        } else {
            tracing::debug!(state = %to, cause = %event, "Auth event without state change");
        }

        to
    }

    pub fn require_authenticated(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated)
        }
    }
}

impl Clone for AuthGate {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_gate() {
        let gate = AuthGate::new();
        assert_eq!(gate.state(), AuthState::Unauthenticated);
        assert_eq!(
            gate.require_authenticated(),
            Err(AuthError::NotAuthenticated)
        );

        assert_eq!(
            gate.record(AuthEvent::LoginSucceeded),
            AuthState::Authenticated
        );
        assert!(gate.is_authenticated());
        assert!(gate.require_authenticated().is_ok());

        gate.record(AuthEvent::LoggedOut);
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn test_clones_share_state() {
        let gate = AuthGate::new();
        let store_handle = gate.clone();

        gate.record(AuthEvent::ProbeSucceeded);
        assert!(store_handle.is_authenticated());

        store_handle.record(AuthEvent::Unauthorized);
        assert!(!gate.is_authenticated());
    }
}

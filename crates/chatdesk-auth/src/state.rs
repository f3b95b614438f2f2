//! Auth State Machine
//!
//! ```text
//! Unauthenticated
//!   ↓ login / signup / probe succeeded
//! Authenticated
//!   ↓ 401 from any call / failed probe / logout
//! Unauthenticated
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthState {
    /// No server session known; session data must not be shown as current
    #[default]
    Unauthenticated,
    /// Server accepted our cookie
    Authenticated,
}

/// What caused a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEvent {
    LoginSucceeded,
    SignupSucceeded,
    /// The startup session-list probe went through
    ProbeSucceeded,
    /// Any API call answered 401
    Unauthorized,
    /// The startup probe failed for a reason other than 401
    ProbeFailed,
    /// Explicit logout, whatever the server said
    LoggedOut,
}

impl AuthState {
    /// State reached from `self` on `event`
    pub fn apply(self, event: AuthEvent) -> AuthState {
        match event {
            AuthEvent::LoginSucceeded | AuthEvent::SignupSucceeded | AuthEvent::ProbeSucceeded => {
                AuthState::Authenticated
            }
            AuthEvent::Unauthorized | AuthEvent::ProbeFailed | AuthEvent::LoggedOut => {
                AuthState::Unauthenticated
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthState::Unauthenticated => "unauthenticated",
            AuthState::Authenticated => "authenticated",
        }
    }
}

impl AuthEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEvent::LoginSucceeded => "login_succeeded",
            AuthEvent::SignupSucceeded => "signup_succeeded",
            AuthEvent::ProbeSucceeded => "probe_succeeded",
            AuthEvent::Unauthorized => "unauthorized",
            AuthEvent::ProbeFailed => "probe_failed",
            AuthEvent::LoggedOut => "logged_out",
        }
    }
}

impl std::fmt::Display for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for AuthEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert_eq!(AuthState::default(), AuthState::Unauthenticated);
        assert!(!AuthState::default().is_authenticated());
    }

    #[test]
    fn test_authenticating_events() {
        for event in [
            AuthEvent::LoginSucceeded,
            AuthEvent::SignupSucceeded,
            AuthEvent::ProbeSucceeded,
        ] {
            assert_eq!(
                AuthState::Unauthenticated.apply(event),
                AuthState::Authenticated
            );
            // Already authenticated stays authenticated
            assert_eq!(
                AuthState::Authenticated.apply(event),
                AuthState::Authenticated
            );
        }
    }

    #[test]
    fn test_revoking_events() {
        for event in [
            AuthEvent::Unauthorized,
            AuthEvent::ProbeFailed,
            AuthEvent::LoggedOut,
        ] {
            assert_eq!(
                AuthState::Authenticated.apply(event),
                AuthState::Unauthenticated
            );
            assert_eq!(
                AuthState::Unauthenticated.apply(event),
                AuthState::Unauthenticated
            );
        }
    }

    #[test]
    fn test_cycle_repeats() {
        let state = AuthState::default()
            .apply(AuthEvent::LoginSucceeded)
            .apply(AuthEvent::LoggedOut)
            .apply(AuthEvent::SignupSucceeded)
            .apply(AuthEvent::Unauthorized)
            .apply(AuthEvent::ProbeSucceeded);
        assert_eq!(state, AuthState::Authenticated);
    }
}

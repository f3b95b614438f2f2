//! Client-side mirror of the server's chat state

use chrono::{DateTime, Utc};
use serde::Serialize;

use chatdesk_api::{Message, Session};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientState {
    /// Sessions in server order, replaced wholesale on refresh
    pub sessions: Vec<Session>,
    /// `None` means a new, not yet saved chat
    pub current_session_id: Option<String>,
    /// Messages of the current session only
    pub messages: Vec<Message>,
    /// A chat send is in flight
    pub pending: bool,
    /// When `sessions` was last replaced from the server
    pub sessions_refreshed_at: Option<DateTime<Utc>>,
}

impl ClientState {
    pub fn is_new_chat(&self) -> bool {
        self.current_session_id.is_none()
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    /// The selected session, if it appears in the last fetched list
    pub fn current_session(&self) -> Option<&Session> {
        self.current_session_id
            .as_deref()
            .and_then(|id| self.session(id))
    }

    pub(crate) fn clear_selection(&mut self) {
        self.current_session_id = None;
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, title: &str) -> Session {
        Session {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_default_is_new_chat() {
        let state = ClientState::default();
        assert!(state.is_new_chat());
        assert!(state.messages.is_empty());
        assert!(!state.pending);
        assert!(state.current_session().is_none());
    }

    #[test]
    fn test_current_session_lookup() {
        let mut state = ClientState {
            sessions: vec![session("s1", "First"), session("s2", "Second")],
            current_session_id: Some("s2".to_string()),
            messages: vec![Message::user("hello")],
            ..Default::default()
        };
        assert_eq!(state.current_session().unwrap().title, "Second");

        state.current_session_id = Some("gone".to_string());
        assert!(state.current_session().is_none());

        state.clear_selection();
        assert!(state.is_new_chat());
        assert!(state.messages.is_empty());
        assert_eq!(state.sessions.len(), 2);
    }
}

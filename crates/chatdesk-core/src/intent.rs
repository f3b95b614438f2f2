//! Intents sent by presentation
//!
//! Prompts and confirmations happen in the front end; what reaches the core
//! is the answer, already collected.

use chatdesk_api::ChatReply;
use chatdesk_session::Reconcile;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Login(Credentials),
    Signup(Credentials),
    Logout,
    RefreshSessions,
    /// `None` starts a new chat
    SelectSession(Option<String>),
    NewChat,
    SendMessage(String),
    /// `title` is `None` when the rename prompt was cancelled
    RenameSession {
        session_id: String,
        title: Option<String>,
    },
    DeleteSession {
        session_id: String,
        confirmed: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Reconciled(Reconcile),
    Reply(ChatReply),
    /// The user backed out; nothing was sent
    Cancelled,
}

impl Intent {
    /// Intents that only make sense with an authenticated session
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Intent::Login(_) | Intent::Signup(_) | Intent::Logout
        )
    }

    /// Whether the user withdrew before anything could be sent
    pub fn is_cancelled(&self) -> bool {
        match self {
            Intent::RenameSession { title, .. } => {
                title.as_deref().map_or(true, |t| t.trim().is_empty())
            }
            Intent::DeleteSession { confirmed, .. } => !confirmed,
            _ => false,
        }
    }
}

//! Session Store
//!
//! Every mutation is applied only after the server answered, and only if no
//! newer request of the same kind was issued meanwhile.

use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;

use chatdesk_api::{ApiClient, ApiError, ChatReply, Message, Session};
use chatdesk_auth::{AuthEvent, AuthGate};

use crate::error::SessionError;
use crate::state::ClientState;
use crate::Result;

/// Whether a server response was written into the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    Applied,
    /// A newer request of the same kind was issued before this one resolved
    Superseded,
}

#[derive(Debug, Default)]
struct StoreInner {
    state: ClientState,
    /// Bumped whenever the selection may change (select, new chat, send, reset)
    selection_generation: u64,
    /// Bumped on every list fetch and on reset
    refresh_generation: u64,
}

pub struct SessionStore {
    inner: Arc<RwLock<StoreInner>>,
    api: ApiClient,
    gate: AuthGate,
}

/// Clears `pending` when the send finishes, fails or is dropped
struct PendingGuard {
    inner: Arc<RwLock<StoreInner>>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.inner.write().state.pending = false;
    }
}

impl SessionStore {
    pub fn new(api: ApiClient, gate: AuthGate) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner::default())),
            api,
            gate,
        }
    }

    /// Copy of the current state for rendering
    pub fn snapshot(&self) -> ClientState {
        self.inner.read().state.clone()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.inner.read().state.sessions.clone()
    }

    pub fn current_session_id(&self) -> Option<String> {
        self.inner.read().state.current_session_id.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.inner.read().state.messages.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.read().state.pending
    }

    /// Replace the session list with the server's.
    ///
    /// Selection and messages are left untouched.
    pub async fn refresh_sessions(&self) -> Result<Reconcile> {
        let generation = {
            let mut inner = self.inner.write();
            inner.refresh_generation += 1;
            inner.refresh_generation
        };

        let sessions = self
            .api
            .list_sessions()
            .await
            .map_err(|e| self.observe("refresh_sessions", e))?;

        let mut inner = self.inner.write();
        if inner.refresh_generation != generation {
            tracing::debug!(generation, "Discarding superseded session list");
            return Ok(Reconcile::Superseded);
        }

        tracing::debug!(count = sessions.len(), "Session list refreshed");
        inner.state.sessions = sessions;
        inner.state.sessions_refreshed_at = Some(Utc::now());

        Ok(Reconcile::Applied)
    }

    /// Load a session, or start a new chat when `session_id` is `None`.
    ///
    /// Selection and messages are replaced together. On failure the previous
    /// selection stays in place.
    pub async fn select_session(&self, session_id: Option<&str>) -> Result<Reconcile> {
        let Some(session_id) = session_id else {
            self.create_new_chat();
            return Ok(Reconcile::Applied);
        };

        let generation = {
            let mut inner = self.inner.write();
            inner.selection_generation += 1;
            inner.selection_generation
        };

        let detail = self
            .api
            .get_session(session_id)
            .await
            .map_err(|e| self.observe("select_session", e))?;

        let mut inner = self.inner.write();
        if inner.selection_generation != generation {
            tracing::debug!(session_id = %session_id, "Discarding superseded session load");
            return Ok(Reconcile::Superseded);
        }

        tracing::info!(
            session_id = %detail.id,
            message_count = detail.messages.len(),
            "Selected session"
        );
        // Sends issued before this load landed must not append into it
        inner.selection_generation += 1;
        inner.state.current_session_id = Some(detail.id);
        inner.state.messages = detail.messages;

        Ok(Reconcile::Applied)
    }

    /// Local reset to an unsaved chat. No network call.
    pub fn create_new_chat(&self) {
        let mut inner = self.inner.write();
        inner.selection_generation += 1;
        inner.state.clear_selection();
        tracing::debug!("Started new chat");
    }

    /// Delete a session, then refresh the list.
    ///
    /// Deleting the current session also drops the local selection so it
    /// never points at a session the server no longer has.
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.api
            .delete_session(session_id)
            .await
            .map_err(|e| self.observe("delete_session", e))?;

        {
            let mut inner = self.inner.write();
            if inner.state.current_session_id.as_deref() == Some(session_id) {
                inner.selection_generation += 1;
                inner.state.clear_selection();
            }
        }

        tracing::info!(session_id = %session_id, "Deleted session");
        self.refresh_after("delete_session").await;

        Ok(())
    }

    /// Rename a session. The new title shows up through the follow-up
    /// refresh, never optimistically.
    pub async fn rename_session(&self, session_id: &str, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SessionError::EmptyTitle);
        }

        self.api
            .rename_session(session_id, title)
            .await
            .map_err(|e| self.observe("rename_session", e))?;

        tracing::info!(session_id = %session_id, title = %title, "Renamed session");
        self.refresh_after("rename_session").await;

        Ok(())
    }

    /// Send a message in the current session, or start a new one.
    ///
    /// On success the user message and the reply are appended as a pair and
    /// the list is refreshed so a newly created session shows up.
    pub async fn send_message(&self, text: &str) -> Result<ChatReply> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let (session_id, generation, pending) = {
            let mut inner = self.inner.write();
            if inner.state.pending {
                return Err(SessionError::SendInFlight);
            }
            inner.state.pending = true;
            (
                inner.state.current_session_id.clone(),
                inner.selection_generation,
                PendingGuard {
                    inner: Arc::clone(&self.inner),
                },
            )
        };

        let reply = self
            .api
            .send_chat(text, session_id.as_deref())
            .await
            .map_err(|e| self.observe("send_message", e))?;

        let applied = {
            let mut inner = self.inner.write();
            if inner.selection_generation == generation {
                // Loads issued before this send must not overwrite its result
                inner.selection_generation += 1;
                inner.state.current_session_id = Some(reply.session_id.clone());
                inner.state.messages.push(Message::user(text));
                inner
                    .state
                    .messages
                    .push(Message::assistant(reply.reply.clone()));
                true
            } else {
                false
            }
        };
        // The chat request is done; the follow-up refresh does not block sends
        drop(pending);

        if applied {
            tracing::info!(session_id = %reply.session_id, "Chat reply received");
        } else {
            tracing::debug!(
                session_id = %reply.session_id,
                "Selection changed during send, reply not shown"
            );
        }

        self.refresh_after("send_message").await;

        Ok(reply)
    }

    /// Drop everything mirrored from the server.
    ///
    /// In-flight responses are discarded when they land. `pending` is left to
    /// the send that owns it.
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        inner.selection_generation += 1;
        inner.refresh_generation += 1;
        inner.state.sessions.clear();
        inner.state.sessions_refreshed_at = None;
        inner.state.clear_selection();
    }

    async fn refresh_after(&self, operation: &'static str) {
        if let Err(e) = self.refresh_sessions().await {
            tracing::warn!(operation, error = %e, "Session list refresh failed");
        }
    }

    fn observe(&self, operation: &'static str, err: ApiError) -> SessionError {
        if err.is_auth_required() {
            self.gate.record(AuthEvent::Unauthorized);
        }
        tracing::warn!(operation, error = %err, "Session operation failed");
        err.into()
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            api: self.api.clone(),
            gate: self.gate.clone(),
        }
    }
}

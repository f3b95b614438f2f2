//! Main client state container
//!
//! Owns the API client, the auth gate and the session store. Presentation
//! talks to this type only.

use chatdesk_api::{ApiClient, ChatReply};
use chatdesk_auth::{AuthEvent, AuthGate, AuthState};
use chatdesk_session::{ClientState, Reconcile, SessionStore};

use crate::config::Config;
use crate::error::CoreError;
use crate::intent::{Credentials, Intent, Outcome};
use crate::Result;

pub struct Client {
    /// Configuration
    config: Config,
    /// HTTP client, shares its cookie jar with the store's copy
    api: ApiClient,
    /// Authenticated/unauthenticated state
    gate: AuthGate,
    /// Sessions, selection and messages
    store: SessionStore,
}

impl Client {
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::new(config.resolved_api_url())
            .map_err(|e| CoreError::Config(e.to_string()))?;
        let gate = AuthGate::new();
        let store = SessionStore::new(api.clone(), gate.clone());

        tracing::debug!(api_url = %api.base_url(), "Client created");

        Ok(Self {
            config,
            api,
            gate,
            store,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn auth_state(&self) -> AuthState {
        self.gate.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.gate.is_authenticated()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// State fit for display. `None` while unauthenticated, when whatever
    /// the store still holds is stale.
    pub fn visible_state(&self) -> Option<ClientState> {
        self.gate
            .is_authenticated()
            .then(|| self.store.snapshot())
    }

    // === Auth operations ===

    /// Startup check for an existing server session.
    ///
    /// Never fails: any error just means "not logged in".
    pub async fn probe(&self) -> bool {
        match self.store.refresh_sessions().await {
            Ok(_) => {
                self.gate.record(AuthEvent::ProbeSucceeded);
            }
            Err(e) if e.is_auth_required() => {
                tracing::debug!("No existing session");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Startup probe failed");
                self.gate.record(AuthEvent::ProbeFailed);
            }
        }

        self.gate.is_authenticated()
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.api
            .login(&credentials.username, &credentials.password)
            .await?;
        self.start_session(AuthEvent::LoginSucceeded).await;
        Ok(())
    }

    pub async fn signup(&self, credentials: &Credentials) -> Result<()> {
        self.api
            .signup(&credentials.username, &credentials.password)
            .await?;
        self.start_session(AuthEvent::SignupSucceeded).await;
        Ok(())
    }

    /// Log out. Local state is cleared whatever the server answers.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "Logout request failed, clearing local state anyway");
        }

        self.store.reset();
        self.gate.record(AuthEvent::LoggedOut);
    }

    async fn start_session(&self, event: AuthEvent) {
        // Whatever was mirrored belonged to the previous login
        self.store.reset();
        self.gate.record(event);

        if let Err(e) = self.store.refresh_sessions().await {
            tracing::warn!(error = %e, "Could not load sessions after login");
        }
    }

    // === Session operations ===

    pub async fn refresh_sessions(&self) -> Result<Reconcile> {
        self.gate.require_authenticated()?;
        Ok(self.store.refresh_sessions().await?)
    }

    pub async fn select_session(&self, session_id: Option<&str>) -> Result<Reconcile> {
        self.gate.require_authenticated()?;
        Ok(self.store.select_session(session_id).await?)
    }

    pub fn new_chat(&self) -> Result<()> {
        self.gate.require_authenticated()?;
        self.store.create_new_chat();
        Ok(())
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.gate.require_authenticated()?;
        Ok(self.store.delete_session(session_id).await?)
    }

    pub async fn rename_session(&self, session_id: &str, title: &str) -> Result<()> {
        self.gate.require_authenticated()?;
        Ok(self.store.rename_session(session_id, title).await?)
    }

    pub async fn send_message(&self, text: &str) -> Result<ChatReply> {
        self.gate.require_authenticated()?;
        Ok(self.store.send_message(text).await?)
    }

    // === Intents ===

    pub async fn dispatch(&self, intent: Intent) -> Result<Outcome> {
        if intent.is_cancelled() {
            tracing::debug!(intent = ?intent, "Intent cancelled by user");
            return Ok(Outcome::Cancelled);
        }

        if intent.requires_auth() {
            self.gate.require_authenticated()?;
        }

        match intent {
            Intent::Login(credentials) => {
                self.login(&credentials).await?;
                Ok(Outcome::Done)
            }
            Intent::Signup(credentials) => {
                self.signup(&credentials).await?;
                Ok(Outcome::Done)
            }
            Intent::Logout => {
                self.logout().await;
                Ok(Outcome::Done)
            }
            Intent::RefreshSessions => Ok(Outcome::Reconciled(self.refresh_sessions().await?)),
            Intent::SelectSession(session_id) => Ok(Outcome::Reconciled(
                self.select_session(session_id.as_deref()).await?,
            )),
            Intent::NewChat => {
                self.new_chat()?;
                Ok(Outcome::Done)
            }
            Intent::SendMessage(text) => Ok(Outcome::Reply(self.send_message(&text).await?)),
            Intent::RenameSession { session_id, title } => {
                let title = title.unwrap_or_default();
                self.rename_session(&session_id, &title).await?;
                Ok(Outcome::Done)
            }
            Intent::DeleteSession { session_id, .. } => {
                self.delete_session(&session_id).await?;
                Ok(Outcome::Done)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{any, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> Client {
        Client::new(Config::new(server.uri())).unwrap()
    }

    #[test]
    fn test_invalid_api_url_is_config_error() {
        let result = Client::new(Config::new("ftp:/nowhere"));
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[tokio::test]
    async fn test_gated_operations_skip_network_when_logged_out() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(!client.is_authenticated());

        assert!(matches!(
            client.refresh_sessions().await,
            Err(CoreError::NotAuthenticated)
        ));
        assert!(matches!(
            client.select_session(Some("s1")).await,
            Err(CoreError::NotAuthenticated)
        ));
        assert!(matches!(client.new_chat(), Err(CoreError::NotAuthenticated)));
        assert!(matches!(
            client.delete_session("s1").await,
            Err(CoreError::NotAuthenticated)
        ));
        assert!(matches!(
            client.rename_session("s1", "t").await,
            Err(CoreError::NotAuthenticated)
        ));
        assert!(matches!(
            client.send_message("hi").await,
            Err(CoreError::NotAuthenticated)
        ));
        assert!(client.visible_state().is_none());
    }

    #[tokio::test]
    async fn test_dispatch_refuses_session_intents_when_logged_out() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        for intent in [
            Intent::RefreshSessions,
            Intent::SelectSession(None),
            Intent::NewChat,
            Intent::SendMessage("hi".to_string()),
        ] {
            assert!(matches!(
                client.dispatch(intent).await,
                Err(CoreError::NotAuthenticated)
            ));
        }
    }

    #[tokio::test]
    async fn test_probe_authenticates_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sessions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": "s1", "title": "One"}])),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(client.probe().await);
        assert_eq!(client.auth_state(), AuthState::Authenticated);
        assert_eq!(client.visible_state().unwrap().sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_probe_failure_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(!client.probe().await);
        assert_eq!(client.auth_state(), AuthState::Unauthenticated);

        // Unreachable server behaves the same
        let offline = Client::new(Config::new("http://127.0.0.1:9")).unwrap();
        assert!(!offline.probe().await);
    }

    #[tokio::test]
    async fn test_cancelled_intents_never_reach_the_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sessions/s1/rename"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(client.probe().await);

        let outcome = client
            .dispatch(Intent::RenameSession {
                session_id: "s1".to_string(),
                title: None,
            })
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Cancelled);

        let outcome = client
            .dispatch(Intent::DeleteSession {
                session_id: "s1".to_string(),
                confirmed: false,
            })
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
    }
}

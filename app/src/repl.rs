//! Line-oriented front end
//!
//! Collects answers to prompts, turns them into intents and renders the
//! client's snapshot afterwards. Holds no chat state of its own.

use std::io::{self, Write};

use chatdesk_core::{Client, Credentials, Intent, Outcome, Role};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::command::{Command, CommandError, HELP};
use crate::render;

/// What to show once an intent has gone through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Sessions,
    Conversation,
    Status(&'static str),
}

pub struct Repl<R, W> {
    client: Client,
    lines: Lines<R>,
    out: W,
    /// Read passwords from the terminal with echo off
    hide_passwords: bool,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(client: Client, input: R, out: W) -> Self {
        Self {
            client,
            lines: input.lines(),
            out,
            hide_passwords: false,
        }
    }

    /// Only meaningful when input is an interactive terminal.
    pub fn hide_passwords(mut self, hide: bool) -> Self {
        self.hide_passwords = hide;
        self
    }

    pub async fn run(&mut self) -> io::Result<()> {
        if self.client.probe().await {
            writeln!(self.out, "Welcome back.")?;
            self.show(View::Sessions)?;
        } else {
            writeln!(self.out, "Not logged in. Use /login or /signup.")?;
        }

        loop {
            let Some(line) = self.prompt("> ").await? else {
                break;
            };

            let command = match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => {
                    writeln!(self.out, "{}", HELP)?;
                    continue;
                }
                Ok(command) => command,
                Err(CommandError::Empty) => continue,
                Err(e) => {
                    render::error(&mut self.out, &e)?;
                    continue;
                }
            };

            let Some((intent, view)) = self.intent_for(command).await? else {
                break;
            };

            if matches!(intent, Intent::SendMessage(_)) && self.client.is_authenticated() {
                render::typing(&mut self.out)?;
                self.out.flush()?;
            }

            match self.client.dispatch(intent).await {
                Ok(Outcome::Cancelled) => writeln!(self.out, "Cancelled.")?,
                // Printed from the reply, which is kept out of the conversation
                // if the selection moved while it was in flight
                Ok(Outcome::Reply(reply)) => {
                    writeln!(self.out, "{}: {}", Role::Assistant, reply.reply)?;
                }
                Ok(_) => self.show(view)?,
                Err(e) => {
                    render::error(&mut self.out, &e)?;
                    if e.is_auth_required() {
                        writeln!(self.out, "Use /login to continue.")?;
                    }
                }
            }
        }

        self.out.flush()
    }

    /// Turn a command into an intent, prompting where needed.
    ///
    /// `None` means input ended mid-prompt.
    async fn intent_for(&mut self, command: Command) -> io::Result<Option<(Intent, View)>> {
        let intent = match command {
            Command::Login => {
                let Some(credentials) = self.credentials().await? else {
                    return Ok(None);
                };
                (Intent::Login(credentials), View::Sessions)
            }
            Command::Signup => {
                let Some(credentials) = self.credentials().await? else {
                    return Ok(None);
                };
                (Intent::Signup(credentials), View::Sessions)
            }
            Command::Logout => (Intent::Logout, View::Status("Logged out.")),
            Command::Sessions => (Intent::RefreshSessions, View::Sessions),
            Command::Open(session_id) => {
                (Intent::SelectSession(Some(session_id)), View::Conversation)
            }
            Command::New => (Intent::NewChat, View::Conversation),
            Command::Rename { session_id, title } => {
                let title = match title {
                    Some(title) => Some(title),
                    None => self.prompt("New title: ").await?,
                };
                (Intent::RenameSession { session_id, title }, View::Sessions)
            }
            Command::Delete(session_id) => {
                let Some(answer) = self.prompt(&format!("Delete {}? [y/N] ", session_id)).await?
                else {
                    return Ok(None);
                };
                let confirmed = matches!(answer.trim().to_lowercase().as_str(), "y" | "yes");
                (Intent::DeleteSession { session_id, confirmed }, View::Sessions)
            }
            Command::Say(text) => (Intent::SendMessage(text), View::Conversation),
            Command::Help | Command::Quit => unreachable!("handled by the loop"),
        };

        Ok(Some(intent))
    }

    async fn credentials(&mut self) -> io::Result<Option<Credentials>> {
        let Some(username) = self.prompt("Username: ").await? else {
            return Ok(None);
        };
        let password = if self.hide_passwords {
            write!(self.out, "Password: ")?;
            self.out.flush()?;
            let password = tokio::task::spawn_blocking(rpassword::read_password)
                .await
                .map_err(io::Error::other)??;
            Some(password)
        } else {
            self.prompt("Password: ").await?
        };
        let Some(password) = password else {
            return Ok(None);
        };
        Ok(Some(Credentials::new(username.trim(), password)))
    }

    async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", label)?;
        self.out.flush()?;
        self.lines.next_line().await
    }

    fn show(&mut self, view: View) -> io::Result<()> {
        let Some(state) = self.client.visible_state() else {
            return match view {
                View::Status(status) => writeln!(self.out, "{}", status),
                _ => writeln!(self.out, "Not logged in."),
            };
        };

        match view {
            View::Sessions => render::sessions(&mut self.out, &state),
            View::Conversation => render::conversation(&mut self.out, &state),
            View::Status(status) => writeln!(self.out, "{}", status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatdesk_core::Config;
    use serde_json::json;
    use wiremock::matchers::{any, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn run_script(server: &MockServer, script: &str) -> String {
        let client = Client::new(Config::new(server.uri())).unwrap();
        let mut out = Vec::new();
        Repl::new(client, script.as_bytes(), &mut out)
            .run()
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_logged_out_session_commands_are_refused() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let output = run_script(&server, "/sessions\nhello\n/quit\n").await;

        assert!(output.contains("Not logged in. Use /login or /signup."));
        assert_eq!(output.matches("error: Not authenticated").count(), 2);
        assert!(!output.contains("Bot is typing..."));
    }

    #[tokio::test]
    async fn test_login_and_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(json!({"username": "ada", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sessions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": "s1", "title": "hello"}])),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"session_id": "s1", "reply": "hi there"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let output = run_script(&server, "/login\nada\npw\nhello\n").await;

        assert!(output.contains("s1  hello"));
        assert!(output.contains("Bot is typing...\nassistant: hi there"));
        // Scripted input is never echoed back
        assert!(!output.contains("pw"));
    }

    #[tokio::test]
    async fn test_delete_needs_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sessions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": "s1", "title": "One"}])),
            )
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let output = run_script(&server, "/delete s1\nn\n/rename s1\n\n").await;

        assert_eq!(output.matches("Cancelled.").count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_command_is_reported() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let output = run_script(&server, "/bogus\n").await;
        assert!(output.contains("error: unknown command: /bogus"));
    }
}

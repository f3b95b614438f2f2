//! Command line parsing
//!
//! - `/login`, `/signup`, `/logout` : account
//! - `/sessions`, `/open <id>`, `/new` : navigation
//! - `/rename <id> [title]`, `/delete <id>` : session management
//! - anything else : sent as a chat message

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login,
    Signup,
    Logout,
    Sessions,
    Open(String),
    New,
    /// Title is asked for interactively when omitted
    Rename {
        session_id: String,
        title: Option<String>,
    },
    Delete(String),
    Help,
    Quit,
    Say(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("nothing to do")]
    Empty,

    #[error("unknown command: /{0}")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Command {
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(CommandError::Empty);
        }

        let Some(without_prefix) = input.strip_prefix('/') else {
            return Ok(Command::Say(input.to_string()));
        };

        let mut parts = without_prefix.splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default().to_lowercase();
        let rest = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let command = match command.as_str() {
            "login" => Command::Login,
            "signup" | "register" => Command::Signup,
            "logout" => Command::Logout,
            "sessions" | "ls" => Command::Sessions,
            "open" | "o" => Command::Open(single_arg(rest, "/open <id>")?),
            "new" | "n" => Command::New,
            "rename" => {
                let rest = rest.ok_or(CommandError::Usage("/rename <id> [title]"))?;
                let mut parts = rest.splitn(2, char::is_whitespace);
                let session_id = parts.next().unwrap_or_default().to_string();
                let title = parts
                    .next()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty());
                Command::Rename { session_id, title }
            }
            "delete" | "rm" => Command::Delete(single_arg(rest, "/delete <id>")?),
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

fn single_arg(rest: Option<&str>, usage: &'static str) -> Result<String, CommandError> {
    match rest {
        Some(arg) if !arg.contains(char::is_whitespace) => Ok(arg.to_string()),
        _ => Err(CommandError::Usage(usage)),
    }
}

pub const HELP: &str = "\
/login                 log in
/signup                create an account
/logout                log out
/sessions              list sessions
/open <id>             open a session
/new                   start a new chat
/rename <id> [title]   rename a session
/delete <id>           delete a session
/help                  show this help
/quit                  exit
anything else is sent as a message";

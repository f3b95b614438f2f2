//! Text rendering of client snapshots

use std::fmt::Display;
use std::io::{self, Write};

use chatdesk_core::{ClientState, Message};

pub fn sessions(out: &mut impl Write, state: &ClientState) -> io::Result<()> {
    if state.sessions.is_empty() {
        return writeln!(out, "(no sessions)");
    }

    for session in &state.sessions {
        let marker = if state.current_session_id.as_deref() == Some(session.id.as_str()) {
            '*'
        } else {
            ' '
        };
        writeln!(out, "{} {}  {}", marker, session.id, session.title)?;
    }
    Ok(())
}

pub fn conversation(out: &mut impl Write, state: &ClientState) -> io::Result<()> {
    match state.current_session() {
        Some(session) => writeln!(out, "== {} ==", session.title)?,
        None if state.is_new_chat() => writeln!(out, "== New chat ==")?,
        None => {}
    }

    if state.messages.is_empty() {
        return writeln!(out, "No messages. Start a new chat.");
    }

    for message in &state.messages {
        self::message(out, message)?;
    }
    Ok(())
}

pub fn message(out: &mut impl Write, message: &Message) -> io::Result<()> {
    writeln!(out, "{}: {}", message.role, message.content)
}

pub fn typing(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Bot is typing...")
}

pub fn error(out: &mut impl Write, err: &dyn Display) -> io::Result<()> {
    writeln!(out, "error: {}", err)
}

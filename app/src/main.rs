//! Chatdesk - Terminal chat client
//!
//! The core owns all state; this binary only reads commands and prints
//! snapshots.

mod command;
mod render;
mod repl;

use std::io::IsTerminal;
use std::process::ExitCode;

use chatdesk_core::{Client, Config};
use repl::Repl;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    chatdesk_core::init_logging();

    let config = Config::from_env();
    let client = match Client::new(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start");
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(api_url = %client.config().resolved_api_url(), "Chatdesk starting");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut repl = Repl::new(client, stdin, std::io::stdout())
        .hide_passwords(std::io::stdin().is_terminal());

    match repl.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Terminal I/O failed");
            ExitCode::FAILURE
        }
    }
}

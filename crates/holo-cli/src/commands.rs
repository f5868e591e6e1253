//! Slash commands for interactive mode

/// Result of executing a slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Show a message to the user (not sent to the endpoint)
    Message(String),
    /// Exit the application
    Exit,
    /// Unknown command
    Unknown(String),
}

/// Parse and execute a slash command.
///
/// Returns `None` when `input` is a question rather than a command.
pub fn execute_command(input: &str, endpoint: &str) -> Option<CommandResult> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let command = rest
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();

    Some(match command.as_str() {
        "help" | "h" | "?" => CommandResult::Message(help_message()),

        "endpoint" | "e" => CommandResult::Message(format!("Endpoint: {}", endpoint)),

        "quit" | "exit" | "q" => CommandResult::Exit,

        _ => CommandResult::Unknown(command),
    })
}

/// Text shown for an unknown command
pub fn unknown_message(command: &str) -> String {
    format!(
        "Unknown command: /{}\nType /help for available commands.",
        command
    )
}

fn help_message() -> String {
    r#"Available commands:
  /help, /h, /?        Show this help message
  /endpoint, /e        Show where questions are sent
  /quit, /exit, /q     Exit holo

Anything else is sent to the assistant as a question."#
        .to_string()
}

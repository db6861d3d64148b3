//! Slash command handlers for the chat REPL.

use colored::Colorize;

use crate::format;
use crate::message::Message;

/// Action returned by slash command handling.
#[derive(Debug, PartialEq)]
pub(crate) enum CommandAction {
    /// Command was handled; continue the REPL loop.
    Continue,
    /// Unknown command was entered.
    Unknown(String),
}

pub(crate) fn handle_slash_command(command: &str, history: &mut Vec<Message>) -> CommandAction {
    match command {
        "/history" => {
            if history.is_empty() {
                println!("{}", "No messages yet.".dimmed());
            }
            for msg in history.iter() {
                println!("{}", format::format_message(msg));
                println!();
            }
            CommandAction::Continue
        }
        "/clear" => {
            history.clear();
            println!("{}", "History cleared.".dimmed());
            CommandAction::Continue
        }
        "/help" => {
            println!("{}", "Commands:".bold());
            println!("  {} - show conversation history", "/history".cyan());
            println!("  {} - clear conversation", "/clear".cyan());
            println!("  {} - show this help", "/help".cyan());
            println!("  {} - exit", "Ctrl+D".cyan());
            CommandAction::Continue
        }
        _ => CommandAction::Unknown(command.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_empties_history() {
        let mut history = vec![Message::user("hi"), Message::assistant("hello")];
        assert_eq!(
            handle_slash_command("/clear", &mut history),
            CommandAction::Continue
        );
        assert!(history.is_empty());
    }

    #[test]
    fn unknown_commands_are_reported() {
        let mut history = Vec::new();
        assert_eq!(
            handle_slash_command("/compact", &mut history),
            CommandAction::Unknown("/compact".into())
        );
    }
}

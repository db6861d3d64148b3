//! Interactive assistant REPL for railmate.
//!
//! Each line is classified and answered by the [`Assistant`]. The conversation
//! is kept in memory for `/history`; classification only ever sees the
//! current line.

mod commands;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::assistant::Assistant;
use crate::config::Config;
use crate::format;
use crate::message::Message;

/// Runs the interactive chat REPL.
///
/// # Readline behavior
///
/// - **Ctrl+C**: cancels current input, stays in REPL
/// - **Ctrl+D**: exits cleanly with "goodbye."
/// - Readline history is persisted to `~/.cache/railmate/chat_history.txt`
pub async fn run_chat(assistant: Assistant) -> Result<()> {
    println!(
        "{} ask about trains, availability, or cancellations (Ctrl+D to exit)",
        "railmate".bold().cyan(),
    );
    println!();

    let mut history: Vec<Message> = Vec::new();

    let mut rl = DefaultEditor::new()?;
    let history_path = Config::cache_dir()?.join(crate::constants::HISTORY_FILENAME);
    if history_path.exists() {
        let _ = rl.load_history(&history_path);
    }

    loop {
        match rl.readline(&format!("{} ", ">".green().bold())) {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }

                if line.starts_with('/') {
                    match commands::handle_slash_command(&line, &mut history) {
                        commands::CommandAction::Continue => {}
                        commands::CommandAction::Unknown(cmd) => {
                            println!("{} Unknown command: {}", "?".yellow(), cmd);
                        }
                    }
                    continue;
                }

                let _ = rl.add_history_entry(&line);
                println!();

                match assistant.respond(&line).await {
                    Ok(reply) => {
                        println!("{}", format::format_reply(&reply));
                        history.push(Message::user(&line));
                        history.push(Message::assistant(reply.text));
                    }
                    Err(e) => {
                        tracing::error!(attempts = e.attempts(), last = %e.last_error(), "assistant call failed");
                        eprintln!("{} {}", "error:".red().bold(), e);
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "goodbye.".dimmed());
                break;
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.save_history(&history_path);

    Ok(())
}

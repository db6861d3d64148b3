//! Command-line interface definition and dispatch for railmate.
//!
//! Uses [`clap`] for argument parsing with derive macros. The HTTP endpoint
//! lives in the [`serve`] submodule.

mod serve;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use futures::future::join_all;

use crate::assistant::{self, Action, Assistant};
use crate::config::{Config, Settings};
use crate::llm::Dispatcher;
use crate::{chat, constants, format};

/// Top-level CLI structure for railmate.
#[derive(Parser)]
#[command(name = "railmate", about = "An IRCTC train assistant backed by resilient LLM calls")]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the railmate CLI.
///
/// The `///` doc comments on variants double as `--help` text rendered by clap.
#[derive(Subcommand)]
pub enum Commands {
    /// Send one prompt to the LLM and print its answer
    Ask {
        /// The prompt to send
        prompt: Vec<String>,
        /// Provider to prefer (google, groq, local)
        #[arg(short, long, default_value = constants::DEFAULT_CHAT_PROVIDER)]
        provider: String,
        /// Attempts before giving up (defaults to config)
        #[arg(short, long)]
        retries: Option<u32>,
        /// Do not write a transcript
        #[arg(long)]
        no_save: bool,
        /// Print the raw payload as JSON instead of the text
        #[arg(long)]
        raw: bool,
    },
    /// Classify messages into assistant actions, concurrently
    Classify {
        /// Messages to classify
        #[arg(required = true)]
        messages: Vec<String>,
        /// Provider to prefer (defaults to LLM_PROVIDER or config)
        #[arg(short, long)]
        provider: Option<String>,
        /// Also run the matching lookup and print its result
        #[arg(long)]
        run: bool,
    },
    /// Start an interactive assistant session
    Chat {
        /// Provider to prefer (defaults to LLM_PROVIDER or config)
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Serve the llm_chat HTTP endpoint
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = constants::DEFAULT_BIND_ADDR)]
        bind: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Subcommands for the `config` command.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the merged config with API keys masked
    Show,
}

/// Parses command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let command = match cli.command {
        Commands::Config {
            action: ConfigAction::Show,
        } => return show_config(&config),
        command => command,
    };

    let settings = Arc::new(Settings::from_config(&config)?);
    let dispatcher = Dispatcher::new(settings);

    match command {
        Commands::Ask {
            prompt,
            provider,
            retries,
            no_save,
            raw,
        } => {
            let prompt = prompt.join(" ");
            if prompt.is_empty() {
                anyhow::bail!("No prompt provided. Usage: railmate ask \"your question here\"");
            }

            let mut options = dispatcher
                .default_options()
                .provider(Some(provider))
                .save(!no_save);
            if let Some(retries) = retries {
                options = options.max_retries(retries);
            }

            let result = dispatcher.llm_chat(&prompt, &options).await?;
            if raw {
                println!("{}", serde_json::to_string_pretty(&result.raw)?);
            } else {
                println!("{}", result.text);
            }
            Ok(())
        }
        Commands::Classify {
            messages,
            provider,
            run,
        } => {
            let assistant = Assistant::new(dispatcher).with_provider(provider);
            let outcomes = join_all(messages.iter().map(|m| assistant.classify(m))).await;

            let mut failed = 0;
            for (message, outcome) in messages.iter().zip(outcomes) {
                match outcome {
                    Ok(action) => {
                        println!("{} {}", format!("{action:<20}").cyan(), message);
                        if run && action != Action::GeneralChat {
                            println!("{}", format::format_reply(&assistant::run(action, message)));
                            println!();
                        }
                    }
                    Err(e) => {
                        failed += 1;
                        eprintln!("{} {}: {}", "error:".red().bold(), message, e);
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{failed} of {} messages could not be classified", messages.len());
            }
            Ok(())
        }
        Commands::Chat { provider } => {
            chat::run_chat(Assistant::new(dispatcher).with_provider(provider)).await
        }
        Commands::Serve { bind } => serve::serve(dispatcher, &bind).await,
        Commands::Config { .. } => Ok(()),
    }
}

fn show_config(config: &Config) -> Result<()> {
    let path = Config::config_path()?;
    println!("{} {}", "Config path:".bold(), path.display());
    println!();
    let toml_str =
        toml::to_string_pretty(&config.redacted()).context("Failed to render config as TOML")?;
    println!("{}", toml_str);
    Ok(())
}

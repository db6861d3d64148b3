//! Entry point for railmate, an IRCTC train assistant for the terminal.
//!
//! Loads `.env`, installs tracing, loads the layered config, then dispatches
//! the chosen subcommand via [`cli::run`].

mod assistant;
mod chat;
mod cli;
mod config;
mod constants;
mod error;
mod format;
mod llm;
mod message;
mod provider;
mod services;
mod telemetry;

use anyhow::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::parse();
    telemetry::init_tracing(cli.verbose);

    let config = config::Config::load()?;
    cli::run(cli, config).await
}

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, warn};

use juris_agent::{StaticCredentials, XaiClient};
use juris_core::config::JurisConfig;

mod commands;
mod history;
mod render;
mod repl;
mod session;

use render::Renderer;
use session::{Outcome, Session};

/// Ask legal questions to a web-search augmented model and stream the answer.
#[derive(Debug, Parser)]
#[command(name = "juris", version)]
struct Cli {
    /// Question to ask. Starts an interactive session when omitted.
    question: Vec<String>,

    /// Model to use (default: agent.model from config).
    #[arg(short, long)]
    model: Option<String>,

    /// Config file (default: $JURIS_CONFIG or ~/.juris/juris.toml).
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "juris_cli=warn,juris_agent=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    // explicit flag > JURIS_CONFIG env > ~/.juris/juris.toml
    let config_path = cli.config.or_else(|| std::env::var("JURIS_CONFIG").ok());
    let config = JurisConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        JurisConfig::default()
    });

    let credentials = match StaticCredentials::from_config(&config.provider) {
        Ok(c) => c,
        Err(e) => {
            error!(code = e.code(), "{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    let client = XaiClient::new(Arc::new(credentials));
    let model = cli.model.unwrap_or_else(|| config.agent.model.clone());
    let mut session = Session::new(client, &config.agent, config.search, model);

    if cli.question.is_empty() {
        repl::run(session).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let query = cli.question.join(" ");
    let outcome = session.ask(&query, &mut Renderer::stdio()).await?;
    Ok(match outcome {
        Outcome::Completed => ExitCode::SUCCESS,
        Outcome::Failed | Outcome::Cancelled => ExitCode::FAILURE,
    })
}

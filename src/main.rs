use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use policychat::api::QueryClient;
use policychat::chat::TurnController;
use policychat::config::ChatConfig;
use policychat::repl;
use policychat::tui::runner::run_tui;

#[derive(Parser)]
#[command(name = "policychat", about = "Chat client for a policy Q&A backend.")]
struct Cli {
    /// Backend base URL (default http://localhost:8000)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Extra config file layered over the user/project config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Write logs to this file (the TUI discards logs otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone)]
enum Command {
    /// Full-screen chat (default)
    Tui,
    /// Line-by-line chat on stdin/stdout
    Repl,
    /// Ask a single question and print the reply
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Check the backend health endpoint
    Health,
}

fn init_logging(log_file: Option<&PathBuf>, tui: bool) -> Result<()> {
    let (writer, ansi) = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        // The terminal belongs to the UI.
        None if tui => (BoxMakeWriter::new(std::io::sink), false),
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("policychat=info".parse()?),
        )
        .with_writer(writer)
        .with_ansi(ansi)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Command::Tui);
    init_logging(cli.log_file.as_ref(), matches!(command, Command::Tui))?;

    let mut config = match &cli.config {
        Some(path) => ChatConfig::load_with(path)?,
        None => ChatConfig::load(),
    };
    if let Some(url) = &cli.base_url {
        config.apply_base_url(url);
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout_secs = Some(secs);
    }

    let client = match config.request_timeout() {
        Some(timeout) => QueryClient::with_timeout(&config.base_url, timeout)?,
        None => QueryClient::with_base_url(&config.base_url),
    };
    info!("policychat using backend {}", client.base_url());

    match command {
        Command::Health => {
            let status = client
                .health()
                .await
                .with_context(|| format!("cannot reach {}", client.base_url()))?;
            println!("{}", if status.ready { "ready" } else { "not ready" });
        }
        Command::Ask { question } => {
            let controller = TurnController::new(Arc::new(client));
            let transcript = repl::ask(&controller, &question.join(" ")).await;
            repl::write_replies(&mut std::io::stdout().lock(), transcript.entries())?;
        }
        Command::Repl => {
            let controller = TurnController::new(Arc::new(client));
            repl::run_repl(&controller).await?;
        }
        Command::Tui => {
            let controller = TurnController::new(Arc::new(client));
            run_tui(&config, controller).await?;
        }
    }

    Ok(())
}

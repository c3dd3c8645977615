//! Answersmith CLI: the main entry point.
//!
//! Commands:
//! - `ask`     Resolve a single question
//! - `batch`   Resolve every question in a file
//! - `serve`   Start the answer store / resolve HTTP server
//! - `config`  Show the effective configuration
//! - `doctor`  Diagnose configuration and connectivity

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "answersmith",
    about = "Answersmith: stored answers first, generated answers when needed",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single question
    Ask {
        /// The question to answer
        question: String,

        /// Extra context for generation (job description, profile, ...)
        #[arg(short, long)]
        context: Option<String>,

        /// Print the full resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve every non-blank line of a file, concurrently
    Batch {
        /// File with one question per line
        file: PathBuf,

        /// Context applied to every question
        #[arg(short, long)]
        context: Option<String>,

        /// Maximum resolutions in flight
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },

    /// Start the HTTP server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the effective configuration (secrets redacted)
    Config {
        /// Print the config file path instead
        #[arg(long)]
        path: bool,
    },

    /// Diagnose configuration and connectivity
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Ask {
            question,
            context,
            json,
        } => commands::ask::run(&question, context.as_deref(), json).await?,
        Commands::Batch {
            file,
            context,
            concurrency,
        } => commands::batch::run(&file, context.as_deref(), concurrency).await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Config { path } => {
            if path {
                commands::config_cmd::path().await?
            } else {
                commands::config_cmd::show().await?
            }
        }
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}

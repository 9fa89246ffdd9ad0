//! SiteChat CLI — the main entry point.
//!
//! Commands:
//! - `onboard`  — Initialize config & knowledge directory
//! - `chat`     — Interactive chat or single-message mode
//! - `pages`    — Print the structured view of a knowledge file
//! - `gateway`  — Start the HTTP API server
//! - `status`   — Show configuration status
//! - `config`   — Validate, show or locate the config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "sitechat",
    about = "SiteChat — website support bot from your own content",
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
    #[arg(long, global = true, env = "SITECHAT_JSON_LOGS")]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and knowledge directory
    Onboard,

    /// Chat with the support bot
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Knowledge file (one snippet per line); overrides the config
        #[arg(short, long)]
        knowledge: Option<PathBuf>,

        /// Source label used in replies; overrides the config
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Print the structured view of a knowledge file
    Pages {
        /// Knowledge file; defaults to the configured one
        knowledge: Option<PathBuf>,
    },

    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show configuration status
    Status,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Check the config file for errors
    Validate,
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat {
            message,
            knowledge,
            source,
        } => commands::chat::run(message, knowledge, source).await?,
        Commands::Pages { knowledge } => commands::pages::run(knowledge).await?,
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Config { action } => match action {
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
    }

    Ok(())
}

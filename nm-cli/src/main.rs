//! NotionMail CLI - simulated mail over a Notion database.
//!
//! Each subcommand maps to one mailbox operation: send, read, delete,
//! clear, relationship. Values not given on the command line are prompted
//! for interactively.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing::debug;

use nm_core::config::AppConfig;
use nm_core::error::NmResult;
use nm_core::logging;

/// NotionMail - send and read mail stored in a Notion database.
#[derive(Parser)]
#[command(
    name = "notionmail",
    version,
    about = "Simulated mailbox backed by a Notion database",
    long_about = "A command-line mailbox that stores every message as a row in a Notion database.\n\
                  Credentials come from the config file or the NOTION_TOKEN and NOTION_DATABASE_ID\n\
                  environment variables."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json, table).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
    /// Compact table.
    Table,
}

#[derive(Subcommand)]
enum Commands {
    /// Send mail to a user.
    Send {
        /// Sender name.
        #[arg(long = "from")]
        sender: Option<String>,
        /// Recipient name.
        #[arg(long = "to")]
        recipient: Option<String>,
        /// Message text.
        message: Option<String>,
    },
    /// Check a user's mail.
    Read {
        /// Recipient whose mail to show.
        recipient: Option<String>,
    },
    /// Delete a message by its id.
    Delete {
        /// Message id as shown by `read`.
        id: Option<String>,
    },
    /// Delete every message for a recipient.
    Clear {
        /// Recipient whose mail to clear.
        recipient: Option<String>,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the conversation between two users.
    Relationship {
        /// First participant.
        person1: Option<String>,
        /// Second participant.
        person2: Option<String>,
    },
    /// Verify credentials and the mailbox database schema.
    Check,
    /// View and modify configuration.
    Config {
        #[command(subcommand)]
        action: commands::settings::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", style("An error occurred:").red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> NmResult<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => AppConfig::default_config_path()?,
    };
    let mut config = if config_path.exists() {
        AppConfig::load_from_file(&config_path)?
    } else {
        AppConfig::default()
    };
    config.apply_env_overrides();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let guard = match config.effective_log_dir() {
        Ok(dir) => logging::init_logging(&log_level, &dir, config.logging.json_output).ok(),
        Err(_) => None,
    };
    if guard.is_none() {
        logging::init_console_logging(&log_level);
    }

    debug!(
        "{} v{}, config {}",
        nm_core::constants::APP_NAME,
        nm_core::constants::APP_VERSION,
        config_path.display()
    );

    // Dispatch to command handlers
    match cli.command {
        Commands::Send { sender, recipient, message } => {
            commands::mail::send(&config, sender, recipient, message, cli.format).await
        }
        Commands::Read { recipient } => {
            commands::mail::read(&config, recipient, cli.format).await
        }
        Commands::Delete { id } => {
            commands::mail::delete(&config, id, cli.format).await
        }
        Commands::Clear { recipient, yes } => {
            commands::mail::clear(&config, recipient, yes, cli.format).await
        }
        Commands::Relationship { person1, person2 } => {
            commands::mail::relationship(&config, person1, person2, cli.format).await
        }
        Commands::Check => {
            commands::check::run(&config, cli.format).await
        }
        Commands::Config { action } => {
            commands::settings::run(&config, &config_path, action, cli.format)
        }
    }
}

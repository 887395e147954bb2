//! # Tempo CLI Module
//!
//! This module implements the CLI interface for Tempo.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server (default when no command is given)
//! - `config` - Show the effective configuration

mod commands;

use crate::config::ServerConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use crate::error::AppError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Tempo - Stage Timer Server
///
/// Tracks processes, iterations and stages, and times each stage with a
/// start/stop timer. All state is in memory.
#[derive(Parser, Debug)]
#[command(name = "tempo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config and TEMPO_HOST)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config and TEMPO_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the effective configuration
    Config,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            cmd_server(config.with_overrides(host, port)).await
        }
        Some(Commands::Config) => cmd_config(&config, cli.json_mode),
        None => cmd_server(config).await,
    }
}

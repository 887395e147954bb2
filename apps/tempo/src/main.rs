//! # Tempo - Stage Timer Server
//!
//! The main binary for the Tempo process timing service.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface (clap-based)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                apps/tempo (THE BINARY)               │
//! │                                                      │
//! │   ┌─────────────┐            ┌─────────────┐         │
//! │   │    CLI      │            │  HTTP API   │         │
//! │   │   (clap)    │            │   (axum)    │         │
//! │   └──────┬──────┘            └──────┬──────┘         │
//! │          └───────────┬──────────────┘                │
//! │                      ▼                               │
//! │              ┌───────────────┐                       │
//! │              │  tempo-core   │                       │
//! │              │  (THE LOGIC)  │                       │
//! │              └───────────────┘                       │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! tempo server --host 0.0.0.0 --port 8080
//!
//! # Show the effective configuration
//! tempo --config tempo.toml config
//! ```

use clap::Parser;
use tempo::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // TEMPO_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("TEMPO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tempo=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Tempo startup banner.
fn print_banner() {
    println!(
        r#"
  ████████╗███████╗███╗   ███╗██████╗  ██████╗
  ╚══██╔══╝██╔════╝████╗ ████║██╔══██╗██╔═══██╗
     ██║   █████╗  ██╔████╔██║██████╔╝██║   ██║
     ██║   ██╔══╝  ██║╚██╔╝██║██╔═══╝ ██║   ██║
     ██║   ███████╗██║ ╚═╝ ██║██║     ╚██████╔╝
     ╚═╝   ╚══════╝╚═╝     ╚═╝╚═╝      ╚═════╝

  Stage Timer Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}

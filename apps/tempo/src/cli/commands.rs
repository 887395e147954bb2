//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::ServerConfig;
use crate::error::AppError;
use tempo_core::Registry;

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server with a fresh, empty registry.
pub async fn cmd_server(config: ServerConfig) -> Result<(), AppError> {
    println!("Tempo Stage Timer Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.host);
    println!("  Port:       {}", config.port);
    println!("  Rate limit: {}", describe_rate_limit(config.rate_limit));
    println!();
    println!("Endpoints:");
    println!("  POST /processes                              - Create a process");
    println!("  GET  /processes                              - List processes");
    println!("  GET  /processes/{{id}}                         - Get a process");
    println!("  POST /processes/{{id}}/stages                  - Add a stage");
    println!("  POST /processes/{{id}}/stages/{{index}}/start    - Start a stage timer");
    println!("  POST /processes/{{id}}/stages/{{index}}/stop     - Stop a stage timer");
    println!("  GET  /status                                 - Registry status");
    println!("  GET  /health                                 - Health check");
    println!();
    println!("State is kept in memory and discarded on shutdown.");
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config, Registry::new()).await
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Show the effective configuration.
pub fn cmd_config(config: &ServerConfig, json_mode: bool) -> Result<(), AppError> {
    if json_mode {
        let output = serde_json::to_string_pretty(config)
            .map_err(|e| AppError::Config(format!("Cannot render config: {}", e)))?;
        println!("{}", output);
        return Ok(());
    }

    println!("Tempo Configuration");
    println!("===================");
    println!("Bind address: {}", config.addr());
    println!("Rate limit:   {}", describe_rate_limit(config.rate_limit));
    println!(
        "CORS origins: {}",
        config
            .cors_origins
            .as_ref()
            .map(|o| o.join(", "))
            .unwrap_or_else(|| "localhost only".to_string())
    );
    println!("Body limit:   {} bytes", config.body_limit_bytes);

    Ok(())
}

fn describe_rate_limit(rps: u32) -> String {
    if rps == 0 {
        "disabled".to_string()
    } else {
        format!("{} requests/second", rps)
    }
}

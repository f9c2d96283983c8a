//! CLI parser and config loading.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use storage::StorageConfig;

#[derive(Parser)]
#[command(name = "message-capture")]
#[command(about = "Persist chat message events to storage", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay NDJSON message events (stdin by default) into storage. Config from env.
    Replay {
        /// Read events from this file instead of stdin.
        #[arg(short, long)]
        input: Option<String>,
        /// Also append logs to this file.
        #[arg(long)]
        log_file: Option<String>,
    },
    /// Load and validate config from env, then print the effective values.
    CheckConfig,
}

/// Load StorageConfig from environment and validate it.
pub fn load_config() -> Result<StorageConfig> {
    let config = StorageConfig::from_env().context("Load storage config from env")?;
    config.validate().context("Validate storage config")?;
    Ok(config)
}

/// Human-readable summary of the effective config; the URL is masked.
pub fn describe_config(config: &StorageConfig) -> String {
    let max_attempts = config
        .retry_max_attempts
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unbounded".to_string());
    [
        format!("database_url: {}", config.masked_url()),
        format!("table: {}", config.table_name()),
        format!("debug: {}", config.debug),
        format!("retry_delay_ms: {}", config.retry_delay_ms),
        format!("retry_max_attempts: {}", max_attempts),
        format!("retry_backoff: {:?}", config.retry_backoff),
        format!("retry_max_delay_ms: {}", config.retry_max_delay_ms),
        format!(
            "reconnect_on_write_failure: {}",
            config.reconnect_on_write_failure
        ),
    ]
    .join("\n")
}

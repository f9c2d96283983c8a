//! message-capture: replay chat events into storage, or check config. Config from env / .env.

use std::sync::Arc;

use anyhow::{Context, Result};
use capture_cli::{describe_config, load_config, replay, Cli, Commands};
use capture_core::init_tracing;
use clap::Parser;
use handlers::{HandlerChain, LoggingHandler, PersistenceHandler};
use storage::StorageAdapter;
use tokio::io::{AsyncBufRead, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { input, log_file } => handle_replay(input, log_file).await,
        Commands::CheckConfig => {
            let config = load_config()?;
            println!("{}", describe_config(&config));
            Ok(())
        }
    }
}

/// Connects (retrying per config), replays events until EOF, then shuts storage down.
async fn handle_replay(input: Option<String>, log_file: Option<String>) -> Result<()> {
    let config = load_config()?;
    init_tracing(log_file.as_deref(), config.debug)?;

    tracing::info!(
        database_url = %config.masked_url(),
        table = %config.table_name(),
        "Connecting to storage"
    );
    let adapter = Arc::new(
        StorageAdapter::from_config(&config)
            .await
            .context("Connect to storage")?,
    );

    let chain = HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(PersistenceHandler::new(Arc::clone(&adapter))));

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match input {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Open event file {}", path))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let outcome = replay(reader, &chain).await;
    adapter.shutdown().await;
    let stats = outcome.context("Read events")?;

    println!(
        "Created: {}, Updated: {}, Skipped: {}",
        stats.created, stats.updated, stats.skipped
    );
    Ok(())
}

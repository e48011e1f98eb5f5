// src/main.rs
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::ctrl_c;

use tradecall::application::dto::{parse_input_line, InputLine};
use tradecall::application::service::TradeCallService;
use tradecall::config::{Config, StorageBackend};
use tradecall::domain::errors::AppResult;
use tradecall::domain::repository::TradeCallRepository;
use tradecall::infrastructure::storage::{
    InMemoryTradeCallRepository, JsonLinesTradeCallRepository,
};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    config.init_logging()?;

    log::info!("Starting tradecall v{}", env!("CARGO_PKG_VERSION"));

    let repository = create_repository(&config).await?;
    let service = TradeCallService::new(repository, config.report.top_symbols);

    log::info!("Reading extracted payloads from stdin, one JSON object per line");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = ctrl_c() => {
                log::info!("Interrupted, stopping");
                None
            }
        };
        let Some(line) = line else { break };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let InputLine {
            raw_payload,
            original_input,
        } = parse_input_line(line);

        println!("Extracted payload: {}", raw_payload);

        match service.process_json(&raw_payload, &original_input).await {
            Ok(processed) => {
                println!(
                    "Post validated payload: {}",
                    serde_json::to_string(&processed.validated)?
                );
                for issue in &processed.trade_call.issues {
                    println!("  - {}", issue);
                }
            }
            Err(e) => {
                log::error!("Failed to process payload: {}", e);
            }
        }
        println!();
    }

    let summary = service.summary().await?;
    println!("=== Summary ===");
    println!(
        "{} trade call(s): {} buy, {} sell",
        summary.total, summary.buys, summary.sells
    );
    println!(
        "Invalid targets: {}, invalid stoplosses: {}",
        summary.invalid_targets, summary.invalid_stoplosses
    );
    for (symbol, count) in &summary.top_symbols {
        println!("  {}: {}", symbol, count);
    }

    log::info!("Done");
    Ok(())
}

/// Create the storage backend selected in the configuration
async fn create_repository(
    config: &Config,
) -> AppResult<Arc<dyn TradeCallRepository + Send + Sync>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            log::info!("Using in-memory storage");
            Ok(Arc::new(InMemoryTradeCallRepository::new()))
        }
        StorageBackend::Jsonl => {
            log::info!("Using JSON-lines storage at {}", config.storage.path);
            let repository = JsonLinesTradeCallRepository::open(&config.storage.path).await?;
            Ok(Arc::new(repository))
        }
    }
}

// src/infrastructure/storage/jsonl.rs
// Append-only JSON-lines trade call store

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::RwLock;

use crate::domain::errors::{StorageError, StorageResult};
use crate::domain::models::{NewTradeCall, TradeCall, TradeCallPage};
use crate::domain::repository::{page_newest_first, TradeCallRepository};

/// Stores one trade call per line in a file.
///
/// Existing records are loaded on open and kept in memory; writes append to
/// the file before the in-memory copy is updated.
pub struct JsonLinesTradeCallRepository {
    path: PathBuf,
    trade_calls: RwLock<Vec<TradeCall>>,
}

impl JsonLinesTradeCallRepository {
    /// Open (or lazily create) the store at `path`
    pub async fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let trade_calls = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => parse_lines(&path, &contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(io_error(&path, e)),
        };

        log::info!(
            "Loaded {} trade call(s) from {}",
            trade_calls.len(),
            path.display()
        );

        Ok(Self {
            path,
            trade_calls: RwLock::new(trade_calls),
        })
    }
}

fn parse_lines(path: &Path, contents: &str) -> Vec<TradeCall> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match serde_json::from_str::<TradeCall>(line) {
            Ok(call) => Some(call),
            Err(e) => {
                log::warn!(
                    "Skipping malformed line {} in {}: {}",
                    index + 1,
                    path.display(),
                    e
                );
                None
            }
        })
        .collect()
}

/// True for an empty file or one whose last byte is a newline.
async fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    let len = file.metadata().await?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    Ok(last[0] == b'\n')
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[async_trait]
impl TradeCallRepository for JsonLinesTradeCallRepository {
    async fn save(&self, trade_call: NewTradeCall) -> StorageResult<TradeCall> {
        let mut trade_calls = self.trade_calls.write().await;
        let next_id = trade_calls.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let stored = TradeCall::from_new(next_id, trade_call);

        let mut line = serde_json::to_string(&stored)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| io_error(&self.path, e))?;

        // A torn earlier write must not swallow this record
        if !ends_with_newline(&mut file)
            .await
            .map_err(|e| io_error(&self.path, e))?
        {
            log::warn!("{} ends mid-line, starting a new line", self.path.display());
            line.insert(0, '\n');
        }

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| io_error(&self.path, e))?;
        file.flush().await.map_err(|e| io_error(&self.path, e))?;

        trade_calls.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self, skip: usize, limit: usize) -> StorageResult<TradeCallPage> {
        let trade_calls = self.trade_calls.read().await;
        Ok(page_newest_first(&trade_calls, skip, limit))
    }

    async fn count(&self) -> StorageResult<usize> {
        Ok(self.trade_calls.read().await.len())
    }

    async fn all(&self) -> StorageResult<Vec<TradeCall>> {
        Ok(self.trade_calls.read().await.clone())
    }
}

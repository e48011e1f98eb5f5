// src/domain/repository/mod.rs
// Repository interface for validated trade calls

use async_trait::async_trait;

use crate::domain::errors::StorageResult;
use crate::domain::models::{NewTradeCall, TradeCall, TradeCallPage};

#[async_trait]
pub trait TradeCallRepository {
    /// Store a trade call and assign it an id
    async fn save(&self, trade_call: NewTradeCall) -> StorageResult<TradeCall>;

    /// Newest trade calls first, skipping `skip` and returning at most `limit`
    async fn list(&self, skip: usize, limit: usize) -> StorageResult<TradeCallPage>;

    async fn count(&self) -> StorageResult<usize>;

    /// Every stored trade call in insertion order
    async fn all(&self) -> StorageResult<Vec<TradeCall>>;
}

/// Slice a newest-first page out of records kept in insertion order.
pub fn page_newest_first(records: &[TradeCall], skip: usize, limit: usize) -> TradeCallPage {
    let total = records.len();
    let trade_calls = records
        .iter()
        .rev()
        .skip(skip)
        .take(limit)
        .cloned()
        .collect();

    TradeCallPage {
        trade_calls,
        total,
        has_more: skip.saturating_add(limit) < total,
    }
}

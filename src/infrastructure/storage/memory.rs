// src/infrastructure/storage/memory.rs
// In-memory trade call store

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::StorageResult;
use crate::domain::models::{NewTradeCall, TradeCall, TradeCallPage};
use crate::domain::repository::{page_newest_first, TradeCallRepository};

/// Keeps trade calls for the lifetime of the process
#[derive(Default)]
pub struct InMemoryTradeCallRepository {
    trade_calls: RwLock<Vec<TradeCall>>,
}

impl InMemoryTradeCallRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TradeCallRepository for InMemoryTradeCallRepository {
    async fn save(&self, trade_call: NewTradeCall) -> StorageResult<TradeCall> {
        let mut trade_calls = self.trade_calls.write().await;
        let stored = TradeCall::from_new(trade_calls.len() as u64 + 1, trade_call);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{BoundField, TradeDirection, TradePayload};

    fn new_call(symbol: &str) -> NewTradeCall {
        NewTradeCall {
            payload: TradePayload {
                trans_type: TradeDirection::Buy,
                trading_symbol: symbol.to_string(),
                expiry_date: "".to_string(),
                price: BoundField::both(100),
                target: BoundField::from((110, 120)),
                stoploss: BoundField::from((90, 95)),
            },
            original_input: format!("Buy {} @100", symbol),
            issues: Vec::new(),
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let repo = InMemoryTradeCallRepository::new();
        let first = repo.save(new_call("SBIN")).await.unwrap();
        let second = repo.save(new_call("INFY")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn lists_newest_first_with_paging() {
        let repo = InMemoryTradeCallRepository::new();
        for symbol in ["A", "B", "C", "D", "E"] {
            repo.save(new_call(symbol)).await.unwrap();
        }

        let page = repo.list(0, 2).await.unwrap();
        let symbols: Vec<_> = page
            .trade_calls
            .iter()
            .map(|c| c.payload.trading_symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["E", "D"]);
        assert_eq!(page.total, 5);
        assert!(page.has_more);

        let page = repo.list(3, 2).await.unwrap();
        assert_eq!(page.trade_calls.len(), 2);
        assert_eq!(page.trade_calls[1].payload.trading_symbol, "A");
        assert!(!page.has_more);

        let page = repo.list(10, 2).await.unwrap();
        assert!(page.trade_calls.is_empty());
        assert!(!page.has_more);
    }
}

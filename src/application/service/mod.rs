// src/application/service/mod.rs
// Application services

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::dto::{parse_payload_json, ApplicationError, TradePayloadDto};
use crate::domain::models::{
    NewTradeCall, TradeCall, TradeCallPage, TradeDirection, TradePayload, ValidationIssue,
};
use crate::domain::repository::TradeCallRepository;
use crate::domain::validator::PayloadValidator;

/// Result of running one extraction output through the service
#[derive(Debug, Clone)]
pub struct ProcessedTradeCall {
    pub trade_call: TradeCall,
    pub validated: TradePayloadDto,
}

/// Aggregate view over stored trade calls
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradeCallSummary {
    pub total: usize,
    pub buys: usize,
    pub sells: usize,
    pub invalid_targets: usize,
    pub invalid_stoplosses: usize,
    /// Most frequent symbols with their counts
    pub top_symbols: Vec<(String, usize)>,
}

/// Decodes, validates and stores trade calls
pub struct TradeCallService {
    repository: Arc<dyn TradeCallRepository + Send + Sync>,
    validator: PayloadValidator,
    top_symbols: usize,
}

impl TradeCallService {
    pub fn new(repository: Arc<dyn TradeCallRepository + Send + Sync>, top_symbols: usize) -> Self {
        Self {
            repository,
            validator: PayloadValidator::new(),
            top_symbols,
        }
    }

    /// Process raw extraction output for `original_input`
    pub async fn process_json(
        &self,
        raw: &str,
        original_input: &str,
    ) -> Result<ProcessedTradeCall, ApplicationError> {
        let dto = parse_payload_json(raw)?;
        let decoded = dto.decode()?;
        self.process_payload(decoded.payload, decoded.missing, original_input)
            .await
    }

    /// Validate an already decoded payload and store it
    pub async fn process_payload(
        &self,
        payload: TradePayload,
        missing: Vec<ValidationIssue>,
        original_input: &str,
    ) -> Result<ProcessedTradeCall, ApplicationError> {
        let report = self.validator.validate_with_report(payload);

        let mut issues = missing;
        issues.extend(report.issues);

        let trade_call = self
            .repository
            .save(NewTradeCall {
                payload: report.payload,
                original_input: original_input.to_string(),
                issues,
            })
            .await?;

        log::info!(
            "Stored trade call #{}: {} {} ({} issue(s))",
            trade_call.id,
            trade_call.payload.trans_type,
            trade_call.payload.trading_symbol,
            trade_call.issues.len()
        );

        let validated = TradePayloadDto::from(&trade_call.payload);
        Ok(ProcessedTradeCall {
            trade_call,
            validated,
        })
    }

    /// Stored trade calls, newest first
    pub async fn recent(&self, skip: usize, limit: usize) -> Result<TradeCallPage, ApplicationError> {
        Ok(self.repository.list(skip, limit).await?)
    }

    pub async fn summary(&self) -> Result<TradeCallSummary, ApplicationError> {
        let trade_calls = self.repository.all().await?;
        Ok(summarize(&trade_calls, self.top_symbols))
    }
}

fn summarize(trade_calls: &[TradeCall], top_n: usize) -> TradeCallSummary {
    let mut summary = TradeCallSummary {
        total: trade_calls.len(),
        ..Default::default()
    };
    let mut symbols: HashMap<&str, usize> = HashMap::new();

    for call in trade_calls {
        let payload = &call.payload;
        match payload.trans_type {
            TradeDirection::Buy => summary.buys += 1,
            TradeDirection::Sell => summary.sells += 1,
        }
        if payload.target.is_invalid() {
            summary.invalid_targets += 1;
        }
        if payload.stoploss.is_invalid() {
            summary.invalid_stoplosses += 1;
        }
        *symbols.entry(payload.trading_symbol.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = symbols
        .into_iter()
        .map(|(symbol, count)| (symbol.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top_n);
    summary.top_symbols = ranked;

    summary
}

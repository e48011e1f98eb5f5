// src/application/mod.rs
pub mod dto;
pub mod service;

pub use dto::{ApplicationError, DecodedPayload, TradePayloadDto};
pub use service::{ProcessedTradeCall, TradeCallService, TradeCallSummary};

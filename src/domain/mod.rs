// src/domain/mod.rs
pub mod errors;
pub mod models;
pub mod repository;
pub mod validator;

// Re-export common types for convenience
pub use errors::{AppError, AppResult, StorageError, StorageResult};
pub use models::{
    Bound, BoundField, BoundKind, NewTradeCall, TradeCall, TradeCallPage, TradeDirection,
    TradePayload, ValidationIssue, ValidationReport, INVALID_INPUT,
};
pub use repository::TradeCallRepository;
pub use validator::{direction_allows, PayloadValidator};

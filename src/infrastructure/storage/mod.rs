// src/infrastructure/storage/mod.rs
// Trade call storage backends

mod jsonl;
mod memory;

pub use jsonl::JsonLinesTradeCallRepository;
pub use memory::InMemoryTradeCallRepository;

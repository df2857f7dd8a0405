//! market-bot - Core Library
//! Simulated market maker over an in-memory, single-writer balance ledger

// Public modules
pub mod core;
pub mod orderbook;
pub mod feeds;
pub mod strategies;
pub mod execution;
pub mod bot;
pub mod scheduler;
pub mod server;

// Re-exports
pub use crate::core::{Config, Error, Result};
pub use bot::{CycleReport, MarketBot};

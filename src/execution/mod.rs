//! Execution layer - fill decisions and the serialized balance ledger

pub mod engine;
pub mod ledger;

pub use engine::{BatchReport, ExecutionEngine, is_eligible};
pub use ledger::{BalanceLedger, LedgerCommand, PendingFill};

//! Execution engine - fill decisions for generated candidates

use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use super::ledger::{BalanceLedger, PendingFill};
use crate::core::{CandidateOrder, FillOutcome, PricePair, Side};

/// Threshold rule, strict on both sides: asks fill below the reference
/// ask, bids fill above the reference bid.
pub fn is_eligible(order: &CandidateOrder, reference: Decimal) -> bool {
    match order.side {
        Side::Ask => order.price < reference,
        Side::Bid => order.price > reference,
    }
}

/// Per-batch counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub placed: usize,
    pub eligible: usize,
    pub filled: usize,
}

/// Decides fill/no-fill and forwards eligible candidates to the ledger
#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    ledger: BalanceLedger,
}

impl ExecutionEngine {
    pub fn new(ledger: BalanceLedger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    /// Log the placement and queue the fill if the threshold rule allows it.
    fn place(&self, order: CandidateOrder, reference: Decimal) -> Option<PendingFill> {
        info!("PLACE {}", order);

        if !is_eligible(&order, reference) {
            debug!("Not eligible: {} vs reference {}", order, reference);
            return None;
        }
        Some(self.ledger.enqueue_fill(order))
    }

    /// Place one candidate and, if eligible, fill it through the ledger.
    pub async fn try_fill(&self, order: CandidateOrder, reference: Decimal) -> FillOutcome {
        let filled = match self.place(order, reference) {
            Some(pending) => pending.outcome().await,
            None => false,
        };
        if filled { FillOutcome::Filled } else { FillOutcome::NotFilled }
    }

    /// Place the whole batch, then await all verdicts together. Eligible
    /// candidates are queued in batch order, which is the order the ledger
    /// applies them in.
    pub async fn execute_batch(&self, orders: &[CandidateOrder], prices: &PricePair) -> BatchReport {
        let pending: Vec<PendingFill> = orders
            .iter()
            .filter_map(|o| self.place(*o, prices.reference(o.side)))
            .collect();
        let eligible = pending.len();

        let verdicts = join_all(pending.into_iter().map(PendingFill::outcome)).await;

        BatchReport {
            placed: orders.len(),
            eligible,
            filled: verdicts.into_iter().filter(|filled| *filled).count(),
        }
    }
}

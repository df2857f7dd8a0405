//! Core traits - seams for market data and randomness

use async_trait::async_trait;
use crate::core::{Result, types::*};

/// Market data source - supplies raw order-book snapshots on demand
#[async_trait]
pub trait MarketObserver: Send + Sync {
    /// Fetch the current order book as provider-ordered rows
    async fn fetch_snapshot(&self) -> Result<Vec<OrderBookEntry>>;

    /// Source name, used in logs
    fn name(&self) -> &str;
}

/// Source of randomness for order generation.
///
/// Any `rand::Rng` qualifies, so tests can hand in a seeded `StdRng`
/// while production draws from an entropy-seeded one.
pub trait RandomSource {
    /// Uniform integer in `[low, high]`, both inclusive
    fn int_inclusive(&mut self, low: i64, high: i64) -> i64;

    /// Uniform float in `[0, 1)`
    fn unit(&mut self) -> f64;
}

impl<R: rand::Rng> RandomSource for R {
    fn int_inclusive(&mut self, low: i64, high: i64) -> i64 {
        self.gen_range(low..=high)
    }

    fn unit(&mut self) -> f64 {
        self.r#gen::<f64>()
    }
}

//! Randomized quote generator around the cycle's reference prices

use rust_decimal::prelude::*;
use crate::core::{CandidateOrder, Error, PricePair, RandomSource, Result};
use crate::core::config::GeneratorConfig;

/// Sizes are truncated to this many decimal places
const SIZE_SCALE: u32 = 8;

/// Largest whole part of a generated size
const MAX_WHOLE_SIZE: i64 = 10;

/// Generator parameters
#[derive(Debug, Clone)]
pub struct GeneratorParams {
    /// Iterations per batch; each emits one ask and one bid
    pub rounds: usize,
    /// Band half-width as a fraction (e.g., 0.05 = ±5%)
    pub band_pct: Decimal,
}

impl GeneratorParams {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            rounds: config.rounds,
            band_pct: config.band_pct,
        }
    }
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

/// Inclusive integer tick range inside `reference ± band`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickBand {
    pub low: i64,
    pub high: i64,
}

impl TickBand {
    /// Whole-number ticks within the band. When the band is narrower than one
    /// tick, it collapses to the reference rounded to the nearest tick.
    pub fn around(reference: Decimal, band_pct: Decimal) -> Result<Self> {
        let out_of_range = || Error::malformed(format!("reference price out of range: {}", reference));

        let offset = reference.checked_mul(band_pct).ok_or_else(out_of_range)?;
        let lower = reference.checked_sub(offset).ok_or_else(out_of_range)?;
        let upper = reference.checked_add(offset).ok_or_else(out_of_range)?;

        let to_tick = |d: Decimal| d.to_i64().ok_or_else(out_of_range);

        let low = to_tick(lower.ceil())?;
        let high = to_tick(upper.floor())?;
        if low > high {
            let tick = to_tick(reference.round())?;
            return Ok(Self { low: tick, high: tick });
        }
        Ok(Self { low, high })
    }

    #[cfg(test)]
    fn contains(&self, price: Decimal) -> bool {
        price >= Decimal::from(self.low) && price <= Decimal::from(self.high)
    }
}

/// Produces the per-cycle batch of candidate orders.
///
/// Stateless apart from its parameters; randomness comes from the caller.
#[derive(Debug, Clone, Default)]
pub struct OrderGenerator {
    params: GeneratorParams,
}

impl OrderGenerator {
    pub fn new(params: GeneratorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Candidates per batch
    pub fn batch_size(&self) -> usize {
        self.params.rounds * 2
    }

    /// One ask and one bid per round, in insertion order.
    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        prices: &PricePair,
        rng: &mut R,
    ) -> Result<Vec<CandidateOrder>> {
        let ask_band = TickBand::around(prices.ask_price, self.params.band_pct)?;
        let bid_band = TickBand::around(prices.bid_price, self.params.band_pct)?;

        let mut orders = Vec::with_capacity(self.batch_size());
        for _ in 0..self.params.rounds {
            let ask_price = Decimal::from(rng.int_inclusive(ask_band.low, ask_band.high));
            let bid_price = Decimal::from(rng.int_inclusive(bid_band.low, bid_band.high));
            let ask_size = random_size(rng);
            let bid_size = random_size(rng);

            orders.push(CandidateOrder::ask(ask_price, ask_size));
            orders.push(CandidateOrder::bid(bid_price, bid_size));
        }
        Ok(orders)
    }
}

/// Whole part in `[0, 10]` plus a fraction in `[0, 1)`, truncated to 8 places.
fn random_size<R: RandomSource + ?Sized>(rng: &mut R) -> Decimal {
    let whole = Decimal::from(rng.int_inclusive(0, MAX_WHOLE_SIZE));
    let fraction = Decimal::from_f64(rng.unit()).unwrap_or(Decimal::ZERO);
    (whole + fraction).round_dp_with_strategy(SIZE_SCALE, RoundingStrategy::ToZero)
}

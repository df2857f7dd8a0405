//! One observation cycle: snapshot → prices → candidates → fills.

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::{MarketObserver, PricePair, Result};
use crate::execution::{BalanceLedger, BatchReport, ExecutionEngine};
use crate::orderbook::find_best_prices;
use crate::strategies::OrderGenerator;

/// Outcome of a completed cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub prices: PricePair,
    pub batch: BatchReport,
}

/// The market-making pipeline shared by every trigger.
///
/// Price discovery and generation are pure per cycle, so concurrent cycles
/// only meet at the ledger queue.
pub struct MarketBot {
    observer: Arc<dyn MarketObserver>,
    generator: OrderGenerator,
    engine: ExecutionEngine,
    rng: Mutex<StdRng>,
}

impl MarketBot {
    pub fn new(observer: Arc<dyn MarketObserver>, generator: OrderGenerator, ledger: BalanceLedger) -> Self {
        Self {
            observer,
            generator,
            engine: ExecutionEngine::new(ledger),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replace the entropy-seeded generator, e.g. with a seeded one.
    pub fn with_rng(self, rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            ..self
        }
    }

    pub fn ledger(&self) -> &BalanceLedger {
        self.engine.ledger()
    }

    /// Run one full cycle. Fetch or price-discovery failures abort the cycle
    /// before any candidate reaches the ledger.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let book = self.observer.fetch_snapshot().await?;
        let prices = find_best_prices(&book)?;
        debug!(
            "{}: ask reference {}, bid reference {}",
            self.observer.name(),
            prices.ask_price,
            prices.bid_price
        );

        let orders = {
            let mut rng = self.rng.lock();
            self.generator.generate(&prices, &mut *rng)?
        };

        let batch = self.engine.execute_batch(&orders, &prices).await;
        info!(
            "Cycle done: {} placed, {} eligible, {} filled",
            batch.placed, batch.eligible, batch.filled
        );

        Ok(CycleReport { prices, batch })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::{Balance, Error, OrderBookEntry};
    use async_trait::async_trait;
    use futures::future::join_all;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a fixed book, or fails when `book` is `None`
    pub(crate) struct StubObserver {
        pub book: Option<Vec<OrderBookEntry>>,
        pub calls: AtomicUsize,
    }

    impl StubObserver {
        pub(crate) fn with_book(book: Vec<OrderBookEntry>) -> Self {
            Self { book: Some(book), calls: AtomicUsize::new(0) }
        }

        pub(crate) fn failing() -> Self {
            Self { book: None, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl MarketObserver for StubObserver {
        async fn fetch_snapshot(&self) -> Result<Vec<OrderBookEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.book
                .clone()
                .ok_or_else(|| Error::malformed("stub feed has no book"))
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    pub(crate) fn sample_book() -> Vec<OrderBookEntry> {
        vec![
            OrderBookEntry::new(58910327161, dec!(1840.2), dec!(4.47517146)),
            OrderBookEntry::new(58910538839, dec!(1840.2), dec!(0.32713445)),
            OrderBookEntry::new(58909997570, dec!(1840.1), dec!(2)),
            OrderBookEntry::new(58910536916, dec!(1840.5), dec!(-3.24489485)),
            OrderBookEntry::new(58910536918, dec!(1840.6), dec!(-10.86937)),
        ]
    }

    fn bot(observer: StubObserver, seed: u64) -> MarketBot {
        MarketBot::new(
            Arc::new(observer),
            OrderGenerator::default(),
            BalanceLedger::spawn(Balance::default()),
        )
        .with_rng(StdRng::seed_from_u64(seed))
    }

    #[tokio::test]
    async fn test_cycle_report() {
        let bot = bot(StubObserver::with_book(sample_book()), 3);
        let report = bot.run_cycle().await.unwrap();

        assert_eq!(report.prices.ask_price, dec!(1840.2));
        assert_eq!(report.prices.bid_price, dec!(1840.5));
        assert_eq!(report.batch.placed, 10);
        assert!(report.batch.filled <= report.batch.eligible);
        assert!(bot.ledger().snapshot().await.unwrap().is_solvent());
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_balance() {
        let bot = bot(StubObserver::failing(), 0);
        let err = bot.run_cycle().await.unwrap_err();
        assert!(matches!(err, Error::MalformedBook(_)));
        assert_eq!(bot.ledger().snapshot().await.unwrap(), Balance::default());
    }

    #[tokio::test]
    async fn test_book_without_bids_aborts() {
        let book = vec![OrderBookEntry::new(1, dec!(1840), dec!(1))];
        let bot = bot(StubObserver::with_book(book), 0);
        assert!(matches!(bot.run_cycle().await, Err(Error::MalformedBook(_))));
        assert_eq!(bot.ledger().snapshot().await.unwrap(), Balance::default());
    }

    #[tokio::test]
    async fn test_negative_bid_reference_aborts_cycle() {
        let book = vec![
            OrderBookEntry::new(1, dec!(10), dec!(1)),
            OrderBookEntry::new(2, dec!(-3000.4), dec!(-1)),
        ];
        let bot = bot(StubObserver::with_book(book), 0);
        assert!(matches!(bot.run_cycle().await, Err(Error::MalformedBook(_))));
        assert_eq!(bot.ledger().snapshot().await.unwrap(), Balance::default());
    }

    #[tokio::test]
    async fn test_out_of_range_reference_aborts_cycle() {
        let book = vec![
            OrderBookEntry::new(1, dec!(79228162514264337593543950000), dec!(1)),
            OrderBookEntry::new(2, dec!(1840.5), dec!(-1)),
        ];
        let bot = bot(StubObserver::with_book(book), 0);
        assert!(matches!(bot.run_cycle().await, Err(Error::MalformedBook(_))));
        assert_eq!(bot.ledger().snapshot().await.unwrap(), Balance::default());
    }

    #[tokio::test]
    async fn test_overlapping_cycles_stay_solvent() {
        for seed in 0..25 {
            let bot = bot(StubObserver::with_book(sample_book()), seed);
            let reports = join_all((0..4).map(|_| bot.run_cycle())).await;

            for report in reports {
                assert_eq!(report.unwrap().batch.placed, 10);
            }
            assert!(bot.ledger().snapshot().await.unwrap().is_solvent(), "seed {}", seed);
        }
    }
}

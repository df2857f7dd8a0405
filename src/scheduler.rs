//! Interval triggers: the order cycle timer and the balance reporter.
//!
//! Both fire first after one full period. Each cycle tick runs on its own
//! task, so a slow fetch never delays the next tick; overlapping cycles meet
//! only at the ledger queue.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{info, warn};

use crate::bot::MarketBot;
use crate::execution::BalanceLedger;

/// Run a full cycle every `period`.
pub fn spawn_cycle_timer(bot: Arc<MarketBot>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let bot = Arc::clone(&bot);
            tokio::spawn(async move {
                match bot.run_cycle().await {
                    Ok(_) => info!("---"),
                    Err(e) => warn!("Timer cycle failed: {}", e),
                }
            });
        }
    })
}

/// Log a consistent balance snapshot every `period`.
pub fn spawn_balance_reporter(ledger: BalanceLedger, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = ledger.report().await {
                warn!("Balance report failed: {}", e);
                break;
            }
        }
    })
}

use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use market_bot::core::Config;
use market_bot::execution::BalanceLedger;
use market_bot::feeds::RestOrderBookFeed;
use market_bot::strategies::{GeneratorParams, OrderGenerator};
use market_bot::{MarketBot, scheduler, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // 1. Logger
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,market_bot=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    tracing::info!("Starting bot...");

    // 2. Config
    let config = match Config::load_default() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    // 3. Ledger task + pipeline
    let feed = Arc::new(RestOrderBookFeed::from_config(&config.feed)?);
    tracing::info!("📡 Order book feed: {}", feed.url());

    let ledger = BalanceLedger::spawn(config.ledger.initial_balance());
    let generator = OrderGenerator::new(GeneratorParams::from_config(&config.generator));
    let bot = Arc::new(MarketBot::new(feed, generator, ledger.clone()));

    // 4. Triggers
    let cycles = scheduler::spawn_cycle_timer(Arc::clone(&bot), config.schedule.cycle_interval());
    let reports = scheduler::spawn_balance_reporter(ledger.clone(), config.schedule.report_interval());

    let router = server::create_router(Arc::clone(&bot), &config.server.trigger_path);
    server::serve(&config.server.listen_addr, router, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("🛑 Shutting down...");
    })
    .await?;

    cycles.abort();
    reports.abort();
    ledger.report().await?;

    Ok(())
}

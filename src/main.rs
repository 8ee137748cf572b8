//! smartpark front-desk entry point.
//!
//! Restores the lot from the data directory, prints today's report and the
//! revenue dashboard, and optionally runs the live fee monitor until
//! Ctrl-C.

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use smartpark::config::DeskConfig;
use smartpark::domain::{Clock, EventBus, SystemClock};
use smartpark::monitor::run_live_monitor;
use smartpark::persistence::{FileStore, PersistenceAdapter};
use smartpark::service::SessionEngine;
use smartpark::views::local_day;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DeskConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(
        data_dir = %config.data_dir.display(),
        rate = config.hourly_rate,
        currency = %config.currency,
        retention = ?config.payment_retention,
        "starting smartpark"
    );

    // Restore state
    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("cannot open data dir {}", config.data_dir.display()))?;
    let engine = SessionEngine::restore(
        PersistenceAdapter::new(store),
        config.seed_slots,
        config.engine_settings(),
        EventBus::new(config.event_bus_capacity),
    );
    tracing::info!(
        slots = engine.slots().len(),
        vehicles = engine.vehicles().len(),
        sessions = engine.sessions().len(),
        payments = engine.payments().len(),
        "state restored"
    );

    // Print the desk summary
    let clock = SystemClock;
    let now = clock.now();
    let today = local_day(now, &config.utc_offset);
    println!("{}", engine.daily_report(today, config.utc_offset, now));
    let summary = engine.revenue_summary(today, &config.utc_offset, config.top_slots);
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("cannot render revenue summary")?
    );

    if config.live_refresh_secs > 0 {
        let period = Duration::from_secs(config.live_refresh_secs);
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "cannot listen for ctrl-c");
            }
        };
        let ticks = run_live_monitor(&engine, &clock, period, shutdown).await;
        tracing::info!(ticks, "shutting down");
    }

    Ok(())
}

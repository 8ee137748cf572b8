//! Live fee monitor.
//!
//! Periodically recomputes the running fee of every active session and
//! logs it, the terminal equivalent of the front desk's live fee column.

use std::future::Future;
use std::time::Duration;

use crate::domain::Clock;
use crate::service::SessionEngine;

/// Logs live fees every `period` until `shutdown` resolves.
///
/// The first refresh happens immediately. Returns the number of refreshes
/// performed.
pub async fn run_live_monitor<F>(
    engine: &SessionEngine,
    clock: &dyn Clock,
    period: Duration,
    shutdown: F,
) -> u64
where
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    tokio::pin!(shutdown);
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => break,
            _ = ticker.tick() => {
                ticks += 1;
                refresh(engine, clock);
            }
        }
    }

    tracing::debug!(ticks, "live monitor stopped");
    ticks
}

fn refresh(engine: &SessionEngine, clock: &dyn Clock) {
    let fees = engine.live_fees(clock.now());
    let currency = &engine.settings().billing.currency;
    if fees.is_empty() {
        tracing::info!("no vehicles parked");
        return;
    }
    for fee in &fees {
        tracing::info!(
            plate = %fee.plate_number,
            slot = %fee.slot_number,
            elapsed = %fee.elapsed_label,
            hours = fee.quote.billable_hours,
            amount = fee.quote.amount,
            %currency,
            "live fee"
        );
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{EventBus, SystemClock};
    use crate::service::EngineSettings;

    fn engine() -> SessionEngine {
        SessionEngine::new(EngineSettings::default(), EventBus::new(4))
    }

    #[tokio::test]
    async fn stops_immediately_when_shutdown_is_ready() {
        let ticks = run_live_monitor(
            &engine(),
            &SystemClock,
            Duration::from_millis(5),
            std::future::ready(()),
        )
        .await;
        assert_eq!(ticks, 0);
    }

    #[tokio::test]
    async fn refreshes_until_shutdown() {
        let mut engine = engine();
        let _ = engine.register_vehicle("RAC123A", "Jane", None);
        let Ok(slot) = engine.add_slot("P-01") else {
            panic!("slot creation failed");
        };
        let _ = engine.start_session("RAC123A", &slot.id, chrono::Utc::now());

        let ticks = run_live_monitor(
            &engine,
            &SystemClock,
            Duration::from_millis(5),
            tokio::time::sleep(Duration::from_millis(40)),
        )
        .await;
        assert!(ticks >= 1);
    }
}

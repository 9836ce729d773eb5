//! Background worker that runs the expiry sweep on a fixed cadence.
//!
//! Each pass asks the store for its clock, revokes every public share that
//! expired before it, and logs the outcome. A failed pass is logged and the
//! next one runs on schedule; the sweep is idempotent, so nothing is lost.

use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::domain::repository::{IdentityGateway, StoreGateway};
use crate::usecase::sweeper::ExpirySweeper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepWorkerConfig {
    pub enabled: bool,
    pub interval: Duration,
}

/// Starts the expiry sweep loop. Runs until the task is cancelled; returns
/// immediately when disabled.
pub async fn start_expiry_sweep_worker<S, I>(sweeper: ExpirySweeper<S, I>, config: SweepWorkerConfig)
where
    S: StoreGateway,
    I: IdentityGateway,
{
    if !config.enabled {
        tracing::info!("expiry sweep worker disabled by configuration");
        return;
    }

    tracing::info!(
        interval_secs = config.interval.as_secs(),
        "starting expiry sweep worker"
    );

    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match sweeper.run_sweep().await {
            Ok(report) if report.updated_count > 0 => {
                tracing::info!(
                    updated_count = report.updated_count,
                    swept_at = %report.swept_at,
                    "expiry sweep run complete"
                );
            }
            Ok(_) => tracing::debug!("expiry sweep run complete, nothing expired"),
            Err(e) => {
                tracing::error!(error = %e, retryable = e.is_retryable(), "expiry sweep run failed");
            }
        }
    }
}

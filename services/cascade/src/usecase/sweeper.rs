use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::repository::{IdentityGateway, StoreGateway};
use crate::error::CascadeServiceError;
use crate::usecase::executor::CascadeExecutor;
use crate::usecase::planner::CascadePlanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub updated_count: usize,
    /// Store clock reading the sweep compared expiries against.
    pub swept_at: DateTime<Utc>,
}

/// Returns expired public shares to private.
pub struct ExpirySweeper<S: StoreGateway, I: IdentityGateway> {
    pub planner: CascadePlanner<S>,
    pub executor: CascadeExecutor<S, I>,
}

impl<S: StoreGateway, I: IdentityGateway> ExpirySweeper<S, I> {
    pub async fn run_sweep(&self) -> Result<SweepReport, CascadeServiceError> {
        let now = self
            .planner
            .store
            .server_now()
            .await
            .map_err(CascadeServiceError::Planner)?;
        let plan = self.planner.build_expiry_sweep_plan(now).await?;
        let outcome = self.executor.execute(&plan).await?;

        info!(
            updated_count = outcome.applied,
            planned = plan.len(),
            swept_at = %now,
            "expiry sweep finished"
        );
        Ok(SweepReport {
            updated_count: outcome.applied,
            swept_at: now,
        })
    }
}

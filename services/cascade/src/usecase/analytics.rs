use anyhow::Context as _;
use chrono::{DateTime, Duration, Utc};

use fitfusion_domain::id::OwnerId;

use crate::domain::repository::StoreGateway;
use crate::domain::types::{Collection, Filter, RoutineRecord, fields};
use crate::error::CascadeServiceError;
use crate::usecase::guard::PermissionGuard;

const RECENT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerAnalytics {
    pub client_count: usize,
    pub routine_count: usize,
    pub public_routine_count: usize,
    pub private_routine_count: usize,
    /// Routines created within the last 30 days.
    pub recent_routines: usize,
    pub generated_at: DateTime<Utc>,
}

pub struct TrainerAnalyticsUseCase<S: StoreGateway> {
    pub guard: PermissionGuard<S>,
    pub store: S,
}

impl<S: StoreGateway> TrainerAnalyticsUseCase<S> {
    pub async fn execute(
        &self,
        caller: Option<&OwnerId>,
    ) -> Result<TrainerAnalytics, CascadeServiceError> {
        let trainer = self.guard.authorize_trainer(caller).await?.into_result()?;

        let clients = self
            .store
            .query_where(
                Collection::Clients,
                &[Filter::eq(fields::TRAINER_ID, trainer.as_str())],
            )
            .await
            .context("scan trainer clients")?;
        let routines = self
            .store
            .query_where(
                Collection::Routines,
                &[Filter::eq(fields::TRAINER_ID, trainer.as_str())],
            )
            .await
            .context("scan trainer routines")?;
        let now = self.store.server_now().await.context("read store clock")?;

        let since = now - Duration::days(RECENT_WINDOW_DAYS);
        let routines: Vec<RoutineRecord> = routines.iter().map(RoutineRecord::from_document).collect();
        let public_routine_count = routines.iter().filter(|r| r.is_public).count();

        Ok(TrainerAnalytics {
            client_count: clients.len(),
            routine_count: routines.len(),
            public_routine_count,
            private_routine_count: routines.len() - public_routine_count,
            recent_routines: routines
                .iter()
                .filter(|r| r.created_at.is_some_and(|t| t > since))
                .count(),
            generated_at: now,
        })
    }
}

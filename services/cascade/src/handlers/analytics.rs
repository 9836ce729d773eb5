use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use fitfusion_auth_types::CallerIdentity;

use crate::domain::repository::{IdentityGateway, StoreGateway};
use crate::error::CascadeServiceError;
use crate::state::AppState;

// ── GET /trainers/@me/analytics ──────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerAnalyticsResponse {
    pub client_count: usize,
    pub routine_count: usize,
    pub public_routine_count: usize,
    pub private_routine_count: usize,
    pub recent_routines: usize,
    #[serde(serialize_with = "fitfusion_core::serde::to_rfc3339_ms")]
    pub generated_at: DateTime<Utc>,
}

pub async fn get_trainer_analytics<S: StoreGateway, I: IdentityGateway>(
    identity: CallerIdentity,
    State(state): State<AppState<S, I>>,
) -> Result<Json<TrainerAnalyticsResponse>, CascadeServiceError> {
    let report = state
        .trainer_analytics()
        .execute(identity.user_id())
        .await?;
    Ok(Json(TrainerAnalyticsResponse {
        client_count: report.client_count,
        routine_count: report.routine_count,
        public_routine_count: report.public_routine_count,
        private_routine_count: report.private_routine_count,
        recent_routines: report.recent_routines,
        generated_at: report.generated_at,
    }))
}

use axum::{Json, extract::State, http::StatusCode};

use fitfusion_core::health::HealthStatus;

use crate::domain::repository::{IdentityGateway, StoreGateway};
use crate::state::AppState;

/// Handler for `GET /healthz`: liveness.
pub async fn healthz() -> Json<HealthStatus> {
    Json(HealthStatus::healthy(env!("CARGO_PKG_VERSION")))
}

/// Handler for `GET /readyz`: ready once the document store answers.
pub async fn readyz<S: StoreGateway, I: IdentityGateway>(
    State(state): State<AppState<S, I>>,
) -> StatusCode {
    match state.store.server_now().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

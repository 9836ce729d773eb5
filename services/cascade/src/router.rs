use axum::{
    Router,
    routing::{get, post},
};

use fitfusion_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::domain::repository::{IdentityGateway, StoreGateway};
use crate::handlers::{
    analytics::get_trainer_analytics,
    client::delete_client,
    health::{healthz, readyz},
};
use crate::state::AppState;

pub fn build_router<S: StoreGateway, I: IdentityGateway>(state: AppState<S, I>) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz::<S, I>))
        // Clients
        .route("/clients/delete", post(delete_client::<S, I>))
        // Trainers
        .route("/trainers/@me/analytics", get(get_trainer_analytics::<S, I>))
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}

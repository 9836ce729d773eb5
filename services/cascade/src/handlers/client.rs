use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use fitfusion_auth_types::CallerIdentity;

use crate::domain::repository::{IdentityGateway, StoreGateway};
use crate::error::CascadeServiceError;
use crate::state::AppState;
use crate::usecase::cascade::DeleteClientInput;

// ── POST /clients/delete ─────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteClientRequest {
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteClientResponse {
    pub success: bool,
    pub message: &'static str,
    pub identity_deleted: bool,
}

pub async fn delete_client<S: StoreGateway, I: IdentityGateway>(
    identity: CallerIdentity,
    State(state): State<AppState<S, I>>,
    body: Result<Json<DeleteClientRequest>, JsonRejection>,
) -> Result<Json<DeleteClientResponse>, CascadeServiceError> {
    // An unreadable body counts as a missing `clientId`; the use case still
    // checks authentication first.
    let target_client_id = match body {
        Ok(Json(body)) => body.client_id,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "rejected delete client body");
            None
        }
    };
    let output = state
        .delete_client()
        .execute(DeleteClientInput {
            caller_id: identity.0,
            target_client_id,
        })
        .await?;
    Ok(Json(DeleteClientResponse {
        success: output.success,
        message: output.message,
        identity_deleted: output.identity_deleted,
    }))
}

use tracing::{debug, info};

use fitfusion_domain::id::OwnerId;
use fitfusion_domain::owner::OwnerRole;

use crate::domain::plan::DeletionScope;
use crate::domain::repository::{IdentityGateway, StoreGateway};
use crate::domain::types::{Fields, OwnerRecord};
use crate::error::CascadeServiceError;
use crate::usecase::executor::{CascadeExecutor, ExecutionOutcome};
use crate::usecase::guard::PermissionGuard;
use crate::usecase::planner::CascadePlanner;

// ── OwnerDeleted ─────────────────────────────────────────────────────────────

/// An owner record was removed from `users`. `prior_fields` is the document
/// as it was before deletion.
pub struct OwnerDeletedEvent {
    pub owner_id: OwnerId,
    pub prior_fields: Fields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeOutcome {
    /// The deleted owner was not a client; nothing depends on it.
    Skipped,
    Completed(ExecutionOutcome),
}

pub struct OwnerDeletedUseCase<S: StoreGateway, I: IdentityGateway> {
    pub planner: CascadePlanner<S>,
    pub executor: CascadeExecutor<S, I>,
}

impl<S: StoreGateway, I: IdentityGateway> OwnerDeletedUseCase<S, I> {
    pub async fn execute(
        &self,
        event: OwnerDeletedEvent,
    ) -> Result<CascadeOutcome, CascadeServiceError> {
        let role = OwnerRecord::from_fields(&event.prior_fields).role;
        if role != Some(OwnerRole::Client) {
            debug!(owner_id = %event.owner_id, ?role, "owner is not a client, skipping cascade");
            return Ok(CascadeOutcome::Skipped);
        }
        let plan = self
            .planner
            .build_deletion_plan(&event.owner_id, DeletionScope::OwnerRemoved)
            .await?;
        let outcome = self.executor.execute(&plan).await?;
        Ok(CascadeOutcome::Completed(outcome))
    }
}

// ── DeleteClient ─────────────────────────────────────────────────────────────

pub struct DeleteClientInput {
    pub caller_id: Option<OwnerId>,
    pub target_client_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteClientOutput {
    pub success: bool,
    pub message: &'static str,
    pub identity_deleted: bool,
}

pub struct DeleteClientUseCase<S: StoreGateway, I: IdentityGateway> {
    pub guard: PermissionGuard<S>,
    pub planner: CascadePlanner<S>,
    pub executor: CascadeExecutor<S, I>,
}

impl<S: StoreGateway, I: IdentityGateway> DeleteClientUseCase<S, I> {
    pub async fn execute(
        &self,
        input: DeleteClientInput,
    ) -> Result<DeleteClientOutput, CascadeServiceError> {
        let Some(caller_id) = input.caller_id else {
            return Err(CascadeServiceError::AuthenticationRequired);
        };
        let target = input
            .target_client_id
            .and_then(|id| OwnerId::new(id).ok())
            .ok_or(CascadeServiceError::InvalidArgument("clientId"))?;

        let caller = self
            .guard
            .authorize_client_deletion(Some(&caller_id), &target)
            .await?
            .into_result()?;

        let plan = self
            .planner
            .build_deletion_plan(&target, DeletionScope::IncludeOwnerRecord)
            .await?;
        let outcome = self.executor.execute(&plan).await?;

        info!(
            caller = %caller,
            client_id = %target,
            ops = plan.len(),
            identity_deleted = outcome.identity_deleted(),
            "client deleted"
        );
        Ok(DeleteClientOutput {
            success: true,
            message: "Client successfully deleted",
            identity_deleted: outcome.identity_deleted(),
        })
    }
}

use tonic::{Request, Response, Status};

use fitfusion_core::serde::format_rfc3339_ms;
use fitfusion_domain::id::OwnerId;
use fitfusion_proto::cascade::{
    CascadeOutcome as PbCascadeOutcome, Empty, OwnerDeletedEvent as PbOwnerDeletedEvent,
    SweepReport as PbSweepReport, cascade_service_server::CascadeService,
};

use crate::domain::repository::{IdentityGateway, StoreGateway};
use crate::domain::types::{FieldValue, Fields, fields};
use crate::error::CascadeServiceError;
use crate::state::AppState;
use crate::usecase::cascade::{CascadeOutcome, OwnerDeletedEvent};

#[derive(Clone)]
pub struct CascadeGrpcServer<S: StoreGateway, I: IdentityGateway> {
    pub state: AppState<S, I>,
}

#[tonic::async_trait]
impl<S: StoreGateway, I: IdentityGateway> CascadeService for CascadeGrpcServer<S, I> {
    async fn owner_deleted(
        &self,
        request: Request<PbOwnerDeletedEvent>,
    ) -> Result<Response<PbCascadeOutcome>, Status> {
        let req = request.into_inner();
        let owner_id = OwnerId::new(req.owner_id)
            .map_err(|_| Status::invalid_argument("owner_id is required"))?;

        let mut prior_fields = Fields::new();
        if !req.role.is_empty() {
            prior_fields.insert(fields::ROLE.to_owned(), FieldValue::String(req.role));
        }

        let outcome = self
            .state
            .owner_deleted()
            .execute(OwnerDeletedEvent {
                owner_id: owner_id.clone(),
                prior_fields,
            })
            .await
            .map_err(|e| {
                tracing::error!(owner_id = %owner_id, error = ?e, "owner deletion cascade failed");
                to_status(e)
            })?;

        Ok(Response::new(match outcome {
            CascadeOutcome::Skipped => PbCascadeOutcome {
                processed: false,
                store_committed: false,
                identity_deleted: false,
                ops_applied: 0,
            },
            CascadeOutcome::Completed(outcome) => PbCascadeOutcome {
                processed: true,
                store_committed: outcome.store_committed,
                identity_deleted: outcome.identity_deleted(),
                ops_applied: u32::try_from(outcome.applied).unwrap_or(u32::MAX),
            },
        }))
    }

    async fn run_expiry_sweep(
        &self,
        _request: Request<Empty>,
    ) -> Result<Response<PbSweepReport>, Status> {
        let report = self.state.sweeper().run_sweep().await.map_err(|e| {
            tracing::error!(error = ?e, "expiry sweep failed");
            to_status(e)
        })?;
        Ok(Response::new(PbSweepReport {
            updated_count: u32::try_from(report.updated_count).unwrap_or(u32::MAX),
            swept_at: format_rfc3339_ms(&report.swept_at),
        }))
    }
}

fn to_status(e: CascadeServiceError) -> Status {
    match e {
        CascadeServiceError::AuthenticationRequired => Status::unauthenticated(e.to_string()),
        CascadeServiceError::PermissionDenied(reason) => {
            Status::permission_denied(reason.to_string())
        }
        CascadeServiceError::InvalidArgument(_) => Status::invalid_argument(e.to_string()),
        CascadeServiceError::Planner(_)
        | CascadeServiceError::Executor(_)
        | CascadeServiceError::Internal(_) => Status::internal(e.to_string()),
    }
}

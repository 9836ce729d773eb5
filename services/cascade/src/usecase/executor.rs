use tracing::{error, info, warn};

use crate::domain::plan::{CascadePlan, CascadeTrigger};
use crate::domain::repository::{IdentityGateway, StoreGateway};
use crate::error::CascadeServiceError;

/// What happened on the identity-provider side of a cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityOutcome {
    /// The trigger carries no credential to delete.
    NotApplicable,
    Deleted,
    /// Deletion failed after the store committed. The credential is orphaned
    /// and must be reconciled out of band.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub store_committed: bool,
    pub identity: IdentityOutcome,
    /// Ops that changed a document.
    pub applied: usize,
    /// Ops whose document was already gone.
    pub missing: usize,
}

impl ExecutionOutcome {
    pub fn identity_deleted(&self) -> bool {
        self.identity == IdentityOutcome::Deleted
    }
}

/// Applies a [`CascadePlan`]: store batches first, in order, then the
/// identity-provider call for owner deletions.
pub struct CascadeExecutor<S: StoreGateway, I: IdentityGateway> {
    pub store: S,
    pub identity: I,
}

impl<S: StoreGateway, I: IdentityGateway> CascadeExecutor<S, I> {
    pub async fn execute(
        &self,
        plan: &CascadePlan,
    ) -> Result<ExecutionOutcome, CascadeServiceError> {
        let mut applied = 0;
        let mut missing = 0;
        for (index, batch) in plan.batches().iter().enumerate() {
            match self.store.commit_batch(batch).await {
                Ok(commit) => {
                    applied += commit.applied;
                    missing += commit.missing;
                }
                Err(e) => {
                    error!(
                        trigger = ?plan.trigger(),
                        batch = index,
                        batches_committed = index,
                        batches_total = plan.batches().len(),
                        error = %e,
                        "cascade batch commit failed"
                    );
                    return Err(CascadeServiceError::Executor(e));
                }
            }
        }

        let identity = match plan.trigger() {
            CascadeTrigger::ExpirySweep => IdentityOutcome::NotApplicable,
            CascadeTrigger::OwnerDeleted(owner_id) => {
                match self.identity.delete_credential(owner_id).await {
                    Ok(()) => IdentityOutcome::Deleted,
                    Err(e) => {
                        warn!(
                            owner_id = %owner_id,
                            error = %e,
                            "store cascade committed but credential deletion failed"
                        );
                        IdentityOutcome::Failed(e.to_string())
                    }
                }
            }
        };

        info!(
            trigger = ?plan.trigger(),
            applied,
            missing,
            batches = plan.batches().len(),
            "cascade executed"
        );
        Ok(ExecutionOutcome {
            store_committed: true,
            identity,
            applied,
            missing,
        })
    }
}

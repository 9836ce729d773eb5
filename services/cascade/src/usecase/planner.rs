use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use fitfusion_domain::id::OwnerId;

use crate::domain::plan::{CascadePlan, CascadeTrigger, DeletionScope, FieldUpdate, PlannedOp};
use crate::domain::repository::StoreGateway;
use crate::domain::types::{Collection, FieldValue, Filter, RoutineRecord, fields};
use crate::error::CascadeServiceError;

/// Largest batch the document store accepts in one atomic commit.
pub const DEFAULT_MAX_BATCH_OPS: usize = 500;

/// Computes cascade plans. Reads only; never writes.
pub struct CascadePlanner<S: StoreGateway> {
    pub store: S,
    pub max_batch_ops: usize,
}

impl<S: StoreGateway> CascadePlanner<S> {
    /// Every document that must go when `owner_id` goes.
    ///
    /// Dependents are ordered first and the owner's own documents last, so
    /// when the plan spans several batches the anchors survive until the
    /// final one and a failed cascade can be re-planned and retried.
    pub async fn build_deletion_plan(
        &self,
        owner_id: &OwnerId,
        scope: DeletionScope,
    ) -> Result<CascadePlan, CascadeServiceError> {
        let profile = self
            .store
            .get_document(Collection::Clients, owner_id.as_str())
            .await
            .map_err(CascadeServiceError::Planner)?;

        let dependents = self
            .store
            .query_where(
                Collection::Routines,
                &[Filter::eq(fields::CLIENT_ID, owner_id.as_str())],
            )
            .await
            .map_err(CascadeServiceError::Planner)?;

        let mut ops = Vec::with_capacity(dependents.len() + 2);
        ops.extend(
            dependents
                .iter()
                .map(|doc| PlannedOp::delete(Collection::Routines, doc.id.as_str())),
        );
        if profile.is_some() {
            ops.push(PlannedOp::delete(Collection::Clients, owner_id.as_str()));
        }
        if scope == DeletionScope::IncludeOwnerRecord {
            ops.push(PlannedOp::delete(Collection::Users, owner_id.as_str()));
        }

        let plan = CascadePlan::new(
            CascadeTrigger::OwnerDeleted(owner_id.clone()),
            ops,
            self.max_batch_ops,
        );
        debug!(
            owner_id = %owner_id,
            ?scope,
            dependents = dependents.len(),
            has_profile = profile.is_some(),
            ops = plan.len(),
            batches = plan.batches().len(),
            "built deletion plan"
        );
        Ok(plan)
    }

    /// Revoke every public share that expired before `now`.
    pub async fn build_expiry_sweep_plan(
        &self,
        now: DateTime<Utc>,
    ) -> Result<CascadePlan, CascadeServiceError> {
        let candidates = self
            .store
            .query_where(
                Collection::Routines,
                &[
                    Filter::eq(fields::IS_PUBLIC, true),
                    Filter::lt(fields::PUBLIC_EXPIRES_AT, now),
                ],
            )
            .await
            .map_err(CascadeServiceError::Planner)?;

        // Scans are snapshots; re-check each candidate against `now`.
        let ops: Vec<PlannedOp> = candidates
            .iter()
            .map(RoutineRecord::from_document)
            .filter(|routine| routine.sharing.is_expired(now))
            .map(|routine| {
                PlannedOp::update(Collection::Routines, routine.id.0, revoke_sharing_fields(now))
            })
            .collect();

        debug!(candidates = candidates.len(), ops = ops.len(), %now, "built expiry sweep plan");
        Ok(CascadePlan::new(
            CascadeTrigger::ExpirySweep,
            ops,
            self.max_batch_ops,
        ))
    }
}

fn revoke_sharing_fields(now: DateTime<Utc>) -> BTreeMap<String, FieldUpdate> {
    BTreeMap::from([
        (
            fields::IS_PUBLIC.to_owned(),
            FieldUpdate::Set(FieldValue::Bool(false)),
        ),
        (fields::PUBLIC_TOKEN.to_owned(), FieldUpdate::Delete),
        (fields::PUBLIC_EXPIRES_AT.to_owned(), FieldUpdate::Delete),
        (
            fields::UPDATED_AT.to_owned(),
            FieldUpdate::Set(FieldValue::Timestamp(now)),
        ),
    ])
}

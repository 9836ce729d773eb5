//! Cascade plans: the mutations computed before any write happens.

use std::collections::BTreeMap;

use fitfusion_domain::id::OwnerId;

use crate::domain::types::{Collection, FieldValue};

/// Change applied to one field of an updated document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Set(FieldValue),
    /// Remove the field from the document.
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OpKind {
    Delete,
    Update(BTreeMap<String, FieldUpdate>),
}

/// A single `(collection, documentId, operation)` entry of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedOp {
    pub collection: Collection,
    pub id: String,
    pub kind: OpKind,
}

impl PlannedOp {
    pub fn delete(collection: Collection, id: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
            kind: OpKind::Delete,
        }
    }

    pub fn update(
        collection: Collection,
        id: impl Into<String>,
        fields: BTreeMap<String, FieldUpdate>,
    ) -> Self {
        Self {
            collection,
            id: id.into(),
            kind: OpKind::Update(fields),
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self.kind, OpKind::Delete)
    }
}

/// What caused a plan to be built. Decides whether the executor follows the
/// store commit with an identity-provider credential deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeTrigger {
    OwnerDeleted(OwnerId),
    ExpirySweep,
}

/// Which owner documents a deletion plan covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionScope {
    /// The `users/{id}` document is already gone; its deletion is the trigger.
    OwnerRemoved,
    /// Caller-requested deletion: remove `users/{id}` as well.
    IncludeOwnerRecord,
}

/// Ordered mutations split into batches no larger than the store's batch
/// limit. Each batch is committed atomically, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadePlan {
    trigger: CascadeTrigger,
    batches: Vec<Vec<PlannedOp>>,
}

impl CascadePlan {
    /// `max_batch_ops` below 1 is treated as 1.
    pub fn new(trigger: CascadeTrigger, ops: Vec<PlannedOp>, max_batch_ops: usize) -> Self {
        let batches = ops
            .chunks(max_batch_ops.max(1))
            .map(<[PlannedOp]>::to_vec)
            .collect();
        Self { trigger, batches }
    }

    pub fn trigger(&self) -> &CascadeTrigger {
        &self.trigger
    }

    pub fn batches(&self) -> &[Vec<PlannedOp>] {
        &self.batches
    }

    pub fn ops(&self) -> impl Iterator<Item = &PlannedOp> {
        self.batches.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// Result of one committed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchCommit {
    /// Ops that changed a document.
    pub applied: usize,
    /// Ops whose target document no longer existed (already handled).
    pub missing: usize,
}

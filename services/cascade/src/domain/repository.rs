//! Ports to the systems the cascade engine consumes.
//!
//! Methods return `impl Future + Send` so generic handlers and background
//! tasks stay `Send` across `.await`.

use std::future::Future;

use chrono::{DateTime, Utc};

use fitfusion_domain::id::OwnerId;

use crate::domain::plan::{BatchCommit, PlannedOp};
use crate::domain::types::{Collection, Document, Filter};
use crate::error::{IdentityError, StoreError};

/// Document store: point reads, filtered scans, atomic batches, server clock.
pub trait StoreGateway: Clone + Send + Sync + 'static {
    fn get_document(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = Result<Option<Document>, StoreError>> + Send;

    /// Scan `collection` for documents matching every filter. The result is
    /// a snapshot; it may lag concurrent writes.
    fn query_where(
        &self,
        collection: Collection,
        filters: &[Filter],
    ) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send;

    /// Apply `ops` all-or-nothing. An op against a missing document is
    /// skipped and counted in [`BatchCommit::missing`], never an error.
    fn commit_batch(
        &self,
        ops: &[PlannedOp],
    ) -> impl Future<Output = Result<BatchCommit, StoreError>> + Send;

    fn server_now(&self) -> impl Future<Output = Result<DateTime<Utc>, StoreError>> + Send;
}

/// Identity provider holding owner credentials. Independent failure domain:
/// nothing here is transactional with the store.
pub trait IdentityGateway: Clone + Send + Sync + 'static {
    fn delete_credential(
        &self,
        owner_id: &OwnerId,
    ) -> impl Future<Output = Result<(), IdentityError>> + Send;
}

//! In-process gateways for tests and local runs without Postgres or the
//! identity bridge.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use fitfusion_domain::id::OwnerId;

use crate::domain::plan::{BatchCommit, FieldUpdate, OpKind, PlannedOp};
use crate::domain::repository::{IdentityGateway, StoreGateway};
use crate::domain::types::{Collection, Document, Fields, Filter};
use crate::error::{IdentityError, StoreError};

#[derive(Default)]
struct StoreState {
    collections: BTreeMap<Collection, BTreeMap<String, Fields>>,
    clock: Option<DateTime<Utc>>,
    fail_reads: bool,
    fail_commits: bool,
    commits: usize,
}

/// Document store held in memory. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, collection: Collection, id: impl Into<String>, fields: Fields) {
        self.lock()
            .collections
            .entry(collection)
            .or_default()
            .insert(id.into(), fields);
    }

    pub fn get(&self, collection: Collection, id: &str) -> Option<Fields> {
        self.lock()
            .collections
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    pub fn count(&self, collection: Collection) -> usize {
        self.lock()
            .collections
            .get(&collection)
            .map_or(0, BTreeMap::len)
    }

    /// Pin the value returned by `server_now`. Unpinned, the local clock is used.
    pub fn set_clock(&self, now: DateTime<Utc>) {
        self.lock().clock = Some(now);
    }

    /// Make reads, scans and clock reads fail with `StoreError::Unavailable`.
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Make every batch commit fail with `StoreError::Conflict`.
    pub fn fail_commits(&self, fail: bool) {
        self.lock().fail_commits = fail;
    }

    /// Number of batches committed successfully.
    pub fn commit_count(&self) -> usize {
        self.lock().commits
    }

    fn check_reads(state: &StoreState) -> Result<(), StoreError> {
        if state.fail_reads {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        Ok(())
    }
}

impl StoreGateway for InMemoryStore {
    async fn get_document(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let state = self.lock();
        Self::check_reads(&state)?;
        Ok(state
            .collections
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document {
                id: id.to_owned(),
                fields: fields.clone(),
            }))
    }

    async fn query_where(
        &self,
        collection: Collection,
        filters: &[Filter],
    ) -> Result<Vec<Document>, StoreError> {
        let state = self.lock();
        Self::check_reads(&state)?;
        let Some(docs) = state.collections.get(&collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(_, fields)| filters.iter().all(|f| f.matches(fields)))
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect())
    }

    async fn commit_batch(&self, ops: &[PlannedOp]) -> Result<BatchCommit, StoreError> {
        let mut state = self.lock();
        if state.fail_commits {
            return Err(StoreError::Conflict("commits disabled".into()));
        }

        // Apply to a copy and swap it in, so the batch lands whole or not at all.
        let mut collections = state.collections.clone();
        let mut commit = BatchCommit::default();
        for op in ops {
            let docs = collections.entry(op.collection).or_default();
            match &op.kind {
                OpKind::Delete => match docs.remove(&op.id) {
                    Some(_) => commit.applied += 1,
                    None => commit.missing += 1,
                },
                OpKind::Update(updates) => {
                    let Some(fields) = docs.get_mut(&op.id) else {
                        commit.missing += 1;
                        continue;
                    };
                    for (name, update) in updates {
                        match update {
                            FieldUpdate::Set(value) => {
                                fields.insert(name.clone(), value.clone());
                            }
                            FieldUpdate::Delete => {
                                fields.remove(name);
                            }
                        }
                    }
                    commit.applied += 1;
                }
            }
        }
        state.collections = collections;
        state.commits += 1;
        Ok(commit)
    }

    async fn server_now(&self) -> Result<DateTime<Utc>, StoreError> {
        let state = self.lock();
        Self::check_reads(&state)?;
        Ok(state.clock.unwrap_or_else(Utc::now))
    }
}

#[derive(Default)]
struct IdentityState {
    failing: bool,
    attempts: Vec<OwnerId>,
    deleted: Vec<OwnerId>,
}

/// Identity provider held in memory. Records every deletion attempt.
#[derive(Clone, Default)]
pub struct InMemoryIdentity {
    state: Arc<Mutex<IdentityState>>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `delete_credential` call fails with `IdentityError::Unavailable`.
    pub fn failing() -> Self {
        let identity = Self::default();
        identity.lock().failing = true;
        identity
    }

    fn lock(&self) -> MutexGuard<'_, IdentityState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn attempts(&self) -> Vec<OwnerId> {
        self.lock().attempts.clone()
    }

    pub fn deleted(&self) -> Vec<OwnerId> {
        self.lock().deleted.clone()
    }
}

impl IdentityGateway for InMemoryIdentity {
    async fn delete_credential(&self, owner_id: &OwnerId) -> Result<(), IdentityError> {
        let mut state = self.lock();
        state.attempts.push(owner_id.clone());
        if state.failing {
            return Err(IdentityError::Unavailable("identity provider offline".into()));
        }
        state.deleted.push(owner_id.clone());
        Ok(())
    }
}

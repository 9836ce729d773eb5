use chrono::{DateTime, Utc};

use fitfusion_cascade::domain::types::{Collection, FieldValue, fields, fields_of};
use fitfusion_cascade::infra::memory::{InMemoryIdentity, InMemoryStore};
use fitfusion_cascade::state::AppState;
use fitfusion_domain::id::OwnerId;

pub const MAX_BATCH_OPS: usize = 500;

pub fn owner(id: &str) -> OwnerId {
    OwnerId::new(id).unwrap()
}

pub fn app_state(store: &InMemoryStore, identity: &InMemoryIdentity) -> AppState<InMemoryStore, InMemoryIdentity> {
    AppState {
        store: store.clone(),
        identity: identity.clone(),
        max_batch_ops: MAX_BATCH_OPS,
    }
}

pub fn seed_trainer(store: &InMemoryStore, id: &str) {
    store.insert(Collection::Users, id, fields_of([(fields::ROLE, "trainer")]));
}

/// Owner record, client profile and `routines` dependents `{id}-r0..`.
pub fn seed_client(store: &InMemoryStore, id: &str, trainer: &str, routines: usize) {
    store.insert(Collection::Users, id, fields_of([(fields::ROLE, "client")]));
    store.insert(
        Collection::Clients,
        id,
        fields_of([(fields::TRAINER_ID, trainer)]),
    );
    for i in 0..routines {
        store.insert(
            Collection::Routines,
            format!("{id}-r{i}"),
            fields_of([(fields::CLIENT_ID, id), (fields::TRAINER_ID, trainer)]),
        );
    }
}

pub fn seed_shared_routine(store: &InMemoryStore, id: &str, expires_at: DateTime<Utc>) {
    store.insert(
        Collection::Routines,
        id,
        fields_of([
            (fields::IS_PUBLIC, FieldValue::Bool(true)),
            (fields::PUBLIC_TOKEN, FieldValue::from(format!("tok-{id}"))),
            (fields::PUBLIC_EXPIRES_AT, FieldValue::Timestamp(expires_at)),
        ]),
    );
}

/// The U1/T1 scenario: trainer T1, a second trainer T2, client U1 with three
/// routines.
pub fn scenario() -> (InMemoryStore, InMemoryIdentity) {
    let store = InMemoryStore::new();
    seed_trainer(&store, "T1");
    seed_trainer(&store, "T2");
    seed_client(&store, "U1", "T1", 3);
    (store, InMemoryIdentity::new())
}

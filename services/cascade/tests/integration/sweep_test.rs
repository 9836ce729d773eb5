use chrono::{Duration, TimeZone, Utc};

use fitfusion_cascade::domain::types::{Collection, FieldValue, fields};
use fitfusion_cascade::infra::memory::{InMemoryIdentity, InMemoryStore};

use crate::helpers::{app_state, seed_shared_routine};

#[tokio::test]
async fn should_revoke_share_expired_ten_minutes_ago() {
    let store = InMemoryStore::new();
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 3, 0, 0).unwrap();
    store.set_clock(now);
    seed_shared_routine(&store, "R1", now - Duration::minutes(10));
    seed_shared_routine(&store, "R2", now + Duration::days(3));

    let report = app_state(&store, &InMemoryIdentity::new())
        .sweeper()
        .run_sweep()
        .await
        .unwrap();

    assert_eq!(report.updated_count, 1);
    assert_eq!(report.swept_at, now);

    let r1 = store.get(Collection::Routines, "R1").unwrap();
    assert_eq!(r1.get(fields::IS_PUBLIC), Some(&FieldValue::Bool(false)));
    assert!(!r1.contains_key(fields::PUBLIC_TOKEN));
    assert!(!r1.contains_key(fields::PUBLIC_EXPIRES_AT));
    assert_eq!(r1.get(fields::UPDATED_AT), Some(&FieldValue::Timestamp(now)));

    let r2 = store.get(Collection::Routines, "R2").unwrap();
    assert_eq!(r2.get(fields::IS_PUBLIC), Some(&FieldValue::Bool(true)));
}

#[tokio::test]
async fn should_update_nothing_on_second_sweep() {
    let store = InMemoryStore::new();
    let now = Utc::now();
    store.set_clock(now);
    for i in 0..3 {
        seed_shared_routine(&store, &format!("R{i}"), now - Duration::hours(i + 1));
    }
    let state = app_state(&store, &InMemoryIdentity::new());

    assert_eq!(state.sweeper().run_sweep().await.unwrap().updated_count, 3);
    assert_eq!(state.sweeper().run_sweep().await.unwrap().updated_count, 0);
}

#[tokio::test]
async fn should_keep_share_expiring_exactly_now() {
    let store = InMemoryStore::new();
    let now = Utc::now();
    store.set_clock(now);
    seed_shared_routine(&store, "R1", now);

    let report = app_state(&store, &InMemoryIdentity::new())
        .sweeper()
        .run_sweep()
        .await
        .unwrap();

    assert_eq!(report.updated_count, 0);
}

#[tokio::test]
async fn should_use_store_clock_rather_than_local_clock() {
    let store = InMemoryStore::new();
    // Store clock lags a day behind: a share that expired an hour ago locally
    // is still live for the store.
    let store_now = Utc::now() - Duration::days(1);
    store.set_clock(store_now);
    seed_shared_routine(&store, "R1", Utc::now() - Duration::hours(1));

    let report = app_state(&store, &InMemoryIdentity::new())
        .sweeper()
        .run_sweep()
        .await
        .unwrap();

    assert_eq!(report.updated_count, 0);
    assert_eq!(report.swept_at, store_now);
}

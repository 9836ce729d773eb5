use fitfusion_cascade::domain::plan::{CascadeTrigger, DeletionScope};
use fitfusion_cascade::domain::types::{Collection, fields, fields_of};
use fitfusion_cascade::error::{CascadeServiceError, DenialReason};
use fitfusion_cascade::infra::memory::{InMemoryIdentity, InMemoryStore};
use fitfusion_cascade::usecase::cascade::{CascadeOutcome, DeleteClientInput, OwnerDeletedEvent};
use fitfusion_cascade::usecase::executor::IdentityOutcome;

use crate::helpers::{app_state, owner, scenario, seed_client, seed_trainer};

// ── Client deletion request ──────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_profile_owner_record_and_dependents() {
    let (store, identity) = scenario();
    let state = app_state(&store, &identity);

    let plan = state
        .planner()
        .build_deletion_plan(&owner("U1"), DeletionScope::IncludeOwnerRecord)
        .await
        .unwrap();
    assert_eq!(plan.len(), 5);
    assert_eq!(plan.trigger(), &CascadeTrigger::OwnerDeleted(owner("U1")));

    let output = state
        .delete_client()
        .execute(DeleteClientInput {
            caller_id: Some(owner("T1")),
            target_client_id: Some("U1".into()),
        })
        .await
        .unwrap();

    assert!(output.success);
    assert!(output.identity_deleted);
    assert!(store.get(Collection::Users, "U1").is_none());
    assert!(store.get(Collection::Clients, "U1").is_none());
    assert_eq!(store.count(Collection::Routines), 0);
    assert_eq!(identity.attempts(), vec![owner("U1")]);
}

#[tokio::test]
async fn should_reject_foreign_trainer_with_zero_mutations() {
    let (store, identity) = scenario();

    let result = app_state(&store, &identity)
        .delete_client()
        .execute(DeleteClientInput {
            caller_id: Some(owner("T2")),
            target_client_id: Some("U1".into()),
        })
        .await;

    assert!(
        matches!(
            result,
            Err(CascadeServiceError::PermissionDenied(DenialReason::NotYourClient))
        ),
        "expected not-your-client, got {result:?}"
    );
    assert_eq!(store.commit_count(), 0);
    assert!(store.get(Collection::Clients, "U1").is_some());
    assert_eq!(store.count(Collection::Routines), 3);
    assert!(identity.attempts().is_empty());
}

#[tokio::test]
async fn should_reject_unauthenticated_caller_for_missing_target() {
    let (store, identity) = scenario();

    let result = app_state(&store, &identity)
        .delete_client()
        .execute(DeleteClientInput {
            caller_id: None,
            target_client_id: Some("does-not-exist".into()),
        })
        .await;

    assert!(matches!(result, Err(CascadeServiceError::AuthenticationRequired)));
}

#[tokio::test]
async fn should_keep_store_deletions_when_identity_provider_fails() {
    let store = InMemoryStore::new();
    seed_trainer(&store, "T1");
    seed_client(&store, "U1", "T1", 3);
    let identity = InMemoryIdentity::failing();

    let output = app_state(&store, &identity)
        .delete_client()
        .execute(DeleteClientInput {
            caller_id: Some(owner("T1")),
            target_client_id: Some("U1".into()),
        })
        .await
        .unwrap();

    assert!(output.success);
    assert!(!output.identity_deleted);
    assert!(store.get(Collection::Clients, "U1").is_none());
    assert_eq!(store.count(Collection::Routines), 0);
    assert_eq!(identity.attempts(), vec![owner("U1")]);
}

#[tokio::test]
async fn should_mutate_nothing_when_commit_fails() {
    let (store, identity) = scenario();
    store.fail_commits(true);

    let result = app_state(&store, &identity)
        .delete_client()
        .execute(DeleteClientInput {
            caller_id: Some(owner("T1")),
            target_client_id: Some("U1".into()),
        })
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, CascadeServiceError::Executor(_)));
    assert!(err.is_retryable());
    assert!(store.get(Collection::Users, "U1").is_some());
    assert!(store.get(Collection::Clients, "U1").is_some());
    assert_eq!(store.count(Collection::Routines), 3);
    assert!(identity.attempts().is_empty());

    // Retrying after the store recovers completes the cascade.
    store.fail_commits(false);
    let output = app_state(&store, &identity)
        .delete_client()
        .execute(DeleteClientInput {
            caller_id: Some(owner("T1")),
            target_client_id: Some("U1".into()),
        })
        .await
        .unwrap();
    assert!(output.success);
    assert_eq!(store.count(Collection::Routines), 0);
}

// ── Batch splitting ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_split_large_cascade_into_bounded_batches() {
    let store = InMemoryStore::new();
    seed_trainer(&store, "T1");
    seed_client(&store, "U1", "T1", 1200);
    let identity = InMemoryIdentity::new();
    let state = app_state(&store, &identity);

    let plan = state
        .planner()
        .build_deletion_plan(&owner("U1"), DeletionScope::IncludeOwnerRecord)
        .await
        .unwrap();
    let sizes: Vec<usize> = plan.batches().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![500, 500, 202]);

    let outcome = state.executor().execute(&plan).await.unwrap();

    assert_eq!(outcome.applied, 1202);
    assert_eq!(store.commit_count(), 3);
    assert_eq!(store.count(Collection::Routines), 0);
    assert_eq!(outcome.identity, IdentityOutcome::Deleted);
}

// ── Owner-deletion event ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_cascade_without_owner_record_on_deletion_event() {
    let (store, identity) = scenario();

    let outcome = app_state(&store, &identity)
        .owner_deleted()
        .execute(OwnerDeletedEvent {
            owner_id: owner("U1"),
            prior_fields: fields_of([(fields::ROLE, "client")]),
        })
        .await
        .unwrap();

    let CascadeOutcome::Completed(outcome) = outcome else {
        panic!("expected completed cascade");
    };
    assert!(outcome.store_committed);
    assert_eq!(outcome.applied, 4);
    assert!(store.get(Collection::Clients, "U1").is_none());
    assert_eq!(store.count(Collection::Routines), 0);
    assert_eq!(identity.deleted(), vec![owner("U1")]);
}

#[tokio::test]
async fn should_skip_non_client_deletion_event() {
    let (store, identity) = scenario();

    let outcome = app_state(&store, &identity)
        .owner_deleted()
        .execute(OwnerDeletedEvent {
            owner_id: owner("T1"),
            prior_fields: fields_of([(fields::ROLE, "trainer")]),
        })
        .await
        .unwrap();

    assert_eq!(outcome, CascadeOutcome::Skipped);
    assert_eq!(store.commit_count(), 0);
    assert!(identity.attempts().is_empty());
}

#[tokio::test]
async fn should_tolerate_repeated_deletion_event() {
    let (store, identity) = scenario();
    let state = app_state(&store, &identity);
    let event = || OwnerDeletedEvent {
        owner_id: owner("U1"),
        prior_fields: fields_of([(fields::ROLE, "client")]),
    };

    state.owner_deleted().execute(event()).await.unwrap();
    let second = state.owner_deleted().execute(event()).await.unwrap();

    let CascadeOutcome::Completed(second) = second else {
        panic!("expected completed cascade");
    };
    assert_eq!(second.applied, 0);
    assert!(second.store_committed);
}

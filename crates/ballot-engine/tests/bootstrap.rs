//! Bootstrap coordinator behavior against a scriptable ledger.

mod common;

use std::time::Duration;

use assert_matches::assert_matches;

use ballot_core::lifecycle::RecordPhase;
use ballot_core::BallotError;
use ballot_testkit::{fixtures, MockLedger};

use common::{rig, rig_with};

#[tokio::test]
async fn first_bootstrap_initializes_exactly_once() {
    let rig = rig();

    let first = rig.coordinator.ensure_record().await.unwrap();
    let counts = rig.ledger.counts();
    assert_eq!(counts.account_exists, 1);
    assert_eq!(counts.initialize_record, 1);

    // Second call short-circuits on readiness: zero further network calls,
    // same address.
    let second = rig.coordinator.ensure_record().await.unwrap();
    assert_eq!(first.address(), second.address());
    assert_eq!(rig.ledger.counts(), counts);
}

#[tokio::test]
async fn existing_record_is_not_reinitialized() {
    let record = fixtures::record_with_polls(vec![fixtures::two_option_poll(1, "existing")]);
    let rig = rig_with(MockLedger::with_existing_record(record));

    rig.coordinator.ensure_record().await.unwrap();
    let counts = rig.ledger.counts();
    assert_eq!(counts.account_exists, 1);
    assert_eq!(counts.initialize_record, 0);
}

#[tokio::test]
async fn restart_reuses_the_persisted_address() {
    let rig = rig();
    let handle = rig.coordinator.ensure_record().await.unwrap();

    // A new process over the same storage and ledger.
    let restarted = common::rig_with(rig.ledger.clone());
    let restored = {
        // same storage contents
        let blob = rig.storage.get("record/identity").await.unwrap();
        restarted.storage.put("record/identity", blob).await;
        restarted.coordinator.ensure_record().await.unwrap()
    };

    assert_eq!(handle.address(), restored.address());
    // The record already exists; the restart performed no write.
    assert_eq!(rig.ledger.counts().initialize_record, 1);
}

#[tokio::test]
async fn failed_bootstrap_surfaces_and_allows_retry() {
    let rig = rig();
    rig.ledger.fail_initialize("program rejected it");

    let error = rig.coordinator.ensure_record().await.unwrap_err();
    assert_matches!(error, BallotError::RemoteCreation { .. });

    let (phase, _, last_error) = rig.coordinator.status().await;
    assert_eq!(phase, RecordPhase::Failed);
    assert!(last_error.is_some());

    rig.ledger.clear_failures();
    rig.coordinator.retry().await.unwrap();
    let (phase, address, _) = rig.coordinator.status().await;
    assert_eq!(phase, RecordPhase::Ready);
    assert!(address.is_some());
}

#[tokio::test]
async fn concurrent_bootstraps_are_single_flight() {
    let rig = rig();
    rig.ledger.set_latency(Duration::from_millis(20));

    let (first, second) =
        tokio::join!(rig.coordinator.ensure_record(), rig.coordinator.ensure_record());

    // Exactly one attempt reached the ledger; the loser saw Busy.
    assert_eq!(rig.ledger.counts().initialize_record, 1);
    let busy = match (&first, &second) {
        (Ok(_), Err(e)) | (Err(e), Ok(_)) => e.clone(),
        other => panic!("expected one winner and one Busy, got {other:?}"),
    };
    assert_matches!(busy, BallotError::Busy { .. });
}

#[tokio::test]
async fn disconnect_resets_locally_but_not_remotely() {
    let rig = rig();
    let handle = rig.coordinator.ensure_record().await.unwrap();

    rig.coordinator.disconnect().await;
    let (phase, address, _) = rig.coordinator.status().await;
    assert_eq!(phase, RecordPhase::Uninitialized);
    assert_eq!(address, None);

    // Reconnect finds the same record, still without a second write.
    let reconnected = rig.coordinator.ensure_record().await.unwrap();
    assert_eq!(reconnected.address(), handle.address());
    assert_eq!(rig.ledger.counts().initialize_record, 1);
    // The old handle belongs to a retired epoch.
    assert_ne!(reconnected.epoch(), handle.epoch());
}

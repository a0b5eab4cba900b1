//! Facade behavior: navigation wiring, status banner, disconnect.

use std::sync::Arc;

use ballot_app::{BannerTone, View};
use ballot_core::identifiers::{OptionId, PollId};
use ballot_core::ClientConfig;
use ballot_engine::BallotClient;
use ballot_testkit::{fixtures, MockLedger, MockStorage};

fn client_over(ledger: &MockLedger) -> BallotClient<MockStorage, MockLedger> {
    let config = ClientConfig {
        // No user-visible pause in tests.
        confirm_delay_ms: 0,
        ..ClientConfig::default()
    };
    BallotClient::new(Arc::new(MockStorage::new()), Arc::new(ledger.clone()), config)
}

fn seeded_ledger() -> MockLedger {
    MockLedger::with_existing_record(fixtures::record_with_polls(vec![
        fixtures::two_option_poll(1, "open"),
        {
            let mut poll = fixtures::two_option_poll(2, "closed");
            poll.closed = true;
            poll
        },
    ]))
}

#[tokio::test]
async fn connect_loads_polls_and_reports_ready() {
    let ledger = seeded_ledger();
    let client = client_over(&ledger);

    client.connect().await.unwrap();
    assert_eq!(client.polls().await.len(), 2);

    let banner = client.status().await;
    assert_eq!(banner.tone, BannerTone::Ready);
    assert!(!banner.can_retry);
}

#[tokio::test]
async fn vote_flow_switches_to_results() {
    let ledger = seeded_ledger();
    let client = client_over(&ledger);
    let handle = client.connect().await.unwrap();

    assert!(client.select_for_voting(PollId(1)).await);
    assert_eq!(client.view().await, View::Vote(PollId(1)));

    client
        .cast_vote(&handle, PollId(1), OptionId(1))
        .await
        .unwrap();
    assert_eq!(client.view().await, View::Results(PollId(1)));

    let tally = client.tally(PollId(1)).await.unwrap();
    assert_eq!(tally.total, 1);
    assert_eq!(tally.options[1].count, 1);
}

#[tokio::test]
async fn results_entry_refreshes_the_vote_cache() {
    let ledger = seeded_ledger();
    let client = client_over(&ledger);
    let handle = client.connect().await.unwrap();

    // A vote lands remotely without this client seeing it yet.
    let other_client = client_over(&ledger);
    let other_handle = other_client.connect().await.unwrap();
    other_client
        .cast_vote(&other_handle, PollId(1), OptionId(0))
        .await
        .unwrap();

    assert!(client.select_for_results(&handle, PollId(1)).await);
    assert_eq!(client.view().await, View::Results(PollId(1)));
    assert_eq!(client.tally(PollId(1)).await.unwrap().total, 1);
}

#[tokio::test]
async fn closed_poll_cannot_enter_the_vote_form() {
    let ledger = seeded_ledger();
    let client = client_over(&ledger);
    client.connect().await.unwrap();

    assert!(!client.select_for_voting(PollId(2)).await);
    assert_eq!(client.view().await, View::List);
}

#[tokio::test]
async fn disconnect_drops_state_and_retires_the_handle() {
    let ledger = seeded_ledger();
    let client = client_over(&ledger);
    let handle = client.connect().await.unwrap();
    client.select_for_results(&handle, PollId(1)).await;

    client.disconnect().await;
    assert_eq!(client.view().await, View::List);
    assert!(client.polls().await.is_empty());
    assert_eq!(client.status().await.tone, BannerTone::Waiting);

    // The retired handle is refused.
    assert!(client.refresh_polls(&handle).await.is_err());

    // Reconnecting restores the same record.
    let new_handle = client.connect().await.unwrap();
    assert_eq!(new_handle.address(), handle.address());
    assert_eq!(client.polls().await.len(), 2);
}

#[tokio::test]
async fn failed_bootstrap_banner_offers_retry() {
    let ledger = MockLedger::new();
    ledger.fail_initialize("rpc rejected");
    let client = client_over(&ledger);

    client.connect().await.unwrap_err();
    let banner = client.status().await;
    assert_eq!(banner.tone, BannerTone::Error);
    assert!(banner.can_retry);

    ledger.clear_failures();
    client.retry().await.unwrap();
    assert_eq!(client.status().await.tone, BannerTone::Ready);
}

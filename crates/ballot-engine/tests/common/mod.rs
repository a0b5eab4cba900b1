//! Shared wiring for engine integration tests.

// Each test binary uses its own subset of the rig.
#![allow(dead_code)]

use std::sync::Arc;

use tokio::sync::RwLock;

use ballot_app::PollsState;
use ballot_core::ClientConfig;
use ballot_engine::{BootstrapCoordinator, Lifecycle, MutationPipeline, SyncReader};
use ballot_testkit::{MockLedger, MockStorage};

/// All engine components over shared mock effects.
///
/// The `ledger` and `storage` handles alias the ones inside the
/// components, so tests can script failures and read counters.
pub struct Rig {
    pub ledger: MockLedger,
    pub storage: MockStorage,
    pub coordinator: BootstrapCoordinator<MockStorage, MockLedger>,
    pub reader: SyncReader<MockLedger>,
    pub pipeline: MutationPipeline<MockLedger>,
    pub polls: Arc<RwLock<PollsState>>,
}

pub fn rig() -> Rig {
    rig_with(MockLedger::new())
}

pub fn rig_with(ledger: MockLedger) -> Rig {
    let storage = MockStorage::new();
    let lifecycle = Arc::new(Lifecycle::new());
    let polls = Arc::new(RwLock::new(PollsState::new()));
    let shared_ledger = Arc::new(ledger.clone());

    let reader = SyncReader::new(shared_ledger.clone(), lifecycle.clone(), polls.clone());
    let pipeline = MutationPipeline::new(
        shared_ledger.clone(),
        lifecycle.clone(),
        polls.clone(),
        reader.clone(),
        &ClientConfig::default(),
    );
    let coordinator =
        BootstrapCoordinator::new(Arc::new(storage.clone()), shared_ledger, lifecycle);

    Rig {
        ledger,
        storage,
        coordinator,
        reader,
        pipeline,
        polls,
    }
}

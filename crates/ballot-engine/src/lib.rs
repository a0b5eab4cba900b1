//! # Ballot Engine
//!
//! The client-side synchronization engine for the shared poll record:
//!
//! - [`RecordLocator`]: idempotent acquisition of the record identity,
//!   persisted before first use;
//! - [`BootstrapCoordinator`]: ensures the record exists remotely exactly
//!   once and tracks its lifecycle;
//! - [`SyncReader`]: read-then-replace reconstruction of the local poll
//!   and vote collections;
//! - [`MutationPipeline`]: poll creation and optimistic voting with
//!   rollback;
//! - [`BallotClient`]: a thin facade wiring the components to the
//!   navigation state machine for hosts.
//!
//! Ordering: bootstrap must reach `Ready` before reads or writes are
//! attempted; every operation takes the [`RecordHandle`] it is acting for
//! and is refused when that handle's epoch is no longer current.
//!
//! [`RecordHandle`]: ballot_core::RecordHandle

pub mod bootstrap;
pub mod client;
pub mod lifecycle;
pub mod locator;
pub mod mutation;
pub mod reader;

pub use bootstrap::BootstrapCoordinator;
pub use client::BallotClient;
pub use lifecycle::Lifecycle;
pub use locator::RecordLocator;
pub use mutation::MutationPipeline;
pub use reader::SyncReader;

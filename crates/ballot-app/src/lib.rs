//! # Ballot App
//!
//! Portable headless application state for the ballot client: the poll and
//! vote collections reconstructed from the shared record, the navigation
//! state machine, and the bootstrap status banner.
//!
//! Presentation is an external collaborator. Renderers receive these
//! states and emit actions; nothing here draws anything.

pub mod navigation;
pub mod views;

pub use navigation::{NavEffect, NavigationState, View};
pub use views::polls::{OptionTally, PollTally, PollsState};
pub use views::status::{BannerTone, StatusBanner};

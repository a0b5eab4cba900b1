//! Shared fixtures.

use ballot_core::identifiers::{OptionId, PollId};
use ballot_core::record::{Poll, PollOption, SharedRecord, Vote};

/// A two-option poll (`Red` / `Blue`).
pub fn two_option_poll(id: u32, title: &str) -> Poll {
    Poll {
        id: PollId(id),
        title: title.to_string(),
        options: vec![
            PollOption {
                id: OptionId(0),
                text: "Red".to_string(),
            },
            PollOption {
                id: OptionId(1),
                text: "Blue".to_string(),
            },
        ],
        closed: false,
    }
}

/// A shared record holding `polls` and no votes.
pub fn record_with_polls(polls: Vec<Poll>) -> SharedRecord {
    SharedRecord {
        polls,
        votes: Vec::new(),
    }
}

/// A vote for `option` in `poll_id`.
pub fn vote(poll_id: u32, option: u8) -> Vote {
    Vote {
        poll_id: PollId(poll_id),
        option: OptionId(option),
    }
}

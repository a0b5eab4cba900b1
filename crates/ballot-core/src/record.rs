//! The shared record model: polls, options, and votes.
//!
//! Exactly one shared record exists per deployment; it owns an ordered poll
//! collection and an ordered, append-only vote collection. The client never
//! constructs a `Poll` locally; polls become visible only through a
//! confirmed remote read.

use serde::{Deserialize, Serialize};

use crate::identifiers::{OptionId, PollId};

/// One answer option of a poll. Fixed at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    /// Identifier, unique within the owning poll
    pub id: OptionId,
    /// Option text, trimmed, 1..=100 chars
    pub text: String,
}

/// A poll as decoded from the shared record.
///
/// Immutable after creation except for `closed`, which the ledger program
/// may flip; this client only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    /// Identifier assigned by the ledger program
    pub id: PollId,
    /// Poll question
    pub title: String,
    /// Answer options, 2..=6, never resized after creation
    pub options: Vec<PollOption>,
    /// Whether voting is closed
    pub closed: bool,
}

impl Poll {
    /// Look up an option by id.
    pub fn option(&self, id: OptionId) -> Option<&PollOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Whether `id` names an option of this poll.
    pub fn has_option(&self, id: OptionId) -> bool {
        self.option(id).is_some()
    }
}

/// A cast vote. Append-only; has no identity beyond its position in the
/// remote collection, so aggregation is by scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// The poll this vote belongs to
    pub poll_id: PollId,
    /// The chosen option
    pub option: OptionId,
}

/// Decoded contents of the shared record: the full remote state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SharedRecord {
    /// All polls, in creation order
    pub polls: Vec<Poll>,
    /// All votes across all polls, in submission order
    pub votes: Vec<Vote>,
}

impl SharedRecord {
    /// Votes belonging to one poll, preserving remote submission order.
    ///
    /// The ledger program has no server-side filtering; this is the
    /// client-side scan over the full vote collection.
    pub fn votes_for(&self, poll_id: PollId) -> impl Iterator<Item = &Vote> {
        self.votes.iter().filter(move |v| v.poll_id == poll_id)
    }

    /// Look up a poll by id.
    pub fn poll(&self, id: PollId) -> Option<&Poll> {
        self.polls.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll(id: u32) -> Poll {
        Poll {
            id: PollId(id),
            title: format!("poll {id}"),
            options: vec![
                PollOption {
                    id: OptionId(0),
                    text: "yes".into(),
                },
                PollOption {
                    id: OptionId(1),
                    text: "no".into(),
                },
            ],
            closed: false,
        }
    }

    #[test]
    fn votes_for_filters_and_preserves_order() {
        let record = SharedRecord {
            polls: vec![poll(1), poll(2)],
            votes: vec![
                Vote {
                    poll_id: PollId(1),
                    option: OptionId(0),
                },
                Vote {
                    poll_id: PollId(2),
                    option: OptionId(1),
                },
                Vote {
                    poll_id: PollId(1),
                    option: OptionId(1),
                },
            ],
        };

        let filtered: Vec<_> = record.votes_for(PollId(1)).collect();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].option, OptionId(0));
        assert_eq!(filtered[1].option, OptionId(1));
    }

    #[test]
    fn option_lookup() {
        let p = poll(1);
        assert!(p.has_option(OptionId(1)));
        assert!(!p.has_option(OptionId(9)));
        assert_eq!(p.option(OptionId(0)).map(|o| o.text.as_str()), Some("yes"));
    }
}

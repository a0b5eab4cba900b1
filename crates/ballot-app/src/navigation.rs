//! Navigation state machine.
//!
//! Three screens: the poll list, the vote form for one poll, and the
//! results for one poll. The selected poll is carried inside the variant,
//! so a vote or results screen without a selection is unrepresentable.

use ballot_core::identifiers::PollId;

use crate::views::polls::PollsState;

/// The active screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Poll list
    #[default]
    List,
    /// Vote form for the selected poll
    Vote(PollId),
    /// Results for the selected poll
    Results(PollId),
}

/// Follow-up work a transition asks the engine to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEffect {
    /// Reload the vote cache for this poll in the background; the results
    /// screen renders from whatever is cached meanwhile.
    RefreshVotes(PollId),
}

/// Screen selection state, driven by user actions and pipeline completion.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    view: View,
}

impl NavigationState {
    /// Start on the poll list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active screen.
    pub fn view(&self) -> View {
        self.view
    }

    /// The selected poll, when a poll-scoped screen is active.
    pub fn selected_poll_id(&self) -> Option<PollId> {
        match self.view {
            View::List => None,
            View::Vote(id) | View::Results(id) => Some(id),
        }
    }

    /// Open the vote form for a poll.
    ///
    /// Rejected as a no-op for an unknown or closed poll: callers are not
    /// supposed to offer the action in either case, so this is a guard
    /// against stale renders, not a user-facing error.
    pub fn select_for_voting(&mut self, polls: &PollsState, id: PollId) -> bool {
        match polls.poll(id) {
            None => {
                tracing::warn!(poll_id = %id, "vote selection for unknown poll ignored");
                false
            }
            Some(poll) if poll.closed => {
                tracing::warn!(poll_id = %id, "vote selection for closed poll ignored");
                false
            }
            Some(_) => {
                self.view = View::Vote(id);
                true
            }
        }
    }

    /// Open the results screen for a poll and request a vote refresh.
    pub fn select_for_results(&mut self, polls: &PollsState, id: PollId) -> Option<NavEffect> {
        if !polls.has_poll(id) {
            tracing::warn!(poll_id = %id, "results selection for unknown poll ignored");
            return None;
        }
        self.view = View::Results(id);
        Some(NavEffect::RefreshVotes(id))
    }

    /// Return to the poll list.
    pub fn go_back(&mut self) {
        self.view = View::List;
    }

    /// Automatic switch to results after a confirmed vote.
    ///
    /// Only meaningful from the vote form; anywhere else it is a no-op.
    pub fn vote_confirmed(&mut self) -> bool {
        match self.view {
            View::Vote(id) => {
                self.view = View::Results(id);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_core::identifiers::OptionId;
    use ballot_core::record::{Poll, PollOption};

    fn polls(closed_id: Option<u32>) -> PollsState {
        let mut state = PollsState::new();
        state.replace_polls(
            (1..=3)
                .map(|id| Poll {
                    id: PollId(id),
                    title: format!("poll {id}"),
                    options: vec![
                        PollOption {
                            id: OptionId(0),
                            text: "a".into(),
                        },
                        PollOption {
                            id: OptionId(1),
                            text: "b".into(),
                        },
                    ],
                    closed: closed_id == Some(id),
                })
                .collect(),
        );
        state
    }

    #[test]
    fn voting_flow() {
        let polls = polls(None);
        let mut nav = NavigationState::new();

        assert!(nav.select_for_voting(&polls, PollId(1)));
        assert_eq!(nav.view(), View::Vote(PollId(1)));
        assert_eq!(nav.selected_poll_id(), Some(PollId(1)));

        assert!(nav.vote_confirmed());
        assert_eq!(nav.view(), View::Results(PollId(1)));

        nav.go_back();
        assert_eq!(nav.view(), View::List);
        assert_eq!(nav.selected_poll_id(), None);
    }

    #[test]
    fn closed_poll_vote_selection_is_rejected() {
        let polls = polls(Some(2));
        let mut nav = NavigationState::new();
        assert!(!nav.select_for_voting(&polls, PollId(2)));
        assert_eq!(nav.view(), View::List);
    }

    #[test]
    fn unknown_poll_selections_are_rejected() {
        let polls = polls(None);
        let mut nav = NavigationState::new();
        assert!(!nav.select_for_voting(&polls, PollId(9)));
        assert!(nav.select_for_results(&polls, PollId(9)).is_none());
        assert_eq!(nav.view(), View::List);
    }

    #[test]
    fn results_entry_requests_refresh() {
        let polls = polls(None);
        let mut nav = NavigationState::new();
        assert_eq!(
            nav.select_for_results(&polls, PollId(3)),
            Some(NavEffect::RefreshVotes(PollId(3)))
        );
        assert_eq!(nav.view(), View::Results(PollId(3)));
    }

    #[test]
    fn results_screen_offers_voting() {
        let polls = polls(None);
        let mut nav = NavigationState::new();
        nav.select_for_results(&polls, PollId(1));
        assert!(nav.select_for_voting(&polls, PollId(1)));
        assert_eq!(nav.view(), View::Vote(PollId(1)));
    }

    #[test]
    fn vote_confirmed_outside_vote_form_is_noop() {
        let mut nav = NavigationState::new();
        assert!(!nav.vote_confirmed());
        assert_eq!(nav.view(), View::List);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Action {
            SelectVoting(u32),
            SelectResults(u32),
            GoBack,
            VoteConfirmed,
        }

        fn action() -> impl Strategy<Value = Action> {
            prop_oneof![
                (0u32..5).prop_map(Action::SelectVoting),
                (0u32..5).prop_map(Action::SelectResults),
                Just(Action::GoBack),
                Just(Action::VoteConfirmed),
            ]
        }

        proptest! {
            /// For any action sequence, a poll-scoped screen always has a
            /// selection naming a known poll, and the vote form never shows
            /// a closed poll.
            #[test]
            fn selection_always_valid(actions in proptest::collection::vec(action(), 0..40)) {
                let polls = polls(Some(2));
                let mut nav = NavigationState::new();

                for act in actions {
                    match act {
                        Action::SelectVoting(id) => {
                            nav.select_for_voting(&polls, PollId(id));
                        }
                        Action::SelectResults(id) => {
                            nav.select_for_results(&polls, PollId(id));
                        }
                        Action::GoBack => nav.go_back(),
                        Action::VoteConfirmed => {
                            nav.vote_confirmed();
                        }
                    }

                    match nav.view() {
                        View::List => prop_assert_eq!(nav.selected_poll_id(), None),
                        View::Vote(id) => {
                            let poll = polls.poll(id);
                            prop_assert!(poll.is_some());
                            prop_assert!(!poll.map(|p| p.closed).unwrap_or(true));
                        }
                        View::Results(id) => prop_assert!(polls.has_poll(id)),
                    }
                }
            }
        }
    }
}

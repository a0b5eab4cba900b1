//! Poll input validation.
//!
//! Rejection happens here, before any remote call is issued.

use crate::errors::{BallotError, Result};

/// Minimum number of options per poll.
pub const MIN_POLL_OPTIONS: usize = 2;
/// Maximum number of options per poll.
pub const MAX_POLL_OPTIONS: usize = 6;
/// Maximum title length in characters, after trimming.
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum option text length in characters, after trimming.
pub const MAX_OPTION_LEN: usize = 100;

/// A validated, trimmed create-poll input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDraft {
    /// Trimmed, non-empty title
    pub title: String,
    /// Trimmed, non-empty option texts, 2..=6 entries
    pub options: Vec<String>,
}

/// Validate raw create-poll input, trimming title and options.
pub fn validate_poll_input(title: &str, options: &[String]) -> Result<PollDraft> {
    let title = title.trim();
    if title.is_empty() {
        return Err(BallotError::invalid("poll title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(BallotError::invalid(format!(
            "poll title exceeds {MAX_TITLE_LEN} characters"
        )));
    }

    if options.len() < MIN_POLL_OPTIONS || options.len() > MAX_POLL_OPTIONS {
        return Err(BallotError::invalid(format!(
            "a poll needs {MIN_POLL_OPTIONS} to {MAX_POLL_OPTIONS} options, got {}",
            options.len()
        )));
    }

    let mut trimmed = Vec::with_capacity(options.len());
    for (index, option) in options.iter().enumerate() {
        let text = option.trim();
        if text.is_empty() {
            return Err(BallotError::invalid(format!(
                "option {} must not be empty",
                index + 1
            )));
        }
        if text.chars().count() > MAX_OPTION_LEN {
            return Err(BallotError::invalid(format!(
                "option {} exceeds {MAX_OPTION_LEN} characters",
                index + 1
            )));
        }
        trimmed.push(text.to_string());
    }

    Ok(PollDraft {
        title: title.to_string(),
        options: trimmed,
    })
}

//! Up/down vote state machine and denormalized vote counters.
//!
//! Every user holds at most one vote per target. Voting the same way
//! twice toggles the vote off; voting the other way flips it. Each
//! transition yields the deltas to apply to the target's
//! `upvotes`/`downvotes` counters.
//!
//! ```
//! use lootwiki_logic::votes::{apply_vote, VoteCounters, VoteDirection};
//!
//! let mut counters = VoteCounters::default();
//! let first = apply_vote(None, VoteDirection::Up);
//! counters.apply(&first);
//! assert_eq!(counters, VoteCounters::new(1, 0));
//!
//! let flip = apply_vote(first.new_state, VoteDirection::Down);
//! counters.apply(&flip);
//! assert_eq!(counters, VoteCounters::new(0, 1));
//! ```
//!
//! # Counters
//!
//! Counters are kept alongside the target rather than recomputed from
//! vote rows on every read. [`VoteCounters::apply`] floors both at zero
//! so historical drift can never surface as a negative count, and
//! [`tally_votes`] recomputes exact counts when a recount is requested.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::vote_values;
use crate::error::LogicError;

/// Direction of a single vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Signed unit stored on the vote row.
    pub fn value(self) -> i8 {
        match self {
            VoteDirection::Up => vote_values::UP,
            VoteDirection::Down => vote_values::DOWN,
        }
    }

    /// Inverse of [`value`](Self::value). Any other number is not a vote.
    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            vote_values::UP => Some(VoteDirection::Up),
            vote_values::DOWN => Some(VoteDirection::Down),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VoteDirection::Up => "up",
            VoteDirection::Down => "down",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            VoteDirection::Up => VoteDirection::Down,
            VoteDirection::Down => VoteDirection::Up,
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteDirection {
    type Err = LogicError;

    /// Accepts exactly the literals `"up"` and `"down"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(VoteDirection::Up),
            "down" => Ok(VoteDirection::Down),
            other => Err(LogicError::invalid(format!(
                "vote direction must be \"up\" or \"down\", got {other:?}"
            ))),
        }
    }
}

/// Kind of entity a vote points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteTargetKind {
    Build = 0,
    Guide = 1,
}

impl VoteTargetKind {
    pub const ALL: [VoteTargetKind; 2] = [VoteTargetKind::Build, VoteTargetKind::Guide];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(VoteTargetKind::Build),
            1 => Some(VoteTargetKind::Guide),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VoteTargetKind::Build => "build",
            VoteTargetKind::Guide => "guide",
        }
    }
}

/// Unique key of the single vote a voter may hold on a target.
///
/// `voter` is any stable textual identity (the server uses the hex form
/// of the caller's identity).
pub fn vote_key(voter: &str, kind: VoteTargetKind, target_id: u64) -> String {
    format!("{}:{}:{}", voter, kind.id(), target_id)
}

/// Result of one vote transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    /// Vote the user holds afterwards (`None` = toggled off).
    pub new_state: Option<VoteDirection>,
    pub upvote_delta: i32,
    pub downvote_delta: i32,
}

impl VoteOutcome {
    /// Whether the vote row must be deleted rather than upserted.
    pub fn removes_vote(&self) -> bool {
        self.new_state.is_none()
    }
}

/// Compute the transition for a user's existing vote and a new request.
///
/// | existing | request | result | up | down |
/// |----------|---------|--------|----|------|
/// | none     | up      | up     | +1 | 0    |
/// | none     | down    | down   | 0  | +1   |
/// | up       | up      | none   | -1 | 0    |
/// | down     | down    | none   | 0  | -1   |
/// | up       | down    | down   | -1 | +1   |
/// | down     | up      | up     | +1 | -1   |
pub fn apply_vote(existing: Option<VoteDirection>, requested: VoteDirection) -> VoteOutcome {
    use VoteDirection::{Down, Up};

    let (new_state, upvote_delta, downvote_delta) = match (existing, requested) {
        (None, Up) => (Some(Up), 1, 0),
        (None, Down) => (Some(Down), 0, 1),
        (Some(Up), Up) => (None, -1, 0),
        (Some(Down), Down) => (None, 0, -1),
        (Some(Up), Down) => (Some(Down), -1, 1),
        (Some(Down), Up) => (Some(Up), 1, -1),
    };

    VoteOutcome {
        new_state,
        upvote_delta,
        downvote_delta,
    }
}

/// [`apply_vote`] with the direction given as the request literal.
pub fn apply_vote_str(
    existing: Option<VoteDirection>,
    requested: &str,
) -> Result<VoteOutcome, LogicError> {
    let requested = requested.parse::<VoteDirection>()?;
    Ok(apply_vote(existing, requested))
}

/// Up/down counters stored on a votable entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounters {
    pub upvotes: u32,
    pub downvotes: u32,
}

impl VoteCounters {
    pub fn new(upvotes: u32, downvotes: u32) -> Self {
        Self { upvotes, downvotes }
    }

    /// Apply an outcome's deltas, flooring both counters at zero.
    pub fn apply(&mut self, outcome: &VoteOutcome) {
        self.upvotes = offset_floored(self.upvotes, outcome.upvote_delta);
        self.downvotes = offset_floored(self.downvotes, outcome.downvote_delta);
    }

    /// Net score (up minus down), used for ranking.
    pub fn score(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }

    pub fn total(&self) -> u64 {
        self.upvotes as u64 + self.downvotes as u64
    }
}

fn offset_floored(count: u32, delta: i32) -> u32 {
    (count as i64 + delta as i64).clamp(0, u32::MAX as i64) as u32
}

/// Exact counters from a set of stored votes.
pub fn tally_votes<I>(votes: I) -> VoteCounters
where
    I: IntoIterator<Item = VoteDirection>,
{
    votes
        .into_iter()
        .fold(VoteCounters::default(), |mut acc, v| {
            match v {
                VoteDirection::Up => acc.upvotes += 1,
                VoteDirection::Down => acc.downvotes += 1,
            }
            acc
        })
}

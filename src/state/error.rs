//! Scoring errors.
//!
//! Every error is recoverable: a failed call leaves the match untouched and
//! scoring carries on. `is_correctable` separates the errors a corrected
//! resubmission can clear from those that need a different operation.

use thiserror::Error;

use super::ball::WicketKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Striker, non-striker and bowler must all be assigned")]
    IncompleteLineup,

    #[error("Only a run out is allowed on a free hit, got {0}")]
    IllegalDismissalOnFreeHit(WicketKind),

    #[error("Over not complete: {legal_balls} legal balls bowled")]
    OverNotComplete { legal_balls: u32 },

    #[error("{0} bowled the previous over")]
    ConsecutiveOver(String),

    #[error("Cannot {action} while {status}")]
    InvalidStateTransition {
        action: &'static str,
        status: &'static str,
    },

    #[error("A delivery cannot be both a wide and a no-ball")]
    ConflictingExtras,

    #[error("Dismissed player {0} is not at the crease")]
    DismissedPlayerNotAtCrease(String),

    #[error("The non-striker cannot be out {0}")]
    IllegalNonStrikerDismissal(WicketKind),

    #[error("A delivery cannot carry {runs} runs (limit {max})")]
    ExcessiveRuns { runs: u32, max: u32 },

    #[error("Innings is all out ({0} wickets)")]
    AllOut(u32),

    #[error("All {0} overs have been bowled")]
    OversExhausted(u32),

    #[error("Over {0} must be completed before the next delivery")]
    OverPending(u32),

    #[error("{0} is already out")]
    BatsmanAlreadyOut(String),

    #[error("Striker and non-striker must be different players")]
    SameBatsmen,

    #[error("Player {0} is not in the {1} side")]
    UnknownPlayer(String, &'static str),

    #[error("Unknown wicket type: {0}")]
    UnknownWicketKind(String),

    #[error("Match not found: {0}")]
    MatchNotFound(String),

    #[error("Match {0} already exists")]
    DuplicateMatch(String),

    #[error("Ball {0} has already been recorded")]
    DuplicateBall(String),

    #[error("No balls recorded in the current innings")]
    NothingToUndo,
}

impl ScoringError {
    /// Whether resubmitting the same operation with corrected input can
    /// succeed. Lifecycle errors need a different operation instead.
    pub fn is_correctable(&self) -> bool {
        match self {
            ScoringError::InvalidStateTransition { .. } => false,
            ScoringError::AllOut(_) => false,
            ScoringError::OversExhausted(_) => false,
            ScoringError::MatchNotFound(_) => false,
            ScoringError::DuplicateBall(_) => false,
            ScoringError::NothingToUndo => false,
            _ => true,
        }
    }
}

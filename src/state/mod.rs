//! Scoring state for cricket matches.
//!
//! - `player` - Players, teams and per-player figures
//! - `ball` - Delivery events, extras, wickets and the recorded history
//! - `innings` - One side's innings: score, lineup, over bookkeeping
//! - `engine` - Pure scoring rules applied to an innings
//! - `cricket_match` - Match lifecycle and the match manager
//! - `error` - Scoring errors
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          MatchManager                             │
//! │                                                                   │
//! │   match_id → Match            match_id → [ball keys]              │
//! │                                                                   │
//! │   ┌──────────────────────────────────────────────────────────┐    │
//! │   │ Match                                                     │    │
//! │   │   NotStarted ──▶ InProgress ──▶ Completed                 │    │
//! │   │                                                           │    │
//! │   │   Innings 1 (A bats) ──end──▶ Innings 2 (B chases)        │    │
//! │   └──────────────────────────────────────────────────────────┘    │
//! │                                                                   │
//! │   ┌──────────────────────────────────────────────────────────┐    │
//! │   │ Innings                                                   │    │
//! │   │   BallEvent ──engine::score_delivery──▶ BallOutcome       │    │
//! │   │   BallOutcome ──apply──▶ score, figures, history          │    │
//! │   │   history ──engine::replay_innings──▶ Innings             │    │
//! │   └──────────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use cricket_scoring::state::{
//!     BallEvent, End, Match, MatchFormat, Player, Team, TeamId,
//! };
//!
//! let squad = |prefix: &str| {
//!     (1..=11)
//!         .map(|i| Player::new(format!("{prefix}{i}"), format!("Player {prefix}{i}")))
//!         .collect::<Vec<_>>()
//! };
//! let mut game = Match::new(
//!     "m1",
//!     Team::new(TeamId::A, "Hawks", squad("a")),
//!     Team::new(TeamId::B, "Owls", squad("b")),
//!     MatchFormat::Overs(20),
//! );
//!
//! game.start()?;
//! game.assign_batsman(End::Striker, "a1")?;
//! game.assign_batsman(End::NonStriker, "a2")?;
//! game.select_bowler("b1")?;
//! game.record_ball(&BallEvent::runs(4))?;
//!
//! assert_eq!(game.current().map(|i| i.score.runs), Some(4));
//! # Ok::<(), cricket_scoring::state::ScoringError>(())
//! ```

pub mod ball;
pub mod cricket_match;
pub mod engine;
pub mod error;
pub mod innings;
pub mod player;

// Re-export commonly used types
pub use ball::{
    safe_number, BallEvent, BallInput, BallRecord, Extras, Wicket, WicketInput, WicketKind,
    MAX_RUNS_PER_BALL,
};
pub use cricket_match::{Margin, Match, MatchFormat, MatchManager, MatchResult, MatchStatus};
pub use engine::{
    complete_over, end_innings, record_ball, replay_innings, score_delivery, select_bowler,
    start_match, BallOutcome, BattingDelta, BowlingDelta, FieldingDelta,
};
pub use error::ScoringError;
pub use innings::{
    End, Innings, InningsScore, InningsStatus, Lineup, OverTally, BALLS_PER_OVER, MAX_WICKETS,
};
pub use player::{
    format_overs, BattingStats, BowlingStats, Dismissal, FieldingStats, Player, PlayerId, Team,
    TeamId,
};

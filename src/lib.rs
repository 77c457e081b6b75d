//! Cricket Scoring Library
//!
//! Ball-by-ball scoring state for limited and unlimited overs cricket.
//!
//! # Overview
//!
//! - **Delivery scoring** - Runs, extras, wickets and free hits applied to an
//!   innings, with strike rotation and batting, bowling and fielding figures.
//!
//! - **Over bookkeeping** - Overs close explicitly; the same bowler may not
//!   bowl consecutive overs; maidens are credited when an over closes.
//!
//! - **Match lifecycle** - Two innings, a chase target and a result.
//!
//! - **History** - Every delivery is kept, so an innings can be rebuilt or
//!   its last ball undone by replay.
//!
//! # Design Principles
//!
//! 1. **Validated transitions** - A rejected ball leaves the state exactly as
//!    it was and says why.
//!
//! 2. **Pure rules** - `engine` computes a delivery's effect without touching
//!    the innings; applying it is a separate step.
//!
//! 3. **No I/O** - Persistence and publishing belong to the caller.
//!
//! 4. **Serialization-ready** - Every type derives serde, and snapshots are
//!    available as JSON for viewers.
//!
//! # Example
//!
//! ```rust
//! use cricket_scoring::state::{
//!     BallEvent, End, Match, MatchFormat, MatchManager, Player, Team, TeamId, WicketKind,
//! };
//!
//! let squad = |prefix: &str| {
//!     (1..=11)
//!         .map(|i| Player::new(format!("{prefix}{i}"), format!("Player {prefix}{i}")))
//!         .collect::<Vec<_>>()
//! };
//!
//! let mut manager = MatchManager::new();
//! manager.add(Match::new(
//!     "final",
//!     Team::new(TeamId::A, "Hawks", squad("a")),
//!     Team::new(TeamId::B, "Owls", squad("b")),
//!     MatchFormat::Overs(20),
//! ))
//! .unwrap();
//!
//! manager.start("final").unwrap();
//! manager.assign_batsman("final", End::Striker, "a1").unwrap();
//! manager.assign_batsman("final", End::NonStriker, "a2").unwrap();
//! manager.select_bowler("final", "b1").unwrap();
//!
//! manager.record_ball("final", "1", &BallEvent::runs(4)).unwrap();
//! manager.record_ball("final", "2", &BallEvent::wicket(WicketKind::Bowled)).unwrap();
//!
//! // A resubmitted delivery is refused
//! assert!(manager.record_ball("final", "2", &BallEvent::dot()).is_err());
//!
//! let innings = manager.get("final").and_then(|m| m.current()).unwrap();
//! assert_eq!((innings.score.runs, innings.score.wickets), (4, 1));
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;

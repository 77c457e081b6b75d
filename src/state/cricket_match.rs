//! Match lifecycle.
//!
//! A match owns both teams and up to two innings. It moves
//! `NotStarted -> InProgress -> Completed`; the innings inside it carry the
//! ball-by-ball state.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ball::{safe_number, BallEvent, BallRecord};
use super::engine::BallOutcome;
use super::error::ScoringError;
use super::innings::{End, Innings, MAX_WICKETS};
use super::player::{Team, TeamId};

/// Overs per innings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchFormat {
    Overs(u32),
    Unlimited,
}

impl Default for MatchFormat {
    fn default() -> Self {
        Self::Overs(20)
    }
}

impl MatchFormat {
    pub fn max_overs(&self) -> Option<u32> {
        match self {
            Self::Overs(n) => Some(*n),
            Self::Unlimited => None,
        }
    }

    /// Resolve a hosting-form match type. `Casual` takes its over count from
    /// `casual_overs`; an unusable count yields `None`.
    pub fn from_label(label: &str, casual_overs: Option<&str>) -> Option<Self> {
        match label.trim() {
            "T20" => Some(Self::Overs(20)),
            "ODI" => Some(Self::Overs(50)),
            "10-over" => Some(Self::Overs(10)),
            "5-over" => Some(Self::Overs(5)),
            "Test" | "Test (Unlimited Overs)" => Some(Self::Unlimited),
            "Casual" => {
                let raw = casual_overs?.trim();
                if raw.eq_ignore_ascii_case("unlimited") {
                    return Some(Self::Unlimited);
                }
                match safe_number(&serde_json::Value::String(raw.to_string())) {
                    0 => None,
                    n => Some(Self::Overs(n)),
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overs(n) => write!(f, "{} overs", n),
            Self::Unlimited => write!(f, "unlimited overs"),
        }
    }
}

/// Match lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

/// How a completed match was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Margin {
    Runs(u32),
    Wickets(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Won { team: TeamId, margin: Margin },
    Tie,
}

/// A two-innings limited or unlimited overs match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,

    /// Display name, e.g. "Sunday League Final"
    pub name: String,

    pub venue: Option<String>,

    team_a: Team,
    team_b: Team,

    pub format: MatchFormat,

    pub status: MatchStatus,

    /// 0 before the match starts, then 1 or 2
    pub current_innings: u8,

    innings: Vec<Innings>,

    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Match {
    /// Create a match. Team IDs are forced to A and B.
    pub fn new(id: impl Into<String>, mut team_a: Team, mut team_b: Team, format: MatchFormat) -> Self {
        team_a.id = TeamId::A;
        team_b.id = TeamId::B;
        let name = format!("{} vs {}", team_a.name, team_b.name);
        Self {
            id: id.into(),
            name,
            venue: None,
            team_a,
            team_b,
            format,
            status: MatchStatus::NotStarted,
            current_innings: 0,
            innings: Vec::new(),
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    pub fn team(&self, id: TeamId) -> &Team {
        match id {
            TeamId::A => &self.team_a,
            TeamId::B => &self.team_b,
        }
    }

    /// Innings by number (1 or 2).
    pub fn innings(&self, number: u8) -> Option<&Innings> {
        self.innings.get(usize::from(number).checked_sub(1)?)
    }

    pub fn current(&self) -> Option<&Innings> {
        self.innings(self.current_innings)
    }

    pub fn current_mut(&mut self) -> Option<&mut Innings> {
        let index = usize::from(self.current_innings).checked_sub(1)?;
        self.innings.get_mut(index)
    }

    fn invalid(&self, action: &'static str) -> ScoringError {
        ScoringError::InvalidStateTransition {
            action,
            status: self.status.as_str(),
        }
    }

    /// The innings in play, or an error naming the attempted action.
    fn active_innings(&mut self, action: &'static str) -> Result<&mut Innings, ScoringError> {
        if !self.status.is_active() {
            return Err(self.invalid(action));
        }
        let status = self.status.as_str();
        self.current_mut()
            .ok_or(ScoringError::InvalidStateTransition { action, status })
    }

    /// Start the match: team A bats first.
    pub fn start(&mut self) -> Result<(), ScoringError> {
        if self.status != MatchStatus::NotStarted {
            return Err(self.invalid("start match"));
        }

        let mut first = Innings::new(1, TeamId::A, TeamId::B, self.format.max_overs());
        first.start()?;
        self.innings = vec![first];
        self.current_innings = 1;
        self.status = MatchStatus::InProgress;
        self.started_at = Some(Utc::now());

        log::info!("Match {} started: {} ({})", self.id, self.name, self.format);
        Ok(())
    }

    /// Close the current innings. After the first, the sides swap and the
    /// second innings starts chasing; after the second, the match ends.
    pub fn end_innings(&mut self) -> Result<(), ScoringError> {
        let innings = self.active_innings("end innings")?;
        innings.end()?;
        let (number, runs, batting, bowling) = (
            innings.number,
            innings.score.runs,
            innings.batting_team,
            innings.bowling_team,
        );

        if number == 1 {
            let mut second = Innings::new(2, bowling, batting, self.format.max_overs())
                .with_target(runs + 1);
            second.start()?;
            self.innings.push(second);
            self.current_innings = 2;
            log::info!(
                "Match {}: {} need {} to win",
                self.id,
                self.team(bowling).name,
                runs + 1
            );
        } else {
            self.status = MatchStatus::Completed;
            self.ended_at = Some(Utc::now());
            log::info!("Match {} completed: {:?}", self.id, self.result());
        }
        Ok(())
    }

    pub fn record_ball(&mut self, event: &BallEvent) -> Result<BallOutcome, ScoringError> {
        self.active_innings("record a ball")?.record_ball_mut(event)
    }

    pub fn complete_over(&mut self) -> Result<(), ScoringError> {
        self.active_innings("complete an over")?.complete_over_mut()
    }

    /// Hand the ball to a member of the fielding side.
    pub fn select_bowler(&mut self, player_id: &str) -> Result<(), ScoringError> {
        let innings = self.active_innings("select a bowler")?;
        let bowling = innings.bowling_team;
        if !self.team(bowling).has_player(player_id) {
            return Err(ScoringError::UnknownPlayer(player_id.to_string(), "bowling"));
        }
        self.active_innings("select a bowler")?.select_bowler_mut(player_id)
    }

    /// Send a member of the batting side in at one end.
    pub fn assign_batsman(&mut self, end: End, player_id: &str) -> Result<(), ScoringError> {
        let innings = self.active_innings("assign a batsman")?;
        let batting = innings.batting_team;
        if !self.team(batting).has_player(player_id) {
            return Err(ScoringError::UnknownPlayer(player_id.to_string(), "batting"));
        }
        self.active_innings("assign a batsman")?.assign_batsman(end, player_id)
    }

    pub fn undo_last_ball(&mut self) -> Result<BallRecord, ScoringError> {
        self.active_innings("undo a ball")?.undo_last_ball()
    }

    /// Result once both innings are complete.
    pub fn result(&self) -> Option<MatchResult> {
        if self.status != MatchStatus::Completed {
            return None;
        }
        let first = self.innings(1)?;
        let second = self.innings(2)?;

        let result = match second.score.runs.cmp(&first.score.runs) {
            std::cmp::Ordering::Greater => MatchResult::Won {
                team: second.batting_team,
                margin: Margin::Wickets(MAX_WICKETS.saturating_sub(second.score.wickets)),
            },
            std::cmp::Ordering::Less => MatchResult::Won {
                team: first.batting_team,
                margin: Margin::Runs(first.score.runs - second.score.runs),
            },
            std::cmp::Ordering::Equal => MatchResult::Tie,
        };
        Some(result)
    }

    /// Viewer snapshot of the whole match.
    pub fn to_json(&self) -> serde_json::Value {
        let innings: Vec<serde_json::Value> = self
            .innings
            .iter()
            .map(|i| i.to_json(self.team(i.batting_team), self.team(i.bowling_team)))
            .collect();

        let team_json = |team: &Team| {
            let score = self
                .innings
                .iter()
                .find(|i| i.batting_team == team.id)
                .map(|i| {
                    serde_json::json!({
                        "runs": i.score.runs,
                        "wickets": i.score.wickets,
                        "overs": i.score.overs()
                    })
                });
            serde_json::json!({
                "name": team.name,
                "players": team.players(),
                "score": score
            })
        };

        let result = self.result().map(|r| match r {
            MatchResult::Won { team, margin } => {
                let by = match margin {
                    Margin::Runs(n) => format!("{} runs", n),
                    Margin::Wickets(n) => format!("{} wickets", n),
                };
                format!("{} won by {}", self.team(team).name, by)
            }
            MatchResult::Tie => "Match tied".to_string(),
        });

        serde_json::json!({
            "match_id": self.id,
            "name": self.name,
            "venue": self.venue,
            "format": self.format.to_string(),
            "status": self.status.as_str(),
            "current_innings": self.current_innings,
            "teams": {
                "teamA": team_json(&self.team_a),
                "teamB": team_json(&self.team_b)
            },
            "innings": innings,
            "result": result
        })
    }
}

/// Match manager - owns every match being scored.
///
/// Taking `&mut self` for every mutation gives one writer per match; callers
/// sharing a manager across tasks wrap it in their own lock. Each delivery
/// carries a caller-assigned key so a resubmitted ball is refused instead of
/// double-counted.
#[derive(Debug, Default)]
pub struct MatchManager {
    matches: HashMap<String, Match>,
    ball_keys: HashMap<String, BallKeys>,
}

/// Keys of accepted deliveries for one match.
#[derive(Debug, Default)]
struct BallKeys {
    /// Acceptance order, newest last
    order: Vec<String>,
    seen: HashSet<String>,
}

impl BallKeys {
    fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    fn push(&mut self, key: &str) {
        self.seen.insert(key.to_string());
        self.order.push(key.to_string());
    }

    fn pop(&mut self) -> Option<String> {
        let key = self.order.pop()?;
        self.seen.remove(&key);
        Some(key)
    }
}

impl MatchManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a match. An ID already in use is refused so its ball keys stay
    /// bound to the balls they recorded.
    pub fn add(&mut self, game: Match) -> Result<(), ScoringError> {
        if self.matches.contains_key(&game.id) {
            return Err(ScoringError::DuplicateMatch(game.id));
        }
        self.ball_keys.insert(game.id.clone(), BallKeys::default());
        self.matches.insert(game.id.clone(), game);
        Ok(())
    }

    pub fn get(&self, match_id: &str) -> Option<&Match> {
        self.matches.get(match_id)
    }

    fn get_mut(&mut self, match_id: &str) -> Result<&mut Match, ScoringError> {
        self.matches
            .get_mut(match_id)
            .ok_or_else(|| ScoringError::MatchNotFound(match_id.to_string()))
    }

    pub fn remove(&mut self, match_id: &str) -> Option<Match> {
        self.ball_keys.remove(match_id);
        self.matches.remove(match_id)
    }

    pub fn start(&mut self, match_id: &str) -> Result<(), ScoringError> {
        self.get_mut(match_id)?.start()
    }

    pub fn end_innings(&mut self, match_id: &str) -> Result<(), ScoringError> {
        self.get_mut(match_id)?.end_innings()
    }

    pub fn complete_over(&mut self, match_id: &str) -> Result<(), ScoringError> {
        self.get_mut(match_id)?.complete_over()
    }

    pub fn select_bowler(&mut self, match_id: &str, player_id: &str) -> Result<(), ScoringError> {
        self.get_mut(match_id)?.select_bowler(player_id)
    }

    pub fn assign_batsman(
        &mut self,
        match_id: &str,
        end: End,
        player_id: &str,
    ) -> Result<(), ScoringError> {
        self.get_mut(match_id)?.assign_batsman(end, player_id)
    }

    /// Whether a delivery key has already been accepted for a match.
    pub fn is_recorded(&self, match_id: &str, ball_key: &str) -> bool {
        self.ball_keys
            .get(match_id)
            .is_some_and(|keys| keys.contains(ball_key))
    }

    /// Record a delivery exactly once per key.
    pub fn record_ball(
        &mut self,
        match_id: &str,
        ball_key: &str,
        event: &BallEvent,
    ) -> Result<BallOutcome, ScoringError> {
        if self.is_recorded(match_id, ball_key) {
            return Err(ScoringError::DuplicateBall(ball_key.to_string()));
        }
        let outcome = self.get_mut(match_id)?.record_ball(event)?;
        self.ball_keys
            .entry(match_id.to_string())
            .or_default()
            .push(ball_key);
        Ok(outcome)
    }

    /// Undo the last delivery of the current innings. Its key is released so
    /// a corrected ball can be submitted under it.
    pub fn undo_last_ball(&mut self, match_id: &str) -> Result<BallRecord, ScoringError> {
        let record = self.get_mut(match_id)?.undo_last_ball()?;
        if let Some(keys) = self.ball_keys.get_mut(match_id) {
            keys.pop();
        }
        Ok(record)
    }

    /// Snapshot for publishing to viewers.
    pub fn snapshot(&self, match_id: &str) -> Option<serde_json::Value> {
        self.get(match_id).map(|m| m.to_json())
    }

    pub fn active_count(&self) -> usize {
        self.matches.values().filter(|m| m.status.is_active()).count()
    }

    pub fn count(&self) -> usize {
        self.matches.len()
    }
}

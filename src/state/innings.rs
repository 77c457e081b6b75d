//! Innings state.
//!
//! An innings owns the score, the append-only ball history, the per-player
//! figures and the current lineup. Deliveries are scored by
//! [`engine::score_delivery`](super::engine::score_delivery) and applied here.
//!
//! # Over cycle
//!
//! ```text
//!  select_bowler ──▶ record_ball × 6 legal ──▶ complete_over ──┐
//!        ▲                                                     │
//!        └──────────── (previous bowler barred) ◀──────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ball::{BallEvent, BallRecord, Extras};
use super::engine::{self, BallOutcome};
use super::error::ScoringError;
use super::player::{
    format_overs, BattingStats, BowlingStats, Dismissal, FieldingStats, PlayerId, Team, TeamId,
};

/// Legal deliveries per over.
pub const BALLS_PER_OVER: u32 = 6;

/// Wickets that end an innings.
pub const MAX_WICKETS: u32 = 10;

/// Innings lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InningsStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl InningsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

/// Running score of an innings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InningsScore {
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    pub extras: Extras,
}

impl InningsScore {
    /// Overs bowled in `O.B` notation.
    pub fn overs(&self) -> String {
        format_overs(self.legal_balls)
    }

    /// Runs per over, 0 before the first legal ball.
    pub fn run_rate(&self) -> f64 {
        if self.legal_balls == 0 {
            0.0
        } else {
            self.runs as f64 * BALLS_PER_OVER as f64 / self.legal_balls as f64
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "runs": self.runs,
            "wickets": self.wickets,
            "balls": self.legal_balls,
            "overs": self.overs(),
            "run_rate": self.run_rate(),
            "extras": {
                "wides": self.extras.wides,
                "no_balls": self.extras.no_balls,
                "byes": self.extras.byes,
                "leg_byes": self.extras.leg_byes,
                "penalty": self.extras.penalty,
                "total": self.extras.total()
            }
        })
    }
}

/// Crease ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Striker,
    NonStriker,
}

/// Who is batting and bowling right now.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lineup {
    pub striker: Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
    pub bowler: Option<PlayerId>,
}

impl Lineup {
    /// The lineup a recorded ball was bowled with.
    pub fn from_record(record: &BallRecord) -> Self {
        Self {
            striker: Some(record.striker.clone()),
            non_striker: Some(record.non_striker.clone()),
            bowler: Some(record.bowler.clone()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.striker.is_some() && self.non_striker.is_some() && self.bowler.is_some()
    }

    pub fn swap_strike(&mut self) {
        std::mem::swap(&mut self.striker, &mut self.non_striker);
    }

    /// Clear whichever end the player is at.
    fn remove_batsman(&mut self, player_id: &str) {
        if self.striker.as_deref() == Some(player_id) {
            self.striker = None;
        }
        if self.non_striker.as_deref() == Some(player_id) {
            self.non_striker = None;
        }
    }
}

/// Runs conceded in the over in progress, for maiden detection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverTally {
    bowler: Option<PlayerId>,
    conceded: u32,
    shared: bool,
}

impl OverTally {
    /// Whether the over would be a maiden for `bowler` if it ended on a ball
    /// conceding `runs`.
    pub fn is_maiden_with(&self, bowler: &str, runs: u32) -> bool {
        let shared = self.shared || self.bowler.as_deref().is_some_and(|b| b != bowler);
        !shared && self.conceded + runs == 0
    }

    fn record(&mut self, bowler: &str, runs: u32) {
        match &self.bowler {
            Some(b) if b != bowler => self.shared = true,
            Some(_) => {}
            None => self.bowler = Some(bowler.to_string()),
        }
        self.conceded = self.conceded.saturating_add(runs);
    }
}

/// One innings of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Innings {
    /// 1 or 2
    pub number: u8,

    pub batting_team: TeamId,
    pub bowling_team: TeamId,

    pub status: InningsStatus,

    pub score: InningsScore,

    /// Current striker, non-striker and bowler
    pub lineup: Lineup,

    /// Bowler of the most recently completed over
    pub last_bowler: Option<PlayerId>,

    /// Whether the next delivery is a free hit
    pub free_hit: bool,

    /// Over limit from the match format
    pub max_overs: Option<u32>,

    /// Runs needed to win (second innings only)
    pub target: Option<u32>,

    overs_completed: u32,

    over_tally: OverTally,

    /// Accepted deliveries in order
    balls: Vec<BallRecord>,

    batting: BTreeMap<PlayerId, BattingStats>,
    bowling: BTreeMap<PlayerId, BowlingStats>,
    fielding: BTreeMap<PlayerId, FieldingStats>,
}

impl Innings {
    /// Create an innings that has not started yet.
    pub fn new(
        number: u8,
        batting_team: TeamId,
        bowling_team: TeamId,
        max_overs: Option<u32>,
    ) -> Self {
        Self {
            number,
            batting_team,
            bowling_team,
            status: InningsStatus::NotStarted,
            score: InningsScore::default(),
            lineup: Lineup::default(),
            last_bowler: None,
            free_hit: false,
            max_overs,
            target: None,
            overs_completed: 0,
            over_tally: OverTally::default(),
            balls: Vec::new(),
            batting: BTreeMap::new(),
            bowling: BTreeMap::new(),
            fielding: BTreeMap::new(),
        }
    }

    pub fn with_target(mut self, target: u32) -> Self {
        self.target = Some(target);
        self
    }

    /// Same teams, format and target, no balls bowled, in progress.
    pub fn fresh(&self) -> Self {
        let mut fresh = Self::new(
            self.number,
            self.batting_team,
            self.bowling_team,
            self.max_overs,
        );
        fresh.target = self.target;
        fresh.status = InningsStatus::InProgress;
        fresh
    }

    pub fn start(&mut self) -> Result<(), ScoringError> {
        if self.status != InningsStatus::NotStarted {
            return Err(self.invalid("start innings"));
        }
        self.status = InningsStatus::InProgress;
        Ok(())
    }

    pub fn end(&mut self) -> Result<(), ScoringError> {
        if self.status != InningsStatus::InProgress {
            return Err(self.invalid("end innings"));
        }
        self.status = InningsStatus::Completed;
        log::info!(
            "Innings {} closed at {}/{} ({} ov)",
            self.number,
            self.score.runs,
            self.score.wickets,
            self.score.overs()
        );
        Ok(())
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == InningsStatus::InProgress
    }

    pub(crate) fn invalid(&self, action: &'static str) -> ScoringError {
        ScoringError::InvalidStateTransition {
            action,
            status: self.status.as_str(),
        }
    }

    // Lineup

    /// Put a batsman in at one end.
    pub fn assign_batsman(&mut self, end: End, player_id: &str) -> Result<(), ScoringError> {
        if !self.is_in_progress() {
            return Err(self.invalid("assign a batsman"));
        }

        if self.batting_stats(player_id).is_some_and(|s| s.dismissal.is_out()) {
            return Err(ScoringError::BatsmanAlreadyOut(player_id.to_string()));
        }

        let other = match end {
            End::Striker => &self.lineup.non_striker,
            End::NonStriker => &self.lineup.striker,
        };
        if other.as_deref() == Some(player_id) {
            return Err(ScoringError::SameBatsmen);
        }

        let slot = match end {
            End::Striker => &mut self.lineup.striker,
            End::NonStriker => &mut self.lineup.non_striker,
        };
        *slot = Some(player_id.to_string());
        Ok(())
    }

    /// Open the batting with both batsmen.
    pub fn open_batting(&mut self, striker: &str, non_striker: &str) -> Result<(), ScoringError> {
        if striker == non_striker {
            return Err(ScoringError::SameBatsmen);
        }
        self.lineup.striker = None;
        self.lineup.non_striker = None;
        self.assign_batsman(End::Striker, striker)?;
        self.assign_batsman(End::NonStriker, non_striker)
    }

    /// Hand the ball to a bowler. The bowler of the previous over is barred.
    pub fn select_bowler_mut(&mut self, candidate: &str) -> Result<(), ScoringError> {
        if !self.is_in_progress() {
            return Err(self.invalid("select a bowler"));
        }
        if self.last_bowler.as_deref() == Some(candidate) {
            return Err(ScoringError::ConsecutiveOver(candidate.to_string()));
        }
        self.lineup.bowler = Some(candidate.to_string());
        Ok(())
    }

    // Deliveries

    /// Score a delivery in place. Nothing changes on error.
    pub fn record_ball_mut(&mut self, event: &BallEvent) -> Result<BallOutcome, ScoringError> {
        let outcome = engine::score_delivery(self, event)?;
        self.apply(&outcome);
        Ok(outcome)
    }

    /// Apply a scored delivery. The outcome must come from `score_delivery`
    /// against this exact state.
    pub(crate) fn apply(&mut self, outcome: &BallOutcome) {
        let record = &outcome.record;

        self.score.runs = self.score.runs.saturating_add(record.total_runs);
        if record.is_legal() {
            self.score.legal_balls += 1;
        }
        if record.dismissed.is_some() {
            self.score.wickets += 1;
        }
        self.score.extras.add(&record.event.extras);

        self.batting.entry(record.non_striker.clone()).or_default();
        let batting = &outcome.batting;
        let striker = self.batting.entry(batting.player_id.clone()).or_default();
        striker.runs = striker.runs.saturating_add(batting.runs);
        striker.balls += batting.balls;
        striker.fours += batting.fours;
        striker.sixes += batting.sixes;

        if let Some((player_id, kind)) = &outcome.dismissal {
            let out = self.batting.entry(player_id.clone()).or_default();
            out.dismissal = Dismissal::Out(*kind);
            out.bowler = kind.credited_to_bowler().then(|| record.bowler.clone());
            out.fielder = outcome.fielding.as_ref().map(|f| f.player_id.clone());
        }

        let delta = &outcome.bowling;
        let bowler = self.bowling.entry(delta.player_id.clone()).or_default();
        bowler.balls += delta.balls;
        bowler.runs = bowler.runs.saturating_add(delta.runs);
        bowler.wickets += delta.wickets;
        bowler.wides += delta.wides;
        bowler.no_balls += delta.no_balls;
        bowler.maidens += delta.maidens;
        bowler.dots += delta.dots;

        if let Some(fielding) = &outcome.fielding {
            self.fielding
                .entry(fielding.player_id.clone())
                .or_default()
                .credit(fielding.kind);
        }

        self.free_hit = outcome.free_hit;

        self.over_tally.record(&delta.player_id, delta.runs);
        if outcome.over_complete {
            self.over_tally = OverTally::default();
        }

        if outcome.strike_rotated {
            self.lineup.swap_strike();
        }
        if let Some(dismissed) = &record.dismissed {
            self.lineup.remove_batsman(dismissed);
        }

        log::debug!(
            "Innings {} ball {}: +{} -> {}/{}",
            self.number,
            record.label(),
            record.total_runs,
            self.score.runs,
            self.score.wickets
        );

        self.balls.push(record.clone());
    }

    // Overs

    /// Whether six legal balls have been bowled since the last completed over.
    pub fn over_pending(&self) -> bool {
        self.score.legal_balls / BALLS_PER_OVER > self.overs_completed
    }

    pub fn overs_completed(&self) -> u32 {
        self.overs_completed
    }

    /// Legal balls bowled in the over in progress.
    pub fn balls_this_over(&self) -> u32 {
        self.score.legal_balls - self.overs_completed * BALLS_PER_OVER
    }

    pub(crate) fn over_tally(&self) -> &OverTally {
        &self.over_tally
    }

    /// Close the over: batsmen change ends and the bowler stands down.
    pub fn complete_over_mut(&mut self) -> Result<(), ScoringError> {
        if !self.is_in_progress() {
            return Err(self.invalid("complete an over"));
        }
        if !self.over_pending() {
            return Err(ScoringError::OverNotComplete {
                legal_balls: self.score.legal_balls,
            });
        }

        self.lineup.swap_strike();
        self.lineup.bowler = None;
        self.last_bowler = self.balls.last().map(|b| b.bowler.clone());
        self.overs_completed += 1;

        log::info!(
            "Innings {} over {} complete: {}/{}",
            self.number,
            self.overs_completed,
            self.score.runs,
            self.score.wickets
        );
        Ok(())
    }

    // Limits

    pub fn is_all_out(&self) -> bool {
        self.score.wickets >= MAX_WICKETS
    }

    pub fn overs_exhausted(&self) -> bool {
        self.max_overs
            .is_some_and(|max| self.score.legal_balls >= max * BALLS_PER_OVER)
    }

    pub fn target_reached(&self) -> bool {
        self.target.is_some_and(|t| self.score.runs >= t)
    }

    /// Runs still needed in a chase.
    pub fn runs_required(&self) -> Option<u32> {
        self.target.map(|t| t.saturating_sub(self.score.runs))
    }

    /// Runs per over needed to win from the balls left. `None` outside a
    /// limited-overs chase, or once no balls remain with runs still needed.
    pub fn required_run_rate(&self) -> Option<f64> {
        let required = self.runs_required()?;
        let max = self.max_overs?;
        let remaining = (max * BALLS_PER_OVER).saturating_sub(self.score.legal_balls);
        if required == 0 {
            Some(0.0)
        } else if remaining == 0 {
            None
        } else {
            Some(required as f64 * BALLS_PER_OVER as f64 / remaining as f64)
        }
    }

    /// Whether the innings has reached a natural end. Closing it is the
    /// caller's decision.
    pub fn should_end(&self) -> bool {
        self.is_all_out() || self.overs_exhausted() || self.target_reached()
    }

    // History

    pub fn balls(&self) -> &[BallRecord] {
        &self.balls
    }

    pub fn last_ball(&self) -> Option<&BallRecord> {
        self.balls.last()
    }

    /// Re-derive this innings from its ball history.
    pub fn rebuild(&self) -> Result<Innings, ScoringError> {
        let mut rebuilt = engine::replay_innings(self, &self.balls)?;
        rebuilt.lineup = self.lineup.clone();
        rebuilt.status = self.status;
        Ok(rebuilt)
    }

    /// Remove the last delivery by replaying everything before it. The
    /// lineup goes back to the one that ball was bowled with.
    pub fn undo_last_ball(&mut self) -> Result<BallRecord, ScoringError> {
        if !self.is_in_progress() {
            return Err(self.invalid("undo a ball"));
        }
        let (last, earlier) = self.balls.split_last().ok_or(ScoringError::NothingToUndo)?;

        let mut rebuilt = engine::replay_innings(self, earlier)?;
        rebuilt.lineup = Lineup::from_record(last);
        let last = last.clone();
        *self = rebuilt;

        log::info!("Innings {} ball {} undone", self.number, last.label());
        Ok(last)
    }

    // Figures

    pub fn batting_stats(&self, player_id: &str) -> Option<&BattingStats> {
        self.batting.get(player_id)
    }

    pub fn bowling_stats(&self, player_id: &str) -> Option<&BowlingStats> {
        self.bowling.get(player_id)
    }

    pub fn fielding_stats(&self, player_id: &str) -> Option<&FieldingStats> {
        self.fielding.get(player_id)
    }

    pub fn batting_card(&self) -> impl Iterator<Item = (&PlayerId, &BattingStats)> {
        self.batting.iter()
    }

    pub fn bowling_card(&self) -> impl Iterator<Item = (&PlayerId, &BowlingStats)> {
        self.bowling.iter()
    }

    pub fn fielding_card(&self) -> impl Iterator<Item = (&PlayerId, &FieldingStats)> {
        self.fielding.iter()
    }

    /// Viewer snapshot with names resolved from the team sheets.
    pub fn to_json(&self, batting: &Team, bowling: &Team) -> serde_json::Value {
        let name_entry = |team: &Team, id: &PlayerId, stats: serde_json::Value| {
            let mut obj = stats;
            obj["id"] = serde_json::json!(id);
            obj["name"] = serde_json::json!(team.player_name(id));
            obj
        };

        let batting_card: Vec<serde_json::Value> = self
            .batting
            .iter()
            .map(|(id, s)| {
                let mut obj = name_entry(batting, id, s.to_json());
                obj["how_out"] = serde_json::json!(s.how_out(bowling));
                obj
            })
            .collect();
        let bowling_card: Vec<serde_json::Value> = self
            .bowling
            .iter()
            .map(|(id, s)| name_entry(bowling, id, s.to_json()))
            .collect();
        let fielding_card: Vec<serde_json::Value> = self
            .fielding
            .iter()
            .map(|(id, s)| name_entry(bowling, id, s.to_json()))
            .collect();

        // Newest first
        let history: Vec<serde_json::Value> = self
            .balls
            .iter()
            .rev()
            .map(|b| {
                let mut obj = b.to_json();
                obj["description"] = serde_json::json!(b.describe(batting, bowling));
                obj
            })
            .collect();

        serde_json::json!({
            "number": self.number,
            "batting_team": self.batting_team.as_str(),
            "bowling_team": self.bowling_team.as_str(),
            "status": self.status.as_str(),
            "score": self.score.to_json(),
            "striker": self.lineup.striker,
            "non_striker": self.lineup.non_striker,
            "bowler": self.lineup.bowler,
            "free_hit": self.free_hit,
            "target": self.target,
            "runs_required": self.runs_required(),
            "required_run_rate": self.required_run_rate(),
            "batting": batting_card,
            "bowling": bowling_card,
            "fielding": fielding_card,
            "balls": history
        })
    }
}

//! Players, teams and per-innings player statistics.
//!
//! Players are immutable once a team is created. Statistics live on the
//! innings and are keyed by player ID.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ball::WicketKind;

/// Player ID, unique within a match.
pub type PlayerId = String;

/// A player on a team sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Which side of the fixture a team is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamId {
    #[serde(rename = "teamA")]
    A,
    #[serde(rename = "teamB")]
    B,
}

impl TeamId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "teamA",
            Self::B => "teamB",
        }
    }

    /// The other side.
    pub fn opponent(&self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A team and its ordered squad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    players: Vec<Player>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, players: Vec<Player>) -> Self {
        Self {
            id,
            name: name.into(),
            players,
        }
    }

    /// Players in squad order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.player(player_id).is_some()
    }

    /// Display name for a player ID, falling back to the ID itself.
    pub fn player_name<'a>(&'a self, player_id: &'a str) -> &'a str {
        self.player(player_id)
            .map(|p| p.name.as_str())
            .unwrap_or(player_id)
    }
}

/// Whether a batsman is still in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dismissal {
    #[default]
    Batting,
    Out(WicketKind),
}

impl Dismissal {
    pub fn is_out(&self) -> bool {
        matches!(self, Self::Out(_))
    }
}

impl fmt::Display for Dismissal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Batting => write!(f, "batting"),
            Self::Out(kind) => write!(f, "out ({})", kind),
        }
    }
}

/// Batting figures for one innings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattingStats {
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub dismissal: Dismissal,
    /// Bowler credited with the wicket
    pub bowler: Option<PlayerId>,
    /// Catcher, run-out fielder or keeper
    pub fielder: Option<PlayerId>,
}

impl BattingStats {
    /// Runs per hundred balls faced, 0 before the first ball.
    pub fn strike_rate(&self) -> f64 {
        if self.balls == 0 {
            0.0
        } else {
            self.runs as f64 / self.balls as f64 * 100.0
        }
    }

    /// Scorecard dismissal line, e.g. "c Kumar b Singh".
    pub fn how_out(&self, fielding: &Team) -> String {
        let kind = match self.dismissal {
            Dismissal::Batting => return "not out".to_string(),
            Dismissal::Out(kind) => kind,
        };
        let bowler = self
            .bowler
            .as_deref()
            .map(|id| format!("b {}", fielding.player_name(id)));
        let fielder = self.fielder.as_deref().map(|id| fielding.player_name(id));

        let parts: Vec<String> = match kind {
            WicketKind::Bowled => vec![bowler.unwrap_or_else(|| "bowled".into())],
            WicketKind::Caught if self.fielder.is_some() && self.fielder == self.bowler => {
                vec![format!("c & {}", bowler.unwrap_or_default())]
            }
            WicketKind::Caught => vec![
                fielder.map_or_else(|| "caught".to_string(), |f| format!("c {}", f)),
                bowler.unwrap_or_default(),
            ],
            WicketKind::Lbw => vec!["lbw".into(), bowler.unwrap_or_default()],
            WicketKind::Stumped => vec![
                fielder.map_or_else(|| "stumped".to_string(), |f| format!("st {}", f)),
                bowler.unwrap_or_default(),
            ],
            WicketKind::HitWicket => vec!["hit wicket".into(), bowler.unwrap_or_default()],
            WicketKind::RunOut => vec![fielder
                .map_or_else(|| "run out".to_string(), |f| format!("run out ({})", f))],
            WicketKind::Obstructing => vec!["obstructing the field".into()],
        };

        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "runs": self.runs,
            "balls": self.balls,
            "fours": self.fours,
            "sixes": self.sixes,
            "status": self.dismissal.to_string(),
            "bowler": self.bowler,
            "fielder": self.fielder,
            "strike_rate": self.strike_rate()
        })
    }
}

/// Bowling figures for one innings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BowlingStats {
    /// Legal balls bowled
    pub balls: u32,
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
    pub wides: u32,
    pub no_balls: u32,
    /// Legal balls conceding nothing to the bowler
    pub dots: u32,
}

impl BowlingStats {
    /// Runs conceded per six legal balls, 0 before the first legal ball.
    pub fn economy(&self) -> f64 {
        if self.balls == 0 {
            0.0
        } else {
            self.runs as f64 * 6.0 / self.balls as f64
        }
    }

    /// Overs bowled in `O.B` notation.
    pub fn overs(&self) -> String {
        format_overs(self.balls)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "overs": self.overs(),
            "maidens": self.maidens,
            "runs": self.runs,
            "wickets": self.wickets,
            "wides": self.wides,
            "no_balls": self.no_balls,
            "dots": self.dots,
            "economy": self.economy()
        })
    }
}

/// Fielding figures for one innings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldingStats {
    pub catches: u32,
    pub run_outs: u32,
    pub stumpings: u32,
}

impl FieldingStats {
    /// Credit a dismissal to this fielder. Returns false for dismissal types
    /// that carry no fielding credit.
    pub fn credit(&mut self, kind: WicketKind) -> bool {
        match kind {
            WicketKind::Caught => self.catches += 1,
            WicketKind::RunOut => self.run_outs += 1,
            WicketKind::Stumped => self.stumpings += 1,
            _ => return false,
        }
        true
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "catches": self.catches,
            "run_outs": self.run_outs,
            "stumpings": self.stumpings
        })
    }
}

/// Format a legal-ball count as overs, e.g. 14 balls -> "2.2".
pub fn format_overs(legal_balls: u32) -> String {
    let per_over = super::innings::BALLS_PER_OVER;
    format!("{}.{}", legal_balls / per_over, legal_balls % per_over)
}

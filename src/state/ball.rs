//! Deliveries.
//!
//! A `BallEvent` is what the scorer submits; a `BallRecord` is the accepted,
//! immutable entry appended to the innings once the engine has scored it.
//! Loosely-typed payloads enter through `BallInput`, which is the only place
//! numeric coercion happens.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ScoringError;
use super::player::{PlayerId, Team};

/// How a batsman was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WicketKind {
    Bowled,
    Caught,
    Lbw,
    #[serde(rename = "runout")]
    RunOut,
    Stumped,
    #[serde(rename = "hitwicket")]
    HitWicket,
    Obstructing,
}

impl WicketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bowled => "bowled",
            Self::Caught => "caught",
            Self::Lbw => "lbw",
            Self::RunOut => "runout",
            Self::Stumped => "stumped",
            Self::HitWicket => "hitwicket",
            Self::Obstructing => "obstructing",
        }
    }

    /// Run outs and obstructing the field are never the bowler's wicket.
    pub fn credited_to_bowler(&self) -> bool {
        matches!(
            self,
            Self::Bowled | Self::Caught | Self::Lbw | Self::Stumped | Self::HitWicket
        )
    }

    /// Only these dismissals can fall on the batsman not facing.
    pub fn can_dismiss_non_striker(&self) -> bool {
        matches!(self, Self::RunOut | Self::Obstructing)
    }
}

impl fmt::Display for WicketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WicketKind {
    type Err = ScoringError;

    /// Accepts the usual spellings: "runout", "run out", "run_out", "Run-Out".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "bowled" => Ok(Self::Bowled),
            "caught" => Ok(Self::Caught),
            "lbw" => Ok(Self::Lbw),
            "runout" => Ok(Self::RunOut),
            "stumped" => Ok(Self::Stumped),
            "hitwicket" => Ok(Self::HitWicket),
            "obstructing" | "obstructingthefield" => Ok(Self::Obstructing),
            _ => Err(ScoringError::UnknownWicketKind(s.to_string())),
        }
    }
}

/// Most runs one delivery may add, counting extras. Anything above this is a
/// scoring slip, not cricket.
pub const MAX_RUNS_PER_BALL: u32 = 100;

/// Extra runs on a delivery, by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Extras {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
    pub penalty: u32,
}

impl Extras {
    pub fn total(&self) -> u32 {
        [self.no_balls, self.byes, self.leg_byes, self.penalty]
            .into_iter()
            .fold(self.wides, u32::saturating_add)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn is_wide(&self) -> bool {
        self.wides > 0
    }

    pub fn is_no_ball(&self) -> bool {
        self.no_balls > 0
    }

    /// Neither a wide nor a no-ball.
    pub fn is_legal(&self) -> bool {
        !self.is_wide() && !self.is_no_ball()
    }

    /// Extras charged to the bowler.
    pub fn bowler_runs(&self) -> u32 {
        self.wides.saturating_add(self.no_balls)
    }

    pub fn add(&mut self, other: &Extras) {
        self.wides = self.wides.saturating_add(other.wides);
        self.no_balls = self.no_balls.saturating_add(other.no_balls);
        self.byes = self.byes.saturating_add(other.byes);
        self.leg_byes = self.leg_byes.saturating_add(other.leg_byes);
        self.penalty = self.penalty.saturating_add(other.penalty);
    }

    /// Non-zero extras as `(label, runs)` pairs.
    pub fn breakdown(&self) -> Vec<(&'static str, u32)> {
        [
            ("wide", self.wides),
            ("noball", self.no_balls),
            ("byes", self.byes),
            ("legbyes", self.leg_byes),
            ("penalty", self.penalty),
        ]
        .into_iter()
        .filter(|(_, runs)| *runs > 0)
        .collect()
    }
}

/// A dismissal on a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wicket {
    pub kind: WicketKind,
    /// Dismissed batsman; `None` means the striker.
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub fielder: Option<PlayerId>,
}

impl Wicket {
    pub fn new(kind: WicketKind) -> Self {
        Self {
            kind,
            player_id: None,
            fielder: None,
        }
    }

    pub fn of(mut self, player_id: impl Into<PlayerId>) -> Self {
        self.player_id = Some(player_id.into());
        self
    }

    pub fn by(mut self, fielder: impl Into<PlayerId>) -> Self {
        self.fielder = Some(fielder.into());
        self
    }
}

/// A delivery as submitted by the scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallEvent {
    /// Runs off the bat
    #[serde(default)]
    pub runs: u32,

    #[serde(default)]
    pub extras: Extras,

    #[serde(default)]
    pub wicket: Option<Wicket>,

    /// When the ball was bowled
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl BallEvent {
    /// Runs off the bat, no extras.
    pub fn runs(runs: u32) -> Self {
        Self {
            runs,
            extras: Extras::default(),
            wicket: None,
            timestamp: Utc::now(),
        }
    }

    pub fn dot() -> Self {
        Self::runs(0)
    }

    pub fn wide(runs: u32) -> Self {
        Self::runs(0).with_extras(Extras {
            wides: runs,
            ..Default::default()
        })
    }

    /// A no-ball with `bat_runs` scored off it.
    pub fn no_ball(bat_runs: u32) -> Self {
        Self::runs(bat_runs).with_extras(Extras {
            no_balls: 1,
            ..Default::default()
        })
    }

    pub fn byes(runs: u32) -> Self {
        Self::runs(0).with_extras(Extras {
            byes: runs,
            ..Default::default()
        })
    }

    pub fn leg_byes(runs: u32) -> Self {
        Self::runs(0).with_extras(Extras {
            leg_byes: runs,
            ..Default::default()
        })
    }

    pub fn wicket(kind: WicketKind) -> Self {
        Self::runs(0).with_wicket(Wicket::new(kind))
    }

    pub fn with_extras(mut self, extras: Extras) -> Self {
        self.extras = extras;
        self
    }

    pub fn with_wicket(mut self, wicket: Wicket) -> Self {
        self.wicket = Some(wicket);
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_legal(&self) -> bool {
        self.extras.is_legal()
    }
}

/// An accepted delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallRecord {
    /// 1-based position in the innings
    pub sequence: u32,

    /// 0-based over index
    pub over: u32,

    /// 1..=6; illegal deliveries share the position of the next legal ball
    pub ball_in_over: u32,

    pub striker: PlayerId,
    pub non_striker: PlayerId,
    pub bowler: PlayerId,

    pub event: BallEvent,

    pub runs_to_batsman: u32,
    pub total_runs: u32,

    /// Resolved dismissed batsman, if any
    pub dismissed: Option<PlayerId>,

    /// Free hit in effect when this ball was bowled
    pub free_hit: bool,
}

impl BallRecord {
    pub fn is_legal(&self) -> bool {
        self.event.is_legal()
    }

    pub fn wicket(&self) -> Option<&Wicket> {
        self.event.wicket.as_ref()
    }

    /// Over and ball, e.g. "3.4".
    pub fn label(&self) -> String {
        format!("{}.{}", self.over, self.ball_in_over)
    }

    /// One-line commentary for the ball history.
    pub fn describe(&self, batting: &Team, bowling: &Team) -> String {
        let mut description = format!(
            "{}: {} to {} - ",
            self.label(),
            bowling.player_name(&self.bowler),
            batting.player_name(&self.striker)
        );

        if let Some(wicket) = self.wicket() {
            description.push_str(&format!("Wicket ({})", wicket.kind));
        } else if self.runs_to_batsman > 0 {
            let plural = if self.runs_to_batsman > 1 { "s" } else { "" };
            description.push_str(&format!("{} run{}", self.runs_to_batsman, plural));
        } else {
            description.push_str("Dot ball");
        }

        let extras = self.event.extras.breakdown();
        if !extras.is_empty() {
            let parts: Vec<String> = extras
                .iter()
                .map(|(label, runs)| format!("{} ({})", label, runs))
                .collect();
            description.push_str(&format!(" + {}", parts.join(", ")));
        }

        description
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "sequence": self.sequence,
            "ball": self.label(),
            "striker": self.striker,
            "non_striker": self.non_striker,
            "bowler": self.bowler,
            "runs": self.runs_to_batsman,
            "total": self.total_runs,
            "free_hit": self.free_hit,
            "timestamp": self.event.timestamp.timestamp_millis()
        });
        let extras = self.event.extras.breakdown();
        if !extras.is_empty() {
            obj["extras"] = extras
                .into_iter()
                .map(|(label, runs)| (label.to_string(), serde_json::json!(runs)))
                .collect::<serde_json::Map<_, _>>()
                .into();
        }
        if let Some(wicket) = self.wicket() {
            obj["wicket"] = serde_json::json!({
                "type": wicket.kind.as_str(),
                "player": self.dismissed,
                "fielder": wicket.fielder
            });
        }
        obj
    }
}

/// Coerce a loosely-typed number to a non-negative run count.
///
/// Integers, finite non-negative floats (truncated) and numeric strings are
/// accepted. Anything else becomes 0.
pub fn safe_number(value: &Value) -> u32 {
    let parsed = match value {
        Value::Null => return 0,
        Value::Number(n) => n
            .as_u64()
            .map(|v| v.min(u32::MAX as u64) as u32)
            .or_else(|| n.as_f64().and_then(float_runs)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_runs))
        }
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        log::warn!("Non-numeric run value {} coerced to 0", value);
        0
    })
}

fn float_runs(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 0.0 {
        Some(value.trunc() as u32)
    } else {
        None
    }
}

/// Wicket descriptor as it arrives from a scoring client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WicketInput {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub fielder: Option<String>,
}

/// Delivery payload as it arrives from a scoring client: every field is
/// optional and numbers may be strings, nulls or garbage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BallInput {
    #[serde(default)]
    pub runs: Value,
    #[serde(default)]
    pub extras: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub wicket: Option<WicketInput>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl BallInput {
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Normalize into a typed event. Only an unrecognized wicket type fails;
    /// implausible run counts pass through for the engine to refuse.
    pub fn into_event(self) -> Result<BallEvent, ScoringError> {
        let mut extras = Extras::default();
        for (key, value) in self.extras.unwrap_or_default() {
            let runs = safe_number(&value);
            let normalized = key.replace(['_', '-'], "").to_ascii_lowercase();
            let slot = match normalized.as_str() {
                "wide" | "wides" => &mut extras.wides,
                "noball" | "noballs" => &mut extras.no_balls,
                "bye" | "byes" => &mut extras.byes,
                "legbye" | "legbyes" => &mut extras.leg_byes,
                "penalty" | "penalties" => &mut extras.penalty,
                _ => {
                    log::warn!("Ignoring unknown extra type {:?}", key);
                    continue;
                }
            };
            *slot = slot.saturating_add(runs);
        }

        let wicket = match self.wicket {
            Some(input) => Some(Wicket {
                kind: input.kind.parse()?,
                player_id: input.player.filter(|p| !p.is_empty()),
                fielder: input.fielder.filter(|f| !f.is_empty()),
            }),
            None => None,
        };

        Ok(BallEvent {
            runs: safe_number(&self.runs),
            extras,
            wicket,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        })
    }
}

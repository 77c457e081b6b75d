//! Scoring engine.
//!
//! Pure transitions over explicit state. Every function here takes the
//! current value by reference and returns a new one, so a failed call leaves
//! the caller's state exactly as it was. Nothing here blocks or keeps state
//! of its own; storage, locking and fan-out belong to the caller.
//!
//! [`score_delivery`] is where the rules live. It validates the delivery
//! against the innings and computes everything the ball changes without
//! touching the innings; [`Innings`] then applies that outcome.
//!
//! # Delivery rules
//!
//! - Wides and no-balls are not legal balls and do not advance the over.
//! - Runs off the bat on a wide are discarded; wide runs go in `extras.wides`.
//! - Byes, leg-byes and penalty runs count to the team, never to the batsman
//!   or against the bowler.
//! - The striker faces every delivery except a wide.
//! - Only odd runs off the bat rotate strike, and never on the last legal
//!   ball of an over (over completion swaps ends instead).
//! - A no-ball makes the next delivery a free hit. A legal ball uses it up;
//!   a wide does not.
//! - On a free hit only a run out can dismiss a batsman.

use serde::{Deserialize, Serialize};

use super::ball::{BallEvent, BallRecord, WicketKind, MAX_RUNS_PER_BALL};
use super::cricket_match::Match;
use super::error::ScoringError;
use super::innings::{Innings, InningsStatus, Lineup, BALLS_PER_OVER, MAX_WICKETS};
use super::player::PlayerId;

/// Batting figures added by one delivery, credited to the striker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingDelta {
    pub player_id: PlayerId,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
}

/// Bowling figures added by one delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingDelta {
    pub player_id: PlayerId,
    pub balls: u32,
    pub runs: u32,
    pub wickets: u32,
    pub wides: u32,
    pub no_balls: u32,
    pub maidens: u32,
    /// Legal balls conceding nothing to the bowler
    pub dots: u32,
}

/// Fielding credit for a dismissal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldingDelta {
    pub player_id: PlayerId,
    pub kind: WicketKind,
}

/// Everything one delivery changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallOutcome {
    pub record: BallRecord,
    pub batting: BattingDelta,
    pub bowling: BowlingDelta,
    pub dismissal: Option<(PlayerId, WicketKind)>,
    pub fielding: Option<FieldingDelta>,
    /// Free-hit state for the next delivery
    pub free_hit: bool,
    pub strike_rotated: bool,
    /// This was the sixth legal ball of the over
    pub over_complete: bool,
}

/// Validate a delivery against the innings and compute its effects.
pub fn score_delivery(innings: &Innings, event: &BallEvent) -> Result<BallOutcome, ScoringError> {
    if innings.status != InningsStatus::InProgress {
        return Err(innings.invalid("record a ball"));
    }

    let (striker, non_striker, bowler) = match &innings.lineup {
        Lineup {
            striker: Some(s),
            non_striker: Some(n),
            bowler: Some(b),
        } => (s, n, b),
        _ => return Err(ScoringError::IncompleteLineup),
    };

    let score = &innings.score;
    if score.wickets >= MAX_WICKETS {
        return Err(ScoringError::AllOut(score.wickets));
    }
    if let Some(max) = innings.max_overs {
        if innings.overs_exhausted() {
            return Err(ScoringError::OversExhausted(max));
        }
    }
    if innings.over_pending() {
        return Err(ScoringError::OverPending(innings.overs_completed() + 1));
    }

    let extras = event.extras;
    if extras.is_wide() && extras.is_no_ball() {
        return Err(ScoringError::ConflictingExtras);
    }
    let submitted = event.runs.saturating_add(extras.total());
    if submitted > MAX_RUNS_PER_BALL {
        return Err(ScoringError::ExcessiveRuns {
            runs: submitted,
            max: MAX_RUNS_PER_BALL,
        });
    }

    let dismissed = match &event.wicket {
        Some(wicket) => {
            if innings.free_hit && wicket.kind != WicketKind::RunOut {
                return Err(ScoringError::IllegalDismissalOnFreeHit(wicket.kind));
            }
            let player_id = wicket.player_id.as_ref().unwrap_or(striker);
            if player_id != striker && player_id != non_striker {
                return Err(ScoringError::DismissedPlayerNotAtCrease(player_id.clone()));
            }
            if player_id != striker && !wicket.kind.can_dismiss_non_striker() {
                return Err(ScoringError::IllegalNonStrikerDismissal(wicket.kind));
            }
            Some(player_id.clone())
        }
        None => None,
    };

    // Validation done, compute the delta.

    let legal = extras.is_legal();
    let runs_to_batsman = if extras.is_wide() { 0 } else { event.runs };
    let total_runs = runs_to_batsman + extras.total();

    // Illegal deliveries take the position of the next legal ball.
    let over = score.legal_balls / BALLS_PER_OVER;
    let ball_in_over = score.legal_balls % BALLS_PER_OVER + 1;
    let over_complete = legal && ball_in_over == BALLS_PER_OVER;

    let bowler_runs = runs_to_batsman + extras.bowler_runs();
    let maiden = over_complete && innings.over_tally().is_maiden_with(bowler, bowler_runs);

    let free_hit = if extras.is_no_ball() {
        true
    } else if legal {
        false
    } else {
        innings.free_hit
    };

    let strike_rotated = runs_to_batsman % 2 == 1 && !over_complete;

    let wicket = event.wicket.as_ref();
    let bowler_wicket = wicket.is_some_and(|w| w.kind.credited_to_bowler());

    let dismissal = match (wicket, &dismissed) {
        (Some(w), Some(player_id)) => Some((player_id.clone(), w.kind)),
        _ => None,
    };

    let fielding = wicket.and_then(|w| match (&w.fielder, w.kind) {
        (Some(fielder), WicketKind::Caught | WicketKind::RunOut | WicketKind::Stumped) => {
            Some(FieldingDelta {
                player_id: fielder.clone(),
                kind: w.kind,
            })
        }
        _ => None,
    });

    let record = BallRecord {
        sequence: innings.balls().len() as u32 + 1,
        over,
        ball_in_over,
        striker: striker.clone(),
        non_striker: non_striker.clone(),
        bowler: bowler.clone(),
        event: event.clone(),
        runs_to_batsman,
        total_runs,
        dismissed,
        free_hit: innings.free_hit,
    };

    Ok(BallOutcome {
        record,
        batting: BattingDelta {
            player_id: striker.clone(),
            runs: runs_to_batsman,
            balls: u32::from(!extras.is_wide()),
            fours: u32::from(runs_to_batsman == 4),
            sixes: u32::from(runs_to_batsman == 6),
        },
        bowling: BowlingDelta {
            player_id: bowler.clone(),
            balls: u32::from(legal),
            runs: bowler_runs,
            wickets: u32::from(bowler_wicket),
            wides: extras.wides,
            no_balls: extras.no_balls,
            maidens: u32::from(maiden),
            dots: u32::from(legal && bowler_runs == 0),
        },
        dismissal,
        fielding,
        free_hit,
        strike_rotated,
        over_complete,
    })
}

/// Score a delivery, returning the new innings and what changed.
pub fn record_ball(
    innings: &Innings,
    event: &BallEvent,
) -> Result<(Innings, BallOutcome), ScoringError> {
    let outcome = score_delivery(innings, event)?;
    let mut next = innings.clone();
    next.apply(&outcome);
    Ok((next, outcome))
}

/// Close the over once six legal balls have been bowled.
pub fn complete_over(innings: &Innings) -> Result<Innings, ScoringError> {
    let mut next = innings.clone();
    next.complete_over_mut()?;
    Ok(next)
}

/// Hand the ball to `candidate`, who must not have bowled the previous over.
pub fn select_bowler(innings: &Innings, candidate: &str) -> Result<Innings, ScoringError> {
    let mut next = innings.clone();
    next.select_bowler_mut(candidate)?;
    Ok(next)
}

/// Start a match that has not started yet.
pub fn start_match(game: &Match) -> Result<Match, ScoringError> {
    let mut next = game.clone();
    next.start()?;
    Ok(next)
}

/// Close the current innings; after the second, the match.
pub fn end_innings(game: &Match) -> Result<Match, ScoringError> {
    let mut next = game.clone();
    next.end_innings()?;
    Ok(next)
}

/// Rebuild an innings from a ball history.
///
/// `base` supplies the teams, format and target. Overs are closed wherever
/// the history crosses a boundary, and at the end for as many overs as
/// `base` had closed. The lineup is left as the last ball left it.
pub fn replay_innings(base: &Innings, records: &[BallRecord]) -> Result<Innings, ScoringError> {
    let mut innings = base.fresh();

    for record in records {
        if innings.over_pending() {
            innings.complete_over_mut()?;
        }
        innings.lineup = Lineup::from_record(record);
        let outcome = score_delivery(&innings, &record.event)?;
        innings.apply(&outcome);
    }

    while innings.overs_completed() < base.overs_completed() && innings.over_pending() {
        innings.complete_over_mut()?;
    }

    Ok(innings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ball::{Extras, Wicket};
    use crate::state::player::Dismissal;
    use crate::state::{End, TeamId};
    use pretty_assertions::assert_eq;

    fn make_innings() -> Innings {
        let mut innings = Innings::new(1, TeamId::A, TeamId::B, None);
        innings.start().unwrap();
        innings.open_batting("a1", "a2").unwrap();
        innings.select_bowler_mut("b1").unwrap();
        innings
    }

    fn record(innings: &Innings, event: BallEvent) -> Innings {
        record_ball(innings, &event).unwrap().0
    }

    #[test]
    fn test_runs_off_the_bat() {
        let innings = make_innings();
        let (next, outcome) = record_ball(&innings, &BallEvent::runs(3)).unwrap();

        assert_eq!(next.score.runs, 3);
        assert_eq!(next.score.legal_balls, 1);
        assert_eq!(outcome.record.over, 0);
        assert_eq!(outcome.record.ball_in_over, 1);
        assert_eq!(outcome.batting.runs, 3);
        assert_eq!(outcome.bowling.runs, 3);
        assert!(outcome.strike_rotated);

        // Original untouched
        assert_eq!(innings.score.runs, 0);
        assert!(innings.balls().is_empty());
    }

    #[test]
    fn test_incomplete_lineup() {
        let mut innings = make_innings();
        innings.lineup.bowler = None;
        assert_eq!(
            score_delivery(&innings, &BallEvent::dot()),
            Err(ScoringError::IncompleteLineup)
        );

        let mut innings = make_innings();
        innings.lineup.non_striker = None;
        assert_eq!(
            score_delivery(&innings, &BallEvent::dot()),
            Err(ScoringError::IncompleteLineup)
        );
    }

    #[test]
    fn test_not_in_progress() {
        let innings = Innings::new(1, TeamId::A, TeamId::B, None);
        assert!(matches!(
            score_delivery(&innings, &BallEvent::dot()),
            Err(ScoringError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_wide() {
        let innings = make_innings();
        let event = BallEvent {
            runs: 2,
            ..BallEvent::wide(1)
        };
        let (next, outcome) = record_ball(&innings, &event).unwrap();

        // Bat runs on a wide are discarded
        assert_eq!(next.score.runs, 1);
        assert_eq!(next.score.legal_balls, 0);
        assert_eq!(next.score.extras.wides, 1);
        assert_eq!(outcome.batting.balls, 0);
        assert!(!outcome.strike_rotated);

        let striker = next.batting_stats("a1").unwrap();
        assert_eq!(striker.balls, 0);
        assert_eq!(striker.runs, 0);

        let bowler = next.bowling_stats("b1").unwrap();
        assert_eq!(bowler.balls, 0);
        assert_eq!(bowler.runs, 1);
        assert_eq!(bowler.wides, 1);
    }

    #[test]
    fn test_no_ball() {
        let innings = make_innings();
        let (next, outcome) = record_ball(&innings, &BallEvent::no_ball(4)).unwrap();

        assert_eq!(next.score.runs, 5);
        assert_eq!(next.score.legal_balls, 0);
        assert!(next.free_hit);

        let striker = next.batting_stats("a1").unwrap();
        assert_eq!(striker.runs, 4);
        assert_eq!(striker.balls, 1);
        assert_eq!(striker.fours, 1);

        assert_eq!(outcome.bowling.runs, 5);
        assert_eq!(outcome.bowling.no_balls, 1);
        assert_eq!(outcome.bowling.balls, 0);
    }

    #[test]
    fn test_byes_and_leg_byes() {
        let innings = make_innings();
        let next = record(&innings, BallEvent::byes(3));
        let next = record(&next, BallEvent::leg_byes(1));

        assert_eq!(next.score.runs, 4);
        assert_eq!(next.score.legal_balls, 2);
        assert_eq!(next.score.extras.byes, 3);
        assert_eq!(next.score.extras.leg_byes, 1);

        // Faced by the batsman, not credited; no rotation on extras
        let striker = next.batting_stats("a1").unwrap();
        assert_eq!(striker.balls, 2);
        assert_eq!(striker.runs, 0);
        assert_eq!(next.lineup.striker.as_deref(), Some("a1"));

        let bowler = next.bowling_stats("b1").unwrap();
        assert_eq!(bowler.runs, 0);
        assert_eq!(bowler.balls, 2);
    }

    #[test]
    fn test_penalty_runs() {
        let innings = make_innings();
        let event = BallEvent::dot().with_extras(Extras {
            penalty: 5,
            ..Default::default()
        });
        let (next, outcome) = record_ball(&innings, &event).unwrap();
        assert_eq!(next.score.runs, 5);
        assert_eq!(next.score.legal_balls, 1);
        assert_eq!(outcome.bowling.runs, 0);
    }

    #[test]
    fn test_conflicting_extras() {
        let innings = make_innings();
        let event = BallEvent::dot().with_extras(Extras {
            wides: 1,
            no_balls: 1,
            ..Default::default()
        });
        assert_eq!(
            score_delivery(&innings, &event),
            Err(ScoringError::ConflictingExtras)
        );
    }

    #[test]
    fn test_strike_rotation() {
        let mut innings = make_innings();
        innings = record(&innings, BallEvent::dot());
        innings = record(&innings, BallEvent::dot());

        // Ball 3, single: ends change
        innings = record(&innings, BallEvent::runs(1));
        assert_eq!(innings.lineup.striker.as_deref(), Some("a2"));
        assert_eq!(innings.lineup.non_striker.as_deref(), Some("a1"));

        innings = record(&innings, BallEvent::dot());
        innings = record(&innings, BallEvent::dot());

        // Ball 6, single: no per-ball rotation
        let (next, outcome) = record_ball(&innings, &BallEvent::runs(1)).unwrap();
        assert!(outcome.over_complete);
        assert!(!outcome.strike_rotated);
        assert_eq!(next.lineup.striker.as_deref(), Some("a2"));

        // Over completion swaps ends
        let next = complete_over(&next).unwrap();
        assert_eq!(next.lineup.striker.as_deref(), Some("a1"));
    }

    #[test]
    fn test_odd_runs_on_no_ball_rotate() {
        let innings = make_innings();
        let next = record(&innings, BallEvent::no_ball(3));
        assert_eq!(next.lineup.striker.as_deref(), Some("a2"));
    }

    #[test]
    fn test_over_pending_blocks_next_ball() {
        let mut innings = make_innings();
        for _ in 0..6 {
            innings = record(&innings, BallEvent::dot());
        }
        assert_eq!(
            score_delivery(&innings, &BallEvent::dot()),
            Err(ScoringError::OverPending(1))
        );
    }

    #[test]
    fn test_illegal_delivery_keeps_position() {
        let mut innings = make_innings();
        innings = record(&innings, BallEvent::dot());
        let (innings, outcome) = record_ball(&innings, &BallEvent::wide(1)).unwrap();
        assert_eq!(outcome.record.ball_in_over, 2);
        let (_, outcome) = record_ball(&innings, &BallEvent::dot()).unwrap();
        assert_eq!(outcome.record.ball_in_over, 2);
        assert_eq!(outcome.record.sequence, 3);
    }

    #[test]
    fn test_free_hit_dismissals() {
        let innings = record(&make_innings(), BallEvent::no_ball(0));
        assert!(innings.free_hit);

        assert_eq!(
            score_delivery(&innings, &BallEvent::wicket(WicketKind::Bowled)),
            Err(ScoringError::IllegalDismissalOnFreeHit(WicketKind::Bowled))
        );

        let (next, outcome) = record_ball(&innings, &BallEvent::wicket(WicketKind::RunOut)).unwrap();
        assert!(outcome.record.free_hit);
        assert_eq!(next.score.wickets, 1);
        assert!(!next.free_hit);
        assert_eq!(outcome.bowling.wickets, 0);
    }

    #[test]
    fn test_free_hit_persists_through_wide() {
        let innings = record(&make_innings(), BallEvent::no_ball(0));
        let innings = record(&innings, BallEvent::wide(1));
        assert!(innings.free_hit);

        let innings = record(&innings, BallEvent::dot());
        assert!(!innings.free_hit);
    }

    #[test]
    fn test_consecutive_no_balls_keep_free_hit() {
        let innings = record(&make_innings(), BallEvent::no_ball(0));
        let innings = record(&innings, BallEvent::no_ball(0));
        assert!(innings.free_hit);
    }

    #[test]
    fn test_caught_credits_bowler_and_fielder() {
        let innings = make_innings();
        let event = BallEvent::wicket(WicketKind::Caught).with_wicket(Wicket::new(WicketKind::Caught).by("b4"));
        let (next, outcome) = record_ball(&innings, &event).unwrap();

        assert_eq!(outcome.dismissal, Some(("a1".to_string(), WicketKind::Caught)));
        assert_eq!(next.bowling_stats("b1").unwrap().wickets, 1);
        assert_eq!(next.fielding_stats("b4").unwrap().catches, 1);

        let striker = next.batting_stats("a1").unwrap();
        assert_eq!(striker.dismissal, Dismissal::Out(WicketKind::Caught));
        assert_eq!(striker.balls, 1);
        assert_eq!(next.lineup.striker, None);
        assert_eq!(next.lineup.non_striker.as_deref(), Some("a2"));
    }

    #[test]
    fn test_run_out_not_credited_to_bowler() {
        let innings = make_innings();
        let event = BallEvent::runs(1)
            .with_wicket(Wicket::new(WicketKind::RunOut).of("a2").by("b5"));
        let (next, outcome) = record_ball(&innings, &event).unwrap();

        assert_eq!(outcome.bowling.wickets, 0);
        assert_eq!(next.score.runs, 1);
        assert_eq!(next.batting_stats("a1").unwrap().runs, 1);
        assert_eq!(
            next.batting_stats("a2").unwrap().dismissal,
            Dismissal::Out(WicketKind::RunOut)
        );
        assert_eq!(next.fielding_stats("b5").unwrap().run_outs, 1);

        // a1 crossed to the non-striker's end; a2's vacancy is at the striker's end
        assert_eq!(next.lineup.striker, None);
        assert_eq!(next.lineup.non_striker.as_deref(), Some("a1"));
    }

    #[test]
    fn test_dismissed_player_must_be_at_crease() {
        let innings = make_innings();
        let event = BallEvent::dot().with_wicket(Wicket::new(WicketKind::RunOut).of("a7"));
        assert_eq!(
            score_delivery(&innings, &event),
            Err(ScoringError::DismissedPlayerNotAtCrease("a7".into()))
        );
    }

    #[test]
    fn test_non_striker_dismissal_kinds() {
        let innings = make_innings();
        for kind in [WicketKind::Bowled, WicketKind::Caught, WicketKind::Lbw, WicketKind::Stumped] {
            let event = BallEvent::dot().with_wicket(Wicket::new(kind).of("a2"));
            assert_eq!(
                score_delivery(&innings, &event),
                Err(ScoringError::IllegalNonStrikerDismissal(kind))
            );
        }

        let obstructing = BallEvent::dot().with_wicket(Wicket::new(WicketKind::Obstructing).of("a2"));
        let (next, _) = record_ball(&innings, &obstructing).unwrap();
        assert_eq!(
            next.batting_stats("a2").unwrap().dismissal,
            Dismissal::Out(WicketKind::Obstructing)
        );
    }

    #[test]
    fn test_excessive_runs_rejected() {
        let mut innings = make_innings();
        let before = innings.clone();

        let input = crate::state::ball::BallInput::from_json(serde_json::json!({
            "runs": "99999999999",
            "extras": { "byes": 1 }
        }))
        .unwrap();
        let event = input.into_event().unwrap();
        assert_eq!(
            innings.record_ball_mut(&event),
            Err(ScoringError::ExcessiveRuns {
                runs: u32::MAX,
                max: MAX_RUNS_PER_BALL
            })
        );

        let wides = BallEvent::wide(u32::MAX).with_extras(Extras {
            wides: u32::MAX,
            penalty: 1,
            ..Default::default()
        });
        assert!(matches!(
            innings.record_ball_mut(&wides),
            Err(ScoringError::ExcessiveRuns { .. })
        ));
        assert_eq!(innings, before);

        // The ceiling itself is allowed
        let ceiling = BallEvent::runs(MAX_RUNS_PER_BALL - 5).with_extras(Extras {
            penalty: 5,
            ..Default::default()
        });
        innings.record_ball_mut(&ceiling).unwrap();
        assert_eq!(innings.score.runs, MAX_RUNS_PER_BALL);
    }

    #[test]
    fn test_all_out() {
        let mut innings = make_innings();
        for i in 0..MAX_WICKETS {
            if innings.over_pending() {
                innings = complete_over(&innings).unwrap();
                let bowler = if i % 2 == 0 { "b2" } else { "b1" };
                innings = select_bowler(&innings, bowler).unwrap();
            }
            let incoming = format!("n{}", i);
            if innings.lineup.striker.is_none() {
                innings.assign_batsman(End::Striker, &incoming).unwrap();
            }
            if innings.lineup.non_striker.is_none() {
                innings.assign_batsman(End::NonStriker, &incoming).unwrap();
            }
            innings = record(&innings, BallEvent::wicket(WicketKind::Bowled));
        }
        assert_eq!(innings.score.wickets, MAX_WICKETS);
        assert!(innings.is_all_out());

        innings.lineup.striker = Some("n99".into());
        assert_eq!(
            score_delivery(&innings, &BallEvent::wicket(WicketKind::Bowled)),
            Err(ScoringError::AllOut(MAX_WICKETS))
        );
    }

    #[test]
    fn test_overs_exhausted() {
        let mut innings = Innings::new(1, TeamId::A, TeamId::B, Some(1));
        innings.start().unwrap();
        innings.open_batting("a1", "a2").unwrap();
        innings.select_bowler_mut("b1").unwrap();
        for _ in 0..6 {
            innings = record(&innings, BallEvent::dot());
        }
        assert_eq!(
            score_delivery(&innings, &BallEvent::dot()),
            Err(ScoringError::OversExhausted(1))
        );
    }

    #[test]
    fn test_select_bowler_pure() {
        let mut innings = make_innings();
        for _ in 0..6 {
            innings = record(&innings, BallEvent::dot());
        }
        let innings = complete_over(&innings).unwrap();
        assert_eq!(
            select_bowler(&innings, "b1"),
            Err(ScoringError::ConsecutiveOver("b1".into()))
        );
        let next = select_bowler(&innings, "b2").unwrap();
        assert_eq!(next.lineup.bowler.as_deref(), Some("b2"));
        assert_eq!(innings.lineup.bowler, None);
    }

    #[test]
    fn test_replay_reproduces_figures() {
        let mut innings = make_innings();
        let events = [
            BallEvent::runs(4),
            BallEvent::no_ball(1),
            BallEvent::wide(1),
            BallEvent::runs(6),
            BallEvent::byes(2),
            BallEvent::runs(1),
            BallEvent::dot(),
        ];
        for event in events {
            innings = record(&innings, event);
        }

        let replayed = replay_innings(&innings, innings.balls()).unwrap();
        assert_eq!(replayed.score, innings.score);
        assert_eq!(replayed.balls(), innings.balls());
        assert_eq!(
            replayed.batting_card().collect::<Vec<_>>(),
            innings.batting_card().collect::<Vec<_>>()
        );
        assert_eq!(
            replayed.bowling_card().collect::<Vec<_>>(),
            innings.bowling_card().collect::<Vec<_>>()
        );
        assert_eq!(replayed.free_hit, innings.free_hit);
    }

    #[test]
    fn test_match_transitions_leave_input_untouched() {
        use crate::state::cricket_match::{MatchFormat, MatchStatus};
        use crate::state::player::{Player, Team};

        let team = |id, prefix: &str| {
            Team::new(id, prefix, vec![Player::new(format!("{}1", prefix), "One")])
        };
        let game = Match::new("m1", team(TeamId::A, "a"), team(TeamId::B, "b"), MatchFormat::Overs(5));

        let started = start_match(&game).unwrap();
        assert_eq!(game.status, MatchStatus::NotStarted);
        assert_eq!(started.status, MatchStatus::InProgress);
        assert!(start_match(&started).is_err());

        let second = end_innings(&started).unwrap();
        assert_eq!(started.current_innings, 1);
        assert_eq!(second.current_innings, 2);
        assert_eq!(second.current().unwrap().batting_team, TeamId::B);

        let done = end_innings(&second).unwrap();
        assert_eq!(done.status, MatchStatus::Completed);
        assert!(matches!(
            end_innings(&done),
            Err(ScoringError::InvalidStateTransition { .. })
        ));
    }
}

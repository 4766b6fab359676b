//! Round resolution and session scoring.
//!
//! `SessionState::step` is the whole per-frame state machine: given the
//! frame's zone assignment it resolves a round when both zones hold a
//! gesture and the cooldown is idle, then advances the cooldown by a frame.
//! The tick runs on every frame, the resolving one included, so a held
//! gesture scores once every `COOLDOWN_FRAMES` frames.

use std::fmt;

use serde::Serialize;

use crate::cooldown::Cooldown;
use crate::gesture::Gesture;
use crate::zone::{Zone, ZoneAssignment};

/// Outcome of one resolved round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Draw,
    LeftWins,
    RightWins,
}

impl RoundOutcome {
    pub fn winner(self) -> Option<Zone> {
        match self {
            RoundOutcome::Draw => None,
            RoundOutcome::LeftWins => Some(Zone::Left),
            RoundOutcome::RightWins => Some(Zone::Right),
        }
    }

    /// Result banner shown on screen.
    pub fn banner(self) -> &'static str {
        match self {
            RoundOutcome::Draw => "Draw",
            RoundOutcome::LeftWins => "Zone 1 Wins!",
            RoundOutcome::RightWins => "Zone 2 Wins!",
        }
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.banner())
    }
}

/// Running score for the lifetime of the process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MatchScore {
    pub score_left: u32,
    pub score_right: u32,
}

impl MatchScore {
    pub fn get(&self, zone: Zone) -> u32 {
        match zone {
            Zone::Left => self.score_left,
            Zone::Right => self.score_right,
        }
    }

    fn award(&mut self, outcome: RoundOutcome) {
        match outcome.winner() {
            Some(Zone::Left) => self.score_left = self.score_left.saturating_add(1),
            Some(Zone::Right) => self.score_right = self.score_right.saturating_add(1),
            None => {}
        }
    }
}

/// Apply the rule table to one pair of gestures.
pub fn resolve_round(left: Gesture, right: Gesture) -> RoundOutcome {
    if left == right {
        RoundOutcome::Draw
    } else if left.beats(right) {
        RoundOutcome::LeftWins
    } else {
        RoundOutcome::RightWins
    }
}

/// What a single `step` did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepEvent {
    /// A round resolved on this frame.
    Resolved {
        left: Gesture,
        right: Gesture,
        outcome: RoundOutcome,
        /// Counter value the round reset the cooldown to, before this
        /// frame's tick.
        cooldown: u32,
    },
    /// Both zones were populated but the cooldown was running.
    CoolingDown,
    /// At least one zone was empty.
    Waiting,
    /// A zone held a label outside the rule table; the round was skipped.
    UnknownLabel { zone: Zone, label: String },
}

impl StepEvent {
    pub fn outcome(&self) -> Option<RoundOutcome> {
        match self {
            StepEvent::Resolved { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }

    /// Cooldown the resolver started, if a round resolved.
    pub fn cooldown_reset(&self) -> Option<u32> {
        match self {
            StepEvent::Resolved { cooldown, .. } => Some(*cooldown),
            _ => None,
        }
    }
}

/// Score, cooldown and round count owned by the referee loop.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub score: MatchScore,
    pub cooldown: Cooldown,
    pub rounds_played: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the session by one frame.
    pub fn step(&mut self, zones: &ZoneAssignment) -> StepEvent {
        let event = self.try_resolve(zones);
        self.cooldown.tick();
        event
    }

    fn try_resolve(&mut self, zones: &ZoneAssignment) -> StepEvent {
        let (Some(left), Some(right)) = (zones.left.as_ref(), zones.right.as_ref()) else {
            return StepEvent::Waiting;
        };
        if !self.cooldown.is_idle() {
            return StepEvent::CoolingDown;
        }
        let Some(left_gesture) = Gesture::from_label(&left.label) else {
            log::warn!("skipping round: unknown label '{}' in {}", left.label, Zone::Left);
            return StepEvent::UnknownLabel {
                zone: Zone::Left,
                label: left.label.clone(),
            };
        };
        let Some(right_gesture) = Gesture::from_label(&right.label) else {
            log::warn!("skipping round: unknown label '{}' in {}", right.label, Zone::Right);
            return StepEvent::UnknownLabel {
                zone: Zone::Right,
                label: right.label.clone(),
            };
        };

        let outcome = resolve_round(left_gesture, right_gesture);
        self.score.award(outcome);
        self.rounds_played += 1;
        self.cooldown.start();
        StepEvent::Resolved {
            left: left_gesture,
            right: right_gesture,
            outcome,
            cooldown: self.cooldown.remaining(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cooldown::COOLDOWN_FRAMES;
    use crate::zone::ZoneEntry;

    fn zones(left: Option<&str>, right: Option<&str>) -> ZoneAssignment {
        let entry = |label: &str| ZoneEntry {
            label: label.to_string(),
            confidence: 0.9,
        };
        ZoneAssignment {
            left: left.map(entry),
            right: right.map(entry),
        }
    }

    #[test]
    fn equal_gestures_draw_without_scoring() {
        for g in Gesture::ALL {
            let mut session = SessionState::new();
            let event = session.step(&zones(Some(g.as_str()), Some(g.as_str())));
            assert_eq!(
                event,
                StepEvent::Resolved {
                    left: g,
                    right: g,
                    outcome: RoundOutcome::Draw,
                    cooldown: COOLDOWN_FRAMES,
                }
            );
            assert_eq!(session.score, MatchScore::default());
        }
    }

    #[test]
    fn distinct_gestures_pick_exactly_one_winner() {
        for a in Gesture::ALL {
            for b in Gesture::ALL {
                if a == b {
                    continue;
                }
                let mut session = SessionState::new();
                let outcome = session
                    .step(&zones(Some(a.as_str()), Some(b.as_str())))
                    .outcome()
                    .unwrap();
                assert_ne!(outcome, RoundOutcome::Draw);
                assert_eq!(session.score.score_left + session.score.score_right, 1);
                assert_eq!(outcome == RoundOutcome::LeftWins, a.beats(b));
            }
        }
    }

    #[test]
    fn cooling_session_ignores_decisive_pair() {
        let mut session = SessionState::new();
        session.cooldown.start();
        session.cooldown.tick();
        let event = session.step(&zones(Some("rock"), Some("scissors")));
        assert_eq!(event, StepEvent::CoolingDown);
        assert_eq!(session.score, MatchScore::default());
        assert_eq!(session.rounds_played, 0);
    }

    #[test]
    fn resolving_frame_also_ticks() {
        let mut session = SessionState::new();
        let event = session.step(&zones(Some("rock"), Some("scissors")));
        assert!(matches!(
            event,
            StepEvent::Resolved {
                cooldown: COOLDOWN_FRAMES,
                ..
            }
        ));
        assert_eq!(session.cooldown.remaining(), COOLDOWN_FRAMES - 1);
    }

    #[test]
    fn cooldown_decays_after_full_window() {
        let mut session = SessionState::new();
        let held = zones(Some("rock"), Some("scissors"));
        assert!(session.step(&held).outcome().is_some());

        for _ in 1..COOLDOWN_FRAMES {
            assert_eq!(session.step(&held), StepEvent::CoolingDown);
        }
        assert!(session.cooldown.is_idle());
        assert_eq!(session.score.score_left, 1);

        assert!(session.step(&held).outcome().is_some());
        assert_eq!(session.score.score_left, 2);
    }

    #[test]
    fn held_gesture_resolves_every_window() {
        let mut session = SessionState::new();
        let held = zones(Some("rock"), Some("scissors"));
        let resolved: Vec<u32> = (1..=130)
            .filter(|_| session.step(&held).outcome().is_some())
            .collect();
        assert_eq!(resolved, vec![1, 61, 121]);
    }

    #[test]
    fn empty_zone_waits_and_still_ticks() {
        let mut session = SessionState::new();
        session.cooldown.start();
        assert_eq!(session.step(&zones(Some("rock"), None)), StepEvent::Waiting);
        assert_eq!(session.cooldown.remaining(), COOLDOWN_FRAMES - 1);
    }

    #[test]
    fn unknown_label_skips_round() {
        let mut session = SessionState::new();
        let event = session.step(&zones(Some("rock"), Some("lizard")));
        assert_eq!(
            event,
            StepEvent::UnknownLabel {
                zone: Zone::Right,
                label: "lizard".to_string()
            }
        );
        assert!(session.cooldown.is_idle());
        assert_eq!(session.rounds_played, 0);
    }

    #[test]
    fn raw_model_labels_still_resolve() {
        let mut session = SessionState::new();
        let event = session.step(&zones(Some("Rock "), Some("SCISSORS")));
        assert_eq!(event.outcome(), Some(RoundOutcome::LeftWins));
    }

    #[test]
    fn resolve_round_follows_rule_table() {
        assert_eq!(resolve_round(Gesture::Rock, Gesture::Scissors), RoundOutcome::LeftWins);
        assert_eq!(resolve_round(Gesture::Rock, Gesture::Paper), RoundOutcome::RightWins);
        assert_eq!(resolve_round(Gesture::Paper, Gesture::Paper), RoundOutcome::Draw);
    }
}

//! Per-frame referee pass.
//!
//! The `Referee` owns the session state and runs one frame through
//! classify → zone assignment → round step. It never touches capture or
//! display; the binary wires those around it.

use anyhow::{Context, Result};

use crate::detect::{Detection, DetectionResult, DetectorBackend};
use crate::frame::Frame;
use crate::round::{MatchScore, RoundOutcome, SessionState, StepEvent};
use crate::zone::{assign_zones, ZoneAssignment, ZonePolicy};

/// Everything the presentation layer needs about one processed frame.
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    pub detections: Vec<Detection>,
    pub zones: ZoneAssignment,
    pub event: StepEvent,
    pub score: MatchScore,
    pub cooldown_remaining: u32,
}

impl FrameReport {
    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.event.outcome()
    }
}

pub struct Referee {
    session: SessionState,
    policy: ZonePolicy,
    confidence_threshold: f32,
}

impl Referee {
    pub fn new(policy: ZonePolicy, confidence_threshold: f32) -> Self {
        Self {
            session: SessionState::new(),
            policy,
            confidence_threshold,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn score(&self) -> MatchScore {
        self.session.score
    }

    /// Classify a frame and advance the session.
    pub fn process(
        &mut self,
        frame: &Frame,
        backend: &mut dyn DetectorBackend,
    ) -> Result<FrameReport> {
        let name = backend.name();
        let result = frame
            .run_detector(backend)
            .with_context(|| format!("classifier '{}' failed on frame {}", name, frame.sequence))?;
        Ok(self.apply(frame, result))
    }

    /// Advance the session with detections produced elsewhere.
    pub fn apply(&mut self, frame: &Frame, result: DetectionResult) -> FrameReport {
        let detections = result.above(self.confidence_threshold).detections;
        let zones = assign_zones(&detections, frame.width, self.policy);
        log::debug!(
            "frame {}: left={:?} right={:?} cooldown={}",
            frame.sequence,
            zones.left.as_ref().map(|e| e.label.as_str()),
            zones.right.as_ref().map(|e| e.label.as_str()),
            self.session.cooldown.remaining()
        );

        let event = self.session.step(&zones);
        if let StepEvent::Resolved {
            left,
            right,
            outcome,
            ..
        } = &event
        {
            log::info!(
                "round {}: {} vs {} -> {} (score {}-{})",
                self.session.rounds_played,
                left,
                right,
                outcome,
                self.session.score.score_left,
                self.session.score.score_right
            );
        }

        FrameReport {
            sequence: frame.sequence,
            width: frame.width,
            height: frame.height,
            detections,
            zones,
            event,
            score: self.session.score,
            cooldown_remaining: self.session.cooldown.remaining(),
        }
    }
}

//! Rock-paper-scissors referee
//!
//! Two players stand on either side of a single webcam. Each frame is run
//! through a gesture classifier, detections are split into a left and right
//! zone at the frame midline, and when both zones show a gesture a round is
//! resolved and scored. A fixed frame cooldown keeps a held gesture from
//! being scored on every frame.
//!
//! # Module Structure
//!
//! - `gesture`: the three gestures and the win-rule table
//! - `frame`: captured RGB frames
//! - `detect`: classifier backends (stub, scripted, tract/YOLOv8)
//! - `zone`: detection → zone assignment
//! - `cooldown`, `round`: the per-frame scoring state machine
//! - `referee`: one frame through classify → assign → step
//! - `ingest`: camera sources
//! - `present`, `ui`: overlays and presenters
//! - `config`: file + environment configuration

pub mod config;
pub mod cooldown;
pub mod detect;
pub mod frame;
pub mod gesture;
pub mod ingest;
pub mod present;
pub mod referee;
pub mod round;
pub mod ui;
pub mod zone;

pub use cooldown::{Cooldown, CooldownState, COOLDOWN_FRAMES};
pub use detect::{
    BackendRegistry, BoundingBox, Detection, DetectionResult,
    DetectorBackend, ScriptedBackend, StubBackend,
};
pub use frame::Frame;
pub use gesture::Gesture;
pub use ingest::{CameraConfig, CameraSource};
pub use present::{overlay, DrawOp, Presenter};
pub use referee::{FrameReport, Referee};
pub use round::{resolve_round, MatchScore, RoundOutcome, SessionState, StepEvent};
pub use zone::{assign_zones, midline, Zone, ZoneAssignment, ZoneEntry, ZonePolicy};

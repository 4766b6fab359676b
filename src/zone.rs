//! Zone assignment: one gesture per half of the frame.
//!
//! The frame is split at `width / 2`. A detection whose box center is left
//! of the midline belongs to the left player; everything else, including a
//! center exactly on the midline, belongs to the right player.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

use crate::detect::Detection;

/// One of the two fixed halves of the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Left,
    Right,
}

impl Zone {
    /// Zone for a horizontal position given the frame midline.
    pub fn for_center(center_x: i32, midline: u32) -> Zone {
        if i64::from(center_x) < i64::from(midline) {
            Zone::Left
        } else {
            Zone::Right
        }
    }

    /// Player-facing title, 1-based like the on-screen labels.
    pub fn title(self) -> &'static str {
        match self {
            Zone::Left => "Zone 1",
            Zone::Right => "Zone 2",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// How to pick among several detections that land in the same zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZonePolicy {
    /// The most recently processed detection replaces earlier ones.
    #[default]
    Last,
    /// The most confident detection wins; ties keep the earlier one.
    HighestConfidence,
}

impl FromStr for ZonePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last" => Ok(ZonePolicy::Last),
            "highest-confidence" | "highest_confidence" => Ok(ZonePolicy::HighestConfidence),
            other => Err(anyhow!(
                "unknown zone policy '{}' (expected 'last' or 'highest-confidence')",
                other
            )),
        }
    }
}

/// Label held by a zone for the current frame, exactly as the classifier
/// reported it. Gesture parsing happens when the round resolves.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneEntry {
    pub label: String,
    pub confidence: f32,
}

/// Per-frame zone state. Recomputed every frame, never carried over.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZoneAssignment {
    pub left: Option<ZoneEntry>,
    pub right: Option<ZoneEntry>,
}

impl ZoneAssignment {
    pub fn get(&self, zone: Zone) -> Option<&ZoneEntry> {
        match zone {
            Zone::Left => self.left.as_ref(),
            Zone::Right => self.right.as_ref(),
        }
    }

    fn slot(&mut self, zone: Zone) -> &mut Option<ZoneEntry> {
        match zone {
            Zone::Left => &mut self.left,
            Zone::Right => &mut self.right,
        }
    }

    /// Both players are showing something.
    pub fn is_complete(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

/// X coordinate splitting the two zones.
pub fn midline(frame_width: u32) -> u32 {
    frame_width / 2
}

/// Map detections to zones in processing order.
pub fn assign_zones(
    detections: &[Detection],
    frame_width: u32,
    policy: ZonePolicy,
) -> ZoneAssignment {
    let split = midline(frame_width);
    let mut assignment = ZoneAssignment::default();

    for det in detections {
        let zone = Zone::for_center(det.bounding_box.center_x(), split);
        let slot = assignment.slot(zone);
        let replace = match (policy, slot.as_ref()) {
            (_, None) | (ZonePolicy::Last, Some(_)) => true,
            (ZonePolicy::HighestConfidence, Some(held)) => det.confidence > held.confidence,
        };
        if replace {
            *slot = Some(ZoneEntry {
                label: det.label.clone(),
                confidence: det.confidence,
            });
        }
    }

    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::BoundingBox;

    fn det(label: &str, conf: f32, cx: i32) -> Detection {
        Detection::new(label, conf, BoundingBox::centered(cx, 360, 100, 100))
    }

    #[test]
    fn detections_split_at_midline() {
        let dets = vec![det("rock", 0.9, 200), det("scissors", 0.8, 900)];
        let a = assign_zones(&dets, 1280, ZonePolicy::Last);
        assert_eq!(a.left.unwrap().label, "rock");
        assert_eq!(a.right.unwrap().label, "scissors");
    }

    #[test]
    fn center_on_midline_goes_right() {
        let a = assign_zones(&[det("paper", 0.7, 640)], 1280, ZonePolicy::Last);
        assert!(a.left.is_none());
        assert_eq!(a.right.unwrap().label, "paper");

        let a = assign_zones(&[det("paper", 0.7, 639)], 1280, ZonePolicy::Last);
        assert!(a.left.is_some());
    }

    #[test]
    fn entries_keep_the_raw_label() {
        let a = assign_zones(&[det(" Rock", 0.9, 100)], 1280, ZonePolicy::Last);
        assert_eq!(a.left.unwrap().label, " Rock");
    }

    #[test]
    fn odd_width_midline_rounds_down() {
        assert_eq!(midline(1281), 640);
        let a = assign_zones(&[det("rock", 0.9, 640)], 1281, ZonePolicy::Last);
        assert!(a.right.is_some());
    }

    #[test]
    fn last_processed_detection_wins_by_default() {
        let dets = vec![det("rock", 0.95, 100), det("paper", 0.55, 300)];
        let a = assign_zones(&dets, 1280, ZonePolicy::Last);
        assert_eq!(a.left.unwrap().label, "paper");
    }

    #[test]
    fn highest_confidence_policy_keeps_best() {
        let dets = vec![
            det("rock", 0.95, 100),
            det("paper", 0.55, 300),
            det("scissors", 0.95, 200),
        ];
        let a = assign_zones(&dets, 1280, ZonePolicy::HighestConfidence);
        let left = a.left.unwrap();
        assert_eq!(left.label, "rock");
        assert_eq!(left.confidence, 0.95);
    }

    #[test]
    fn empty_zones_stay_empty() {
        let a = assign_zones(&[det("rock", 0.9, 1000)], 1280, ZonePolicy::Last);
        assert!(!a.is_complete());
        assert!(a.get(Zone::Left).is_none());
        assert_eq!(a.get(Zone::Right).unwrap().label, "rock");
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("last".parse::<ZonePolicy>().unwrap(), ZonePolicy::Last);
        assert_eq!(
            "Highest-Confidence".parse::<ZonePolicy>().unwrap(),
            ZonePolicy::HighestConfidence
        );
        assert!("loudest".parse::<ZonePolicy>().is_err());
    }
}

use std::collections::VecDeque;

use anyhow::Result;

use crate::detect::backend::DetectorBackend;
use crate::detect::result::{Detection, DetectionResult};

/// Replays a fixed sequence of per-frame detection sets.
///
/// Each `detect` call pops the next set. Once the script runs out the
/// backend reports empty frames, unless it was built with `looping`.
pub struct ScriptedBackend {
    script: Vec<Vec<Detection>>,
    pending: VecDeque<Vec<Detection>>,
    looping: bool,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Vec<Detection>>) -> Self {
        Self {
            pending: script.iter().cloned().collect(),
            script,
            looping: false,
        }
    }

    /// Restart from the beginning when the script is exhausted.
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    /// Number of frames left before the script is exhausted.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl DetectorBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn detect(&mut self, _pixels: &[u8], _width: u32, _height: u32) -> Result<DetectionResult> {
        if self.pending.is_empty() && self.looping {
            self.pending = self.script.iter().cloned().collect();
        }
        Ok(DetectionResult::new(
            self.pending.pop_front().unwrap_or_default(),
        ))
    }
}

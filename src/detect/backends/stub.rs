use anyhow::{anyhow, Result};
use sha2::{Digest, Sha256};

use crate::detect::backend::DetectorBackend;
use crate::detect::result::{BoundingBox, Detection, DetectionResult};
use crate::frame::{expected_len, RGB_CHANNELS};
use crate::gesture::Gesture;

const STUB_CONFIDENCE: f32 = 0.85;

/// Stub backend for synthetic runs.
///
/// Hashes each half of the frame and derives a gesture from the digest, so
/// identical pixels always yield identical detections. A digest whose first
/// byte is divisible by four means "no hand" in that half.
#[derive(Default)]
pub struct StubBackend {
    frames_seen: u64,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn half_digest(pixels: &[u8], width: u32, height: u32, left: bool) -> [u8; 32] {
        let row_len = width as usize * RGB_CHANNELS;
        let split = (width / 2) as usize * RGB_CHANNELS;
        let mut hasher = Sha256::new();
        hasher.update([left as u8]);
        for row in pixels.chunks_exact(row_len).take(height as usize) {
            let half = if left { &row[..split] } else { &row[split..] };
            hasher.update(half);
        }
        hasher.finalize().into()
    }

    fn detection_for(digest: [u8; 32], width: u32, height: u32, left: bool) -> Option<Detection> {
        if digest[0] % 4 == 0 {
            return None;
        }
        let gesture = Gesture::ALL[(digest[1] % 3) as usize];
        let quarter = (width / 4) as i32;
        let cx = if left { quarter } else { quarter * 3 };
        let cy = (height / 2) as i32;
        let side = (width.min(height) / 4).max(1) as i32;
        Some(Detection::new(
            gesture.as_str(),
            STUB_CONFIDENCE,
            BoundingBox::centered(cx, cy, side, side),
        ))
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<DetectionResult> {
        if pixels.len() != expected_len(width, height)? {
            return Err(anyhow!(
                "stub backend expected {}x{} RGB frame, received {} bytes",
                width,
                height,
                pixels.len()
            ));
        }
        self.frames_seen += 1;

        let detections = [true, false]
            .into_iter()
            .filter_map(|left| {
                let digest = Self::half_digest(pixels, width, height, left);
                Self::detection_for(digest, width, height, left)
            })
            .collect();

        Ok(DetectionResult::new(detections))
    }
}

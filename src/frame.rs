//! Captured frames.
//!
//! - `Frame`: owned RGB24 pixel buffer produced by an ingest source.
//! - `Frame::run_detector`: hands pixels to a classifier backend and returns
//!   only detections.

use anyhow::{anyhow, Result};

use crate::detect::{DetectionResult, DetectorBackend};

/// Bytes per pixel for the RGB24 layout every source normalizes to.
pub const RGB_CHANNELS: usize = 3;

/// One captured video frame.
///
/// Pixel data is tightly packed RGB24, row-major, `width * height * 3` bytes.
pub struct Frame {
    data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Capture sequence number, starting at 1 for the first frame of a source.
    pub sequence: u64,
}

impl Frame {
    /// Create a frame, validating the buffer length against the dimensions.
    pub fn new(data: Vec<u8>, width: u32, height: u32, sequence: u64) -> Result<Self> {
        let expected = expected_len(width, height)?;
        if data.len() != expected {
            return Err(anyhow!(
                "frame buffer length mismatch: expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            ));
        }
        Ok(Self {
            data,
            width,
            height,
            sequence,
        })
    }

    /// A uniformly colored frame.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3], sequence: u64) -> Result<Self> {
        let len = expected_len(width, height)?;
        let data = rgb.iter().copied().cycle().take(len).collect();
        Self::new(data, width, height, sequence)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Run a classifier backend on this frame.
    pub fn run_detector(&self, backend: &mut dyn DetectorBackend) -> Result<DetectionResult> {
        backend.detect(&self.data, self.width, self.height)
    }
}

pub(crate) fn expected_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(RGB_CHANNELS))
        .ok_or_else(|| anyhow!("frame dimensions overflow"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rejects_wrong_buffer_length() {
        assert!(Frame::new(vec![0u8; 10], 2, 2, 1).is_err());
        let frame = Frame::new(vec![0u8; 12], 2, 2, 1).unwrap();
        assert_eq!(frame.pixels().len(), 12);
    }

    #[test]
    fn solid_frame_repeats_color() {
        let frame = Frame::solid(2, 1, [1, 2, 3], 7).unwrap();
        assert_eq!(frame.pixels(), &[1, 2, 3, 1, 2, 3]);
        assert_eq!(frame.sequence, 7);
    }
}

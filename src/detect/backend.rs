use anyhow::Result;

use crate::detect::result::DetectionResult;

/// Gesture classifier backend.
///
/// The referee treats the model as a black box: pixels go in, labeled
/// boxes in frame coordinates come out. Backends must not retain the pixel
/// slice beyond the `detect` call.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection on an RGB24 frame.
    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<DetectionResult>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

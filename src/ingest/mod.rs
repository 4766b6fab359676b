//! Frame capture sources.
//!
//! - Synthetic camera (`stub://` devices), always available
//! - USB/V4L2 webcams (feature: ingest-v4l2)
//!
//! Every source hands out RGB24 `Frame`s at the negotiated resolution. The
//! requested resolution is best effort: devices may substitute their own.

pub mod camera;
#[cfg(feature = "ingest-v4l2")]
mod normalize;

pub use camera::{CameraConfig, CameraSource, CameraStats};

//! Presentation layer.
//!
//! `overlay` turns a `FrameReport` into draw operations laid out like the
//! on-screen referee view: a midline, zone titles, one box and caption per
//! detection, the round banner and both scores. Presenters decide how (and
//! whether) those operations reach a screen.

use anyhow::Result;

use crate::frame::Frame;
use crate::referee::FrameReport;
use crate::zone::{midline, Zone};

pub type Rgb = [u8; 3];

pub const MIDLINE_COLOR: Rgb = [0, 255, 0];
pub const LEFT_COLOR: Rgb = [0, 0, 255];
pub const RIGHT_COLOR: Rgb = [255, 0, 0];
pub const BOX_COLOR: Rgb = [0, 255, 255];
pub const BANNER_COLOR: Rgb = [255, 255, 0];

/// One primitive for a presenter to render, in frame pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Line {
        from: (i32, i32),
        to: (i32, i32),
        color: Rgb,
        thickness: u32,
    },
    Rect {
        top_left: (i32, i32),
        bottom_right: (i32, i32),
        color: Rgb,
        thickness: u32,
    },
    Text {
        text: String,
        origin: (i32, i32),
        scale: f32,
        color: Rgb,
    },
}

/// Build the draw operations for one processed frame.
pub fn overlay(report: &FrameReport) -> Vec<DrawOp> {
    let width = report.width as i32;
    let height = report.height as i32;
    let mid_x = midline(report.width) as i32;

    let mut ops = vec![
        DrawOp::Line {
            from: (mid_x, 0),
            to: (mid_x, height),
            color: MIDLINE_COLOR,
            thickness: 2,
        },
        DrawOp::Text {
            text: Zone::Left.title().to_string(),
            origin: (mid_x / 2 - 50, 50),
            scale: 1.0,
            color: LEFT_COLOR,
        },
        DrawOp::Text {
            text: Zone::Right.title().to_string(),
            origin: (mid_x + mid_x / 2 - 50, 50),
            scale: 1.0,
            color: RIGHT_COLOR,
        },
    ];

    for det in &report.detections {
        let bb = det.bounding_box;
        ops.push(DrawOp::Text {
            text: format!("{} {:.2}", det.label, det.confidence),
            origin: (bb.x1, bb.y1 - 10),
            scale: 0.9,
            color: BOX_COLOR,
        });
        ops.push(DrawOp::Rect {
            top_left: (bb.x1, bb.y1),
            bottom_right: (bb.x2, bb.y2),
            color: BOX_COLOR,
            thickness: 2,
        });
    }

    if let Some(outcome) = report.outcome() {
        ops.push(DrawOp::Text {
            text: outcome.banner().to_string(),
            origin: (mid_x - 200, height - 30),
            scale: 1.2,
            color: BANNER_COLOR,
        });
    }

    ops.push(DrawOp::Text {
        text: format!("Score - {}: {}", Zone::Left, report.score.score_left),
        origin: (30, height - 60),
        scale: 1.0,
        color: LEFT_COLOR,
    });
    ops.push(DrawOp::Text {
        text: format!("Score - {}: {}", Zone::Right, report.score.score_right),
        origin: (width - 350, height - 60),
        scale: 1.0,
        color: RIGHT_COLOR,
    });

    ops
}

/// Display sink for processed frames.
pub trait Presenter {
    fn present(&mut self, frame: &Frame, report: &FrameReport, ops: &[DrawOp]) -> Result<()>;

    /// Called once when the loop ends.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(feature = "snapshot-jpeg")]
pub use snapshot::SnapshotPresenter;

#[cfg(feature = "snapshot-jpeg")]
mod snapshot {
    use std::path::PathBuf;

    use anyhow::{anyhow, Context, Result};
    use image::{Rgb as Pixel, RgbImage};

    use super::{DrawOp, Presenter};
    use crate::frame::Frame;
    use crate::referee::FrameReport;

    /// Writes the annotated frame of every resolved round to a JPEG file.
    ///
    /// Lines and boxes are rasterized; text ops are skipped since the image
    /// crate carries no font renderer.
    pub struct SnapshotPresenter {
        path: PathBuf,
        written: u64,
    }

    impl SnapshotPresenter {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self {
                path: path.into(),
                written: 0,
            }
        }

        pub fn written(&self) -> u64 {
            self.written
        }
    }

    impl Presenter for SnapshotPresenter {
        fn present(&mut self, frame: &Frame, report: &FrameReport, ops: &[DrawOp]) -> Result<()> {
            if report.outcome().is_none() {
                return Ok(());
            }
            let mut img = RgbImage::from_raw(frame.width, frame.height, frame.pixels().to_vec())
                .ok_or_else(|| anyhow!("frame buffer does not match its dimensions"))?;
            for op in ops {
                rasterize(&mut img, op);
            }
            img.save(&self.path)
                .with_context(|| format!("writing snapshot to {}", self.path.display()))?;
            self.written += 1;
            log::debug!("snapshot {} written to {}", self.written, self.path.display());
            Ok(())
        }
    }

    fn rasterize(img: &mut RgbImage, op: &DrawOp) {
        match op {
            DrawOp::Line {
                from,
                to,
                color,
                thickness,
            } => stroke_rect(img, *from, *to, *color, *thickness, true),
            DrawOp::Rect {
                top_left,
                bottom_right,
                color,
                thickness,
            } => stroke_rect(img, *top_left, *bottom_right, *color, *thickness, false),
            DrawOp::Text { .. } => {}
        }
    }

    /// Axis-aligned strokes only; every op the overlay emits is axis-aligned.
    fn stroke_rect(
        img: &mut RgbImage,
        a: (i32, i32),
        b: (i32, i32),
        color: [u8; 3],
        thickness: u32,
        filled: bool,
    ) {
        let (w, h) = (img.width() as i32, img.height() as i32);
        let t = thickness.max(1) as i32;
        let (x0, x1) = (a.0.min(b.0), a.0.max(b.0));
        let (y0, y1) = (a.1.min(b.1), a.1.max(b.1));
        for y in (y0 - t / 2)..=(y1 + t / 2) {
            for x in (x0 - t / 2)..=(x1 + t / 2) {
                if x < 0 || y < 0 || x >= w || y >= h {
                    continue;
                }
                let on_edge = (x - x0).abs() < t
                    || (x - x1).abs() < t
                    || (y - y0).abs() < t
                    || (y - y1).abs() < t;
                if filled || on_edge {
                    img.put_pixel(x as u32, y as u32, Pixel(color));
                }
            }
        }
    }

}

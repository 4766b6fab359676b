//! YOLOv8 pre- and post-processing.
//!
//! Kept free of any inference runtime so the geometry can be tested without
//! a model file. The tract backend feeds its raw output tensor through
//! `decode`.

use std::cmp::Ordering;

use anyhow::{anyhow, Result};

use crate::detect::result::{BoundingBox, Detection};
use crate::frame::{expected_len, RGB_CHANNELS};

/// Gray used by ultralytics for letterbox padding.
const PAD_VALUE: f32 = 114.0 / 255.0;

/// Scale and padding applied when fitting a frame into the square model input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Letterbox {
    pub fn fit(frame_width: u32, frame_height: u32, input_size: u32) -> Result<Self> {
        if frame_width == 0 || frame_height == 0 || input_size == 0 {
            return Err(anyhow!("letterbox dimensions must be non-zero"));
        }
        let scale = (input_size as f32 / frame_width as f32)
            .min(input_size as f32 / frame_height as f32);
        let scaled_w = (frame_width as f32 * scale).round();
        let scaled_h = (frame_height as f32 * scale).round();
        Ok(Self {
            scale,
            pad_x: (input_size as f32 - scaled_w) / 2.0,
            pad_y: (input_size as f32 - scaled_h) / 2.0,
            frame_width,
            frame_height,
        })
    }

    /// Map a point from model input space back to frame pixels.
    pub fn to_frame(&self, x: f32, y: f32) -> (i32, i32) {
        let fx = ((x - self.pad_x) / self.scale).clamp(0.0, self.frame_width as f32);
        let fy = ((y - self.pad_y) / self.scale).clamp(0.0, self.frame_height as f32);
        (fx.round() as i32, fy.round() as i32)
    }
}

/// Build a normalized CHW input tensor of `input_size`², nearest-neighbor
/// resampled and letterboxed.
pub fn letterbox_chw(
    pixels: &[u8],
    width: u32,
    height: u32,
    input_size: u32,
) -> Result<(Vec<f32>, Letterbox)> {
    let expected = expected_len(width, height)?;
    if pixels.len() != expected {
        return Err(anyhow!(
            "expected {} RGB bytes, received {}",
            expected,
            pixels.len()
        ));
    }
    let lb = Letterbox::fit(width, height, input_size)?;
    let size = input_size as usize;
    let plane = size * size;
    let mut chw = vec![PAD_VALUE; plane * RGB_CHANNELS];

    for y in 0..size {
        let src_y = (y as f32 + 0.5 - lb.pad_y) / lb.scale;
        if src_y < 0.0 || src_y >= height as f32 {
            continue;
        }
        for x in 0..size {
            let src_x = (x as f32 + 0.5 - lb.pad_x) / lb.scale;
            if src_x < 0.0 || src_x >= width as f32 {
                continue;
            }
            let idx = (src_y as usize * width as usize + src_x as usize) * RGB_CHANNELS;
            for channel in 0..RGB_CHANNELS {
                chw[channel * plane + y * size + x] = pixels[idx + channel] as f32 / 255.0;
            }
        }
    }

    Ok((chw, lb))
}

/// Decode a YOLOv8 detection head laid out as `[4 + classes, anchors]`
/// (batch dimension already removed), then apply per-class NMS.
///
/// Results are ordered by descending confidence.
pub fn decode(
    output: &[f32],
    labels: &[String],
    letterbox: &Letterbox,
    confidence_threshold: f32,
    iou_threshold: f32,
) -> Result<Vec<Detection>> {
    let rows = 4 + labels.len();
    if labels.is_empty() || output.len() % rows != 0 {
        return Err(anyhow!(
            "output of {} values does not fit {} rows ({} labels)",
            output.len(),
            rows,
            labels.len()
        ));
    }
    let anchors = output.len() / rows;
    let at = |row: usize, anchor: usize| output[row * anchors + anchor];

    let mut candidates: Vec<(usize, Detection)> = Vec::new();
    for anchor in 0..anchors {
        let (class, score) = (0..labels.len())
            .map(|c| (c, at(4 + c, anchor)))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .unwrap_or((0, 0.0));
        if score.is_nan() || score < confidence_threshold {
            continue;
        }
        let (cx, cy, w, h) = (at(0, anchor), at(1, anchor), at(2, anchor), at(3, anchor));
        let (x1, y1) = letterbox.to_frame(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = letterbox.to_frame(cx + w / 2.0, cy + h / 2.0);
        candidates.push((
            class,
            Detection::new(labels[class].clone(), score, BoundingBox::new(x1, y1, x2, y2)),
        ));
    }

    Ok(non_max_suppression(candidates, iou_threshold))
}

fn non_max_suppression(
    mut candidates: Vec<(usize, Detection)>,
    iou_threshold: f32,
) -> Vec<Detection> {
    candidates.sort_by(|a, b| {
        b.1.confidence
            .partial_cmp(&a.1.confidence)
            .unwrap_or(Ordering::Equal)
    });
    let mut kept: Vec<(usize, Detection)> = Vec::new();
    for (class, det) in candidates {
        let suppressed = kept.iter().any(|(k_class, k)| {
            *k_class == class && k.bounding_box.iou(&det.bounding_box) > iou_threshold
        });
        if !suppressed {
            kept.push((class, det));
        }
    }
    kept.into_iter().map(|(_, det)| det).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        ["paper", "rock", "scissors"].map(String::from).to_vec()
    }

    /// Head with the given anchors as `(cx, cy, w, h, [scores; 3])`.
    fn head(anchors: &[(f32, f32, f32, f32, [f32; 3])]) -> Vec<f32> {
        let n = anchors.len();
        let mut out = vec![0.0; 7 * n];
        for (i, (cx, cy, w, h, scores)) in anchors.iter().enumerate() {
            out[i] = *cx;
            out[n + i] = *cy;
            out[2 * n + i] = *w;
            out[3 * n + i] = *h;
            for (c, s) in scores.iter().enumerate() {
                out[(4 + c) * n + i] = *s;
            }
        }
        out
    }

    #[test]
    fn letterbox_fits_wide_frame() {
        let lb = Letterbox::fit(1280, 720, 640).unwrap();
        assert_eq!(lb.scale, 0.5);
        assert_eq!(lb.pad_x, 0.0);
        assert_eq!(lb.pad_y, 140.0);
        assert_eq!(lb.to_frame(100.0, 140.0), (200, 0));
        assert_eq!(lb.to_frame(640.0, 500.0), (1280, 720));
    }

    #[test]
    fn letterbox_tensor_pads_with_gray() {
        let pixels = vec![255u8; 4 * 2 * 3];
        let (chw, lb) = letterbox_chw(&pixels, 4, 2, 4).unwrap();
        assert_eq!(lb.pad_y, 1.0);
        assert_eq!(chw.len(), 48);
        // Top row is padding, second row is image.
        assert_eq!(chw[0], PAD_VALUE);
        assert_eq!(chw[4], 1.0);
    }

    #[test]
    fn decode_maps_boxes_to_frame_and_filters() {
        let lb = Letterbox::fit(1280, 720, 640).unwrap();
        let out = head(&[
            (100.0, 320.0, 40.0, 40.0, [0.1, 0.9, 0.0]),
            (450.0, 320.0, 40.0, 40.0, [0.0, 0.1, 0.8]),
            (300.0, 320.0, 40.0, 40.0, [0.2, 0.3, 0.1]),
        ]);
        let dets = decode(&out, &labels(), &lb, 0.5, 0.7).unwrap();
        assert_eq!(dets.len(), 2);
        assert_eq!(dets[0].label, "rock");
        assert_eq!(dets[0].bounding_box.center_x(), 200);
        assert_eq!(dets[1].label, "scissors");
        assert_eq!(dets[1].bounding_box.center_x(), 900);
    }

    #[test]
    fn nms_suppresses_overlap_within_class_only() {
        let lb = Letterbox::fit(640, 640, 640).unwrap();
        let out = head(&[
            (100.0, 100.0, 50.0, 50.0, [0.0, 0.9, 0.0]),
            (102.0, 100.0, 50.0, 50.0, [0.0, 0.8, 0.0]),
            (101.0, 100.0, 50.0, 50.0, [0.7, 0.0, 0.0]),
        ]);
        let dets = decode(&out, &labels(), &lb, 0.5, 0.7).unwrap();
        let names: Vec<_> = dets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(names, vec!["rock", "paper"]);
    }

    #[test]
    fn decode_rejects_mismatched_head() {
        let lb = Letterbox::fit(640, 640, 640).unwrap();
        assert!(decode(&[0.0; 10], &labels(), &lb, 0.5, 0.7).is_err());
    }
}

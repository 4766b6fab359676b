use serde::{Deserialize, Serialize};

/// Result of running a classifier on one frame.
#[derive(Clone, Debug, Default)]
pub struct DetectionResult {
    /// Detections in the order the backend produced them.
    pub detections: Vec<Detection>,
}

impl DetectionResult {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Drop detections below a confidence threshold, keeping order.
    pub fn above(mut self, threshold: f32) -> Self {
        self.detections.retain(|d| d.confidence >= threshold);
        self
    }
}

/// One classified hand in frame pixel coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bounding_box: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32, bounding_box: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bounding_box,
        }
    }
}

/// Axis-aligned box, `(x1, y1)` top-left and `(x2, y2)` bottom-right, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box of the given width and height centered on `(cx, cy)`.
    pub fn centered(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        Self::new(cx - w / 2, cy - h / 2, cx - w / 2 + w, cy - h / 2 + h)
    }

    /// Horizontal center, floored like the zone midline.
    pub fn center_x(&self) -> i32 {
        (self.x1 + self.x2).div_euclid(2)
    }

    pub fn width(&self) -> i32 {
        (self.x2 - self.x1).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y2 - self.y1).max(0)
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// Intersection over union with another box.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        let inter = BoundingBox::new(ix1, iy1, ix2, iy2).area();
        let union = self.area() + other.area() - inter;
        if union <= 0 {
            0.0
        } else {
            inter as f32 / union as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_box_reports_its_center() {
        let b = BoundingBox::centered(200, 300, 100, 80);
        assert_eq!(b.center_x(), 200);
        assert_eq!(b.width(), 100);
        assert_eq!(b.height(), 80);
    }

    #[test]
    fn iou_of_identical_and_disjoint_boxes() {
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(20, 20, 30, 30);
        assert_eq!(a.iou(&a), 1.0);
        assert_eq!(a.iou(&b), 0.0);
        let half = BoundingBox::new(5, 0, 15, 10);
        assert!((a.iou(&half) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn confidence_filter_keeps_order() {
        let bb = BoundingBox::new(0, 0, 1, 1);
        let result = DetectionResult::new(vec![
            Detection::new("rock", 0.9, bb),
            Detection::new("paper", 0.2, bb),
            Detection::new("scissors", 0.6, bb),
        ])
        .above(0.5);
        let labels: Vec<_> = result.detections.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["rock", "scissors"]);
    }
}

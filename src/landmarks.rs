//! Detection data produced by the external face/landmark detector.

use crate::constants::{LEFT_EYE_RANGE, NOSE_RANGE, NOSE_TIP_INDEX, NUM_FACIAL_LANDMARKS, RIGHT_EYE_RANGE};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A 2D point in frame pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned face bounding box in frame pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FaceBox {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the box has a finite, positive area
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Fixed-order landmark sequence for one face (68-point layout)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    points: Vec<Point>,
}

impl FaceLandmarks {
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// All points in model order
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether every index of the fixed topology is present
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.points.len() >= NUM_FACIAL_LANDMARKS
    }

    /// Left eye contour; empty when the sequence is truncated
    #[must_use]
    pub fn left_eye(&self) -> &[Point] {
        self.subset(LEFT_EYE_RANGE)
    }

    /// Right eye contour; empty when the sequence is truncated
    #[must_use]
    pub fn right_eye(&self) -> &[Point] {
        self.subset(RIGHT_EYE_RANGE)
    }

    /// Nose points; empty when the sequence is truncated
    #[must_use]
    pub fn nose(&self) -> &[Point] {
        self.subset(NOSE_RANGE)
    }

    /// The canonical nose-tip landmark
    #[must_use]
    pub fn nose_tip(&self) -> Option<Point> {
        self.points.get(NOSE_TIP_INDEX).copied()
    }

    fn subset(&self, range: Range<usize>) -> &[Point] {
        self.points.get(range).unwrap_or(&[])
    }
}

/// One detected face: its box and landmarks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "box")]
    pub face_box: FaceBox,
    pub landmarks: FaceLandmarks,
}

/// Detector output for one sample; `None` means no face was found
pub type DetectionResult = Option<Detection>;

//! Head posture heuristic.
//!
//! Classifies a face as "head down" from 2D landmarks alone: the further the
//! nose tip sits below eye level, relative to face height, the more the head
//! is bowed toward the desk. This is a proxy, not a 3D pose estimate.

use crate::{
    constants::DEFAULT_HEAD_DOWN_THRESHOLD,
    landmarks::{FaceBox, FaceLandmarks, Point},
    Error, Result,
};

/// Landmark-based "head down" classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureHeuristic {
    threshold: f64,
}

impl Default for PostureHeuristic {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_HEAD_DOWN_THRESHOLD,
        }
    }
}

impl PostureHeuristic {
    /// Create a heuristic with a custom threshold
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is not a finite, positive number
    pub fn new(threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "Head-down threshold must be finite and positive, got {threshold}"
            )));
        }
        Ok(Self { threshold })
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether the head is bowed below the threshold.
    ///
    /// The boundary belongs to "not down": a relative offset exactly equal to
    /// the threshold returns `false`. Missing landmark subsets, a missing box
    /// or a degenerate box also return `false`.
    #[must_use]
    pub fn is_head_down(&self, landmarks: &FaceLandmarks, face_box: Option<&FaceBox>) -> bool {
        match relative_nose_y(landmarks, face_box) {
            Some(relative) => relative > self.threshold,
            None => false,
        }
    }
}

/// Nose-tip offset below average eye level, normalized by face height.
///
/// Returns `None` when the measurement cannot be taken.
#[must_use]
pub fn relative_nose_y(landmarks: &FaceLandmarks, face_box: Option<&FaceBox>) -> Option<f64> {
    let face_box = face_box?;
    if !face_box.has_area() || landmarks.nose().is_empty() {
        return None;
    }

    let left = mean_y(landmarks.left_eye())?;
    let right = mean_y(landmarks.right_eye())?;
    let avg_eye_y = (left + right) / 2.0;
    let nose_tip_y = landmarks.nose_tip()?.y;

    let relative = (nose_tip_y - avg_eye_y) / face_box.height;
    relative.is_finite().then_some(relative)
}

fn mean_y(points: &[Point]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)] // landmark subsets are tiny
    let n = points.len() as f64;
    Some(points.iter().map(|p| p.y).sum::<f64>() / n)
}

//! Per-sample reduction of detector output into a studying decision.

use crate::{display::StatusStyle, landmarks::DetectionResult, posture::PostureHeuristic};

/// Studying decision for one sample. Recomputed every tick, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StudyState {
    /// A face was detected
    pub present: bool,
    /// The detected head is bowed
    pub head_down: bool,
    /// `present && head_down`
    pub studying: bool,
}

impl StudyState {
    /// State for a sample where no face could be observed
    pub const ABSENT: Self = Self {
        present: false,
        head_down: false,
        studying: false,
    };

    /// Combine presence and posture into a studying decision
    #[must_use]
    pub fn from_parts(present: bool, head_down: bool) -> Self {
        let head_down = present && head_down;
        Self {
            present,
            head_down,
            studying: present && head_down,
        }
    }

    /// Reduce a detector result to a studying decision
    #[must_use]
    pub fn reduce(detection: &DetectionResult, heuristic: &PostureHeuristic) -> Self {
        match detection {
            Some(face) => Self::from_parts(true, heuristic.is_head_down(&face.landmarks, Some(&face.face_box))),
            None => Self::ABSENT,
        }
    }

    /// Status shown to the user for this sample
    #[must_use]
    pub fn status(&self) -> StudyStatus {
        match (self.present, self.studying) {
            (false, _) => StudyStatus::PersonNotFound,
            (true, true) => StudyStatus::Studying,
            (true, false) => StudyStatus::Distracted,
        }
    }
}

/// User-visible monitoring status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyStatus {
    /// Detector is still loading
    Loading,
    /// Detector loaded, waiting for the first frame
    Ready,
    /// Present with head down
    Studying,
    /// Present with head up
    Distracted,
    /// No face in frame
    PersonNotFound,
    /// Frame source paused or ended; nobody can be seen, shown in the paused style
    SourcePaused,
    /// Camera or model failure
    SensorError,
}

impl StudyStatus {
    /// Status text
    #[must_use]
    pub fn text(&self) -> &'static str {
        match self {
            Self::Loading => "loading model",
            Self::Ready => "ready",
            Self::Studying => "studying",
            Self::Distracted => "distracted",
            Self::PersonNotFound | Self::SourcePaused => "person not found",
            Self::SensorError => "camera/model error",
        }
    }

    /// Display style category
    #[must_use]
    pub fn style(&self) -> StatusStyle {
        match self {
            Self::Loading => StatusStyle::Loading,
            Self::Ready => StatusStyle::Ready,
            Self::Studying => StatusStyle::Studying,
            Self::Distracted | Self::PersonNotFound => StatusStyle::Distracted,
            Self::SourcePaused => StatusStyle::Paused,
            Self::SensorError => StatusStyle::CameraError,
        }
    }
}

impl std::fmt::Display for StudyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

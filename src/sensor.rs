//! Seams to the external camera and landmark detector.
//!
//! Neither is implemented here beyond the recorded-trace backend in
//! [`crate::replay`]; camera capture and model inference plug in through
//! these traits.

use crate::{landmarks::DetectionResult, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Playback state of a frame source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Playing,
    Paused,
    Ended,
}

/// One captured frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Monotonic frame counter assigned by the source
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    /// Capture time in the source's clock
    pub timestamp_ms: u64,
    /// Raw pixel bytes; layout is agreed between source and detector
    pub data: Arc<[u8]>,
}

impl Frame {
    /// Frame without pixel data, for backends that do not need it
    #[must_use]
    pub fn empty(sequence: u64, width: u32, height: u32, timestamp_ms: u64) -> Self {
        Self {
            sequence,
            width,
            height,
            timestamp_ms,
            data: Arc::from(Vec::new()),
        }
    }
}

/// Result of asking the source for the current frame
#[derive(Debug, Clone, PartialEq)]
pub enum Grab {
    /// A live frame is available
    Frame(Frame),
    /// Source is paused or ended; no frame this tick
    Unavailable(Readiness),
}

/// Live frame provider (camera, video element, recorded trace)
#[async_trait]
pub trait FrameSource: Send {
    /// Acquire the device.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SensorUnavailable`] when the camera cannot be
    /// opened or permission is denied
    async fn open(&mut self) -> Result<()>;

    /// Current playback state
    fn readiness(&self) -> Readiness;

    /// Pull the frame for this tick.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SensorUnavailable`] if the device was lost
    fn grab(&mut self) -> Result<Grab>;
}

/// Face and landmark detector (single face, low-latency model)
#[async_trait]
pub trait Detector: Send {
    /// Load model weights.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ModelLoad`] if the model cannot be loaded
    async fn load(&mut self) -> Result<()>;

    /// Detect at most one face in `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Detection`] for a failed sample; callers treat
    /// it as "no face" and carry on
    async fn detect(&mut self, frame: &Frame) -> Result<DetectionResult>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

//! Recorded detector traces.
//!
//! A trace is a YAML list of timestamped samples. Replaying it through
//! [`ReplaySource`] and [`ReplayDetector`] drives the sample loop exactly as a
//! live camera would, with the shared [`ManualClock`] following the recorded
//! timestamps.

use crate::{
    landmarks::{Detection, DetectionResult},
    sensor::{Detector, Frame, FrameSource, Grab, Readiness},
    stopwatch::ManualClock,
    Error, Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// One recorded sample
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceSample {
    /// Capture time in milliseconds from the start of the recording
    pub at_ms: u64,
    /// Detector output; absent means no face
    pub detection: Option<Detection>,
    /// Frame source was paused for this sample
    pub paused: bool,
    /// Detector failed on this sample with the given message
    pub error: Option<String>,
}

/// A full recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trace {
    pub width: u32,
    pub height: u32,
    /// Camera failed to open with this message
    pub sensor_error: Option<String>,
    /// Model failed to load with this message
    pub model_error: Option<String>,
    pub samples: Vec<TraceSample>,
}

impl Default for Trace {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            sensor_error: None,
            model_error: None,
            samples: Vec::new(),
        }
    }
}

impl Trace {
    /// Parse and validate a YAML trace
    ///
    /// # Errors
    ///
    /// Returns [`Error::Trace`] if the YAML is malformed or timestamps go backwards
    pub fn from_yaml(content: &str) -> Result<Self> {
        let trace: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Trace(format!("Failed to parse trace: {e}")))?;
        trace.validate()?;
        Ok(trace)
    }

    /// Serialize to YAML
    ///
    /// # Errors
    ///
    /// Returns [`Error::Trace`] if serialization fails
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Trace(format!("Failed to serialize trace: {e}")))
    }

    /// Check that sample timestamps never decrease
    ///
    /// # Errors
    ///
    /// Returns [`Error::Trace`] naming the first out-of-order sample
    pub fn validate(&self) -> Result<()> {
        for (i, pair) in self.samples.windows(2).enumerate() {
            if pair[1].at_ms < pair[0].at_ms {
                return Err(Error::Trace(format!(
                    "Sample {} at {} ms is earlier than sample {} at {} ms",
                    i + 1,
                    pair[1].at_ms,
                    i,
                    pair[0].at_ms
                )));
            }
        }
        Ok(())
    }

    /// Recorded duration
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.at_ms.saturating_sub(first.at_ms),
            _ => 0,
        }
    }
}

/// Load a trace from a YAML file
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid trace
pub fn load_trace<P: AsRef<Path>>(path: P) -> Result<Trace> {
    log::info!("Loading trace from {}", path.as_ref().display());
    let content = std::fs::read_to_string(path)?;
    Trace::from_yaml(&content)
}

/// Build a frame source and detector over the same trace and clock
#[must_use]
pub fn replay(trace: Trace, clock: ManualClock) -> (ReplaySource, ReplayDetector) {
    let trace = Arc::new(trace);
    (
        ReplaySource {
            trace: Arc::clone(&trace),
            clock,
            cursor: 0,
        },
        ReplayDetector { trace },
    )
}

/// Frame source that steps through a trace, one sample per grab
#[derive(Debug)]
pub struct ReplaySource {
    trace: Arc<Trace>,
    clock: ManualClock,
    cursor: usize,
}

impl ReplaySource {
    /// Samples not yet grabbed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.trace.samples.len().saturating_sub(self.cursor)
    }
}

#[async_trait]
impl FrameSource for ReplaySource {
    async fn open(&mut self) -> Result<()> {
        match &self.trace.sensor_error {
            Some(msg) => Err(Error::SensorUnavailable(msg.clone())),
            None => Ok(()),
        }
    }

    fn readiness(&self) -> Readiness {
        match self.trace.samples.get(self.cursor) {
            None => Readiness::Ended,
            Some(sample) if sample.paused => Readiness::Paused,
            Some(_) => Readiness::Playing,
        }
    }

    fn grab(&mut self) -> Result<Grab> {
        let Some(sample) = self.trace.samples.get(self.cursor) else {
            return Ok(Grab::Unavailable(Readiness::Ended));
        };
        let sequence = self.cursor as u64;
        self.cursor += 1;
        self.clock.set(sample.at_ms);

        if sample.paused {
            return Ok(Grab::Unavailable(Readiness::Paused));
        }
        Ok(Grab::Frame(Frame::empty(sequence, self.trace.width, self.trace.height, sample.at_ms)))
    }
}

/// Detector that answers with the recorded result for each frame
#[derive(Debug)]
pub struct ReplayDetector {
    trace: Arc<Trace>,
}

#[async_trait]
impl Detector for ReplayDetector {
    async fn load(&mut self) -> Result<()> {
        match &self.trace.model_error {
            Some(msg) => Err(Error::ModelLoad(msg.clone())),
            None => Ok(()),
        }
    }

    async fn detect(&mut self, frame: &Frame) -> Result<DetectionResult> {
        let sample = usize::try_from(frame.sequence)
            .ok()
            .and_then(|i| self.trace.samples.get(i))
            .ok_or_else(|| Error::Detection(format!("No recorded sample for frame {}", frame.sequence)))?;

        match &sample.error {
            Some(msg) => Err(Error::Detection(msg.clone())),
            None => Ok(sample.detection.clone()),
        }
    }

    fn name(&self) -> &str {
        "replay"
    }
}

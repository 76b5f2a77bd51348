//! Configuration management for the study timer

use crate::{
    constants::{
        DEFAULT_CONSECUTIVE_SAMPLES, DEFAULT_HEAD_DOWN_THRESHOLD, DEFAULT_READOUT_INTERVAL_MS, DEFAULT_REFRESH_HZ,
        MS_PER_SECOND,
    },
    filters::{create_filter, StudyFilter},
    posture::PostureHeuristic,
    sample_loop::LoopConfig,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Head posture heuristic
    pub posture: PostureConfig,

    /// Studying-signal filter
    pub filter: FilterConfig,

    /// Display cadence
    pub display: DisplayConfig,

    /// Stopwatch control
    pub stopwatch: StopwatchConfig,

    /// Trace replay
    pub replay: ReplayConfig,
}

/// Posture heuristic parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    /// Nose-tip offset below eye level, as a fraction of face height
    pub head_down_threshold: f64,
}

/// Filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Filter type: none, consecutive or majority
    pub kind: String,

    /// Samples required by the consecutive and majority filters
    pub consecutive_samples: usize,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Display refresh rate driving the sample loop
    pub refresh_hz: u32,

    /// Maximum gap between readout updates
    pub readout_interval_ms: u64,
}

/// Stopwatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StopwatchConfig {
    /// Start automatically on the first studying sample
    pub auto_start: bool,
}

/// Replay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Exit once the trace is exhausted
    pub stop_on_end: bool,
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            head_down_threshold: DEFAULT_HEAD_DOWN_THRESHOLD,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            kind: "none".to_string(),
            consecutive_samples: DEFAULT_CONSECUTIVE_SAMPLES,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_hz: DEFAULT_REFRESH_HZ,
            readout_interval_ms: DEFAULT_READOUT_INTERVAL_MS,
        }
    }
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self { auto_start: true }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self { stop_on_end: true }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create the studying-signal filter from configuration
    ///
    /// # Errors
    ///
    /// Returns an error for unknown filter kinds or a zero window
    pub fn create_filter(&self) -> Result<Box<dyn StudyFilter>> {
        if self.filter.consecutive_samples == 0 {
            return Err(Error::ConfigError("Consecutive samples must be greater than 0".to_string()));
        }
        let kind = self.filter.kind.trim().to_lowercase();
        // A bare windowed kind takes its window from `consecutive_samples`
        if kind.contains(':') || matches!(kind.as_str(), "none" | "nofilter") {
            create_filter(&kind)
        } else {
            create_filter(&format!("{kind}:{}", self.filter.consecutive_samples))
        }
    }

    /// Build the sample loop configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the posture threshold is invalid
    pub fn loop_config(&self) -> Result<LoopConfig> {
        Ok(LoopConfig {
            heuristic: PostureHeuristic::new(self.posture.head_down_threshold)?,
            refresh_hz: self.display.refresh_hz,
            readout_interval_ms: self.display.readout_interval_ms,
            stop_on_end: self.replay.stop_on_end,
            auto_start: self.stopwatch.auto_start,
        })
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        let threshold = self.posture.head_down_threshold;
        if !threshold.is_finite() || threshold <= 0.0 || threshold >= 1.0 {
            return Err(Error::ConfigError(
                "Head-down threshold must be between 0.0 and 1.0 (exclusive)".to_string(),
            ));
        }

        if self.filter.consecutive_samples == 0 {
            return Err(Error::ConfigError("Consecutive samples must be greater than 0".to_string()));
        }
        self.create_filter()?;

        if self.display.refresh_hz == 0 {
            return Err(Error::ConfigError("Refresh rate must be greater than 0".to_string()));
        }
        if self.display.readout_interval_ms == 0 || self.display.readout_interval_ms > MS_PER_SECOND {
            return Err(Error::ConfigError(
                "Readout interval must be between 1 and 1000 ms".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Study Timer Configuration

# Head posture heuristic
posture:
  head_down_threshold: 0.1

# Studying-signal filter (none, consecutive, majority)
filter:
  kind: "none"
  consecutive_samples: 3

# Display cadence
display:
  refresh_hz: 60
  readout_interval_ms: 1000

# Stopwatch control
stopwatch:
  auto_start: true

# Trace replay
replay:
  stop_on_end: true
"#;

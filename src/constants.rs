//! Constants used throughout the application

use std::ops::Range;

/// Number of facial landmarks produced by the 68-point model
pub const NUM_FACIAL_LANDMARKS: usize = 68;

/// Nose bridge and lower nose points
pub const NOSE_RANGE: Range<usize> = 27..36;

/// Tip of the nose. Must be remapped if a different landmark topology is used.
pub const NOSE_TIP_INDEX: usize = 30;

/// Left eye contour (subject's left, image right)
pub const LEFT_EYE_RANGE: Range<usize> = 36..42;

/// Right eye contour
pub const RIGHT_EYE_RANGE: Range<usize> = 42..48;

/// Nose tip offset below eye level, as a fraction of face height
pub const DEFAULT_HEAD_DOWN_THRESHOLD: f64 = 0.1;

/// Display refresh rate driving the sample loop
pub const DEFAULT_REFRESH_HZ: u32 = 60;

/// Maximum interval between elapsed-time readout updates
pub const DEFAULT_READOUT_INTERVAL_MS: u64 = 1000;

/// Samples that must agree before the consecutive filter flips
pub const DEFAULT_CONSECUTIVE_SAMPLES: usize = 3;

/// Milliseconds per second / minute / hour
pub const MS_PER_SECOND: u64 = 1000;
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

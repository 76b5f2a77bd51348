//! Optional smoothing of the per-sample studying signal.
//!
//! The default is [`NoFilter`]: the stopwatch reacts to every sample
//! immediately. The other filters trade reaction time for fewer
//! start/pause flips when the posture hovers around the threshold.

/// Flip only after N agreeing samples
pub mod consecutive;

/// Majority vote over a sliding window
pub mod majority;

use crate::{constants::DEFAULT_CONSECUTIVE_SAMPLES, Error, Result};

/// Trait for studying-signal filters
pub trait StudyFilter: Send + Sync {
    /// Feed one sample's studying decision, get the filtered decision
    fn apply(&mut self, studying: bool) -> bool;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// Pass-through filter: immediate, unsmoothed reaction
pub struct NoFilter;

impl StudyFilter for NoFilter {
    fn apply(&mut self, studying: bool) -> bool {
        studying
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a filter from a spec string such as `none`, `consecutive:5` or `majority:7`
///
/// # Errors
///
/// Returns an error for unknown filter names or invalid window sizes
pub fn create_filter(spec: &str) -> Result<Box<dyn StudyFilter>> {
    let spec = spec.trim().to_lowercase();
    let (name, param) = match spec.split_once(':') {
        Some((name, param)) => (name, Some(param)),
        None => (spec.as_str(), None),
    };

    match name {
        "none" | "nofilter" => {
            if param.is_some() {
                return Err(Error::FilterError("Filter 'none' takes no parameter".to_string()));
            }
            Ok(Box::new(NoFilter))
        }
        "consecutive" | "debounce" => {
            let samples = parse_window(param, DEFAULT_CONSECUTIVE_SAMPLES)?;
            Ok(Box::new(consecutive::ConsecutiveFilter::new(samples)))
        }
        "majority" => {
            let window = parse_window(param, DEFAULT_CONSECUTIVE_SAMPLES)?;
            Ok(Box::new(majority::MajorityFilter::new(window)))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {spec}"))),
    }
}

fn parse_window(param: Option<&str>, default: usize) -> Result<usize> {
    let Some(raw) = param else {
        return Ok(default);
    };
    let window: usize = raw
        .parse()
        .map_err(|_| Error::FilterError(format!("Window size must be a positive integer, got '{raw}'")))?;
    if window == 0 {
        return Err(Error::FilterError("Window size must be greater than 0".to_string()));
    }
    Ok(window)
}

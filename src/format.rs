//! Elapsed-time formatting.

use crate::constants::{MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};

/// Format milliseconds as `HH:MM:SS`, truncating partial seconds.
///
/// Hours are not wrapped, so sessions past 99 hours widen the first field.
#[must_use]
pub fn format_time(ms: u64) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

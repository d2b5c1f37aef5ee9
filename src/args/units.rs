//! Duration and timestamp normalization
//!
//! The server counts time in whole milliseconds or seconds. Positive
//! durations below one unit are rounded up to one unit rather than
//! silently turning into "no timeout".

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Whether a duration needs millisecond precision (PX/PEXPIRE style)
/// rather than whole seconds (EX/EXPIRE style)
pub fn use_precise(dur: Duration) -> bool {
    dur < Duration::from_secs(1) || dur.subsec_nanos() != 0
}

/// Duration in whole milliseconds, at least 1 for a positive duration
pub fn format_ms(dur: Duration) -> i64 {
    if !dur.is_zero() && dur < Duration::from_millis(1) {
        tracing::warn!(
            "specified duration is {:?}, but minimal supported value is 1ms - truncating to 1ms",
            dur
        );
        return 1;
    }
    saturating_i64(dur.as_millis())
}

/// Duration in whole seconds, at least 1 for a positive duration
pub fn format_sec(dur: Duration) -> i64 {
    if !dur.is_zero() && dur < Duration::from_secs(1) {
        tracing::warn!(
            "specified duration is {:?}, but minimal supported value is 1s - truncating to 1s",
            dur
        );
        return 1;
    }
    saturating_i64(dur.as_secs() as u128)
}

/// Unix timestamp in milliseconds (negative before the epoch)
pub fn unix_millis(at: SystemTime) -> i64 {
    match at.duration_since(UNIX_EPOCH) {
        Ok(since) => saturating_i64(since.as_millis()),
        Err(before) => -saturating_i64(before.duration().as_millis()),
    }
}

fn saturating_i64(n: u128) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

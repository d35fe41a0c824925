//! Validation of archive time-range bounds.
//!
//! Bounds are milliseconds from the UNIX epoch. The lower bound is inclusive
//! and so is the upper bound.

use crate::error::TimeRangeError;
use tracing::error;

/// Checks that `begin_ts <= end_ts` and that both bounds are non-negative.
///
/// Ordering is checked first, so a range that is both inverted and negative
/// reports [`TimeRangeError::BeginAfterEnd`].
///
/// # Examples
///
/// ```
/// use archman_core::timestamps::check_time_range;
///
/// assert!(check_time_range(0, 1000).is_ok());
/// assert!(check_time_range(1000, 0).is_err());
/// assert!(check_time_range(-1, 10).is_err());
/// ```
pub const fn check_time_range(begin_ts: i64, end_ts: i64) -> Result<(), TimeRangeError> {
    if begin_ts > end_ts {
        return Err(TimeRangeError::BeginAfterEnd { begin_ts, end_ts });
    }
    if begin_ts < 0 || end_ts < 0 {
        return Err(TimeRangeError::Negative { begin_ts, end_ts });
    }
    Ok(())
}

/// Validates a time range, logging the reason when it is rejected.
pub fn validate_time_range(begin_ts: i64, end_ts: i64) -> bool {
    match check_time_range(begin_ts, end_ts) {
        Ok(()) => true,
        Err(err) => {
            error!("{err}");
            false
        }
    }
}

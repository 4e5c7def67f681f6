//! # Height Projector
//!
//! Linear extrapolation of a block rate to a target time.

use chrono::{DateTime, Utc};

use crate::domain::{ProjectionResult, UpgradeHeightError};

/// Project `current_height` forward (or backward) to `target_time`.
///
/// Fractional blocks are discarded (truncation toward zero), so for a future
/// target the estimate is a lower bound. A target in the past is accepted and
/// yields a height below `current_height`.
///
/// All arithmetic is checked 64-bit signed; a result that does not fit is a
/// `ProjectionOverflow` error rather than a wrapped value.
pub fn project_height(
    current_height: i64,
    current_time: DateTime<Utc>,
    target_time: DateTime<Utc>,
    rate: f64,
) -> Result<ProjectionResult, UpgradeHeightError> {
    let seconds_until_target = target_time
        .timestamp()
        .checked_sub(current_time.timestamp())
        .ok_or_else(|| {
            UpgradeHeightError::ProjectionOverflow(format!(
                "seconds between {current_time} and {target_time}"
            ))
        })?;

    let blocks_until_target = blocks_in(rate, seconds_until_target)?;

    let upgrade_height = current_height
        .checked_add(blocks_until_target)
        .ok_or_else(|| {
            UpgradeHeightError::ProjectionOverflow(format!(
                "{current_height} + {blocks_until_target}"
            ))
        })?;

    Ok(ProjectionResult {
        seconds_until_target,
        blocks_until_target,
        upgrade_height,
    })
}

/// Whole blocks produced at `rate` over `seconds`, truncated toward zero.
fn blocks_in(rate: f64, seconds: i64) -> Result<i64, UpgradeHeightError> {
    if seconds == 0 {
        return Ok(0);
    }

    let blocks = (rate * seconds as f64).trunc();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    if !blocks.is_finite() || blocks < i64::MIN as f64 || blocks >= i64::MAX as f64 {
        return Err(UpgradeHeightError::ProjectionOverflow(format!(
            "{rate} blocks/s over {seconds}s"
        )));
    }

    Ok(blocks as i64)
}

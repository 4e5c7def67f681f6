//! # Value Objects
//!
//! Derived, ephemeral values: rate samples, targets and projections.

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::entities::BlockHeader;
use super::errors::UpgradeHeightError;
use super::invariants::UPGRADE_DATETIME_FORMAT;

/// Average block production rate between two sampled blocks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateSample {
    /// Height of the latest block.
    pub recent_height: i64,
    /// Time of the latest block.
    pub recent_time: DateTime<Utc>,
    /// Height of the block at the start of the window.
    pub historical_height: i64,
    /// Time of the block at the start of the window.
    pub historical_time: DateTime<Utc>,
    /// Blocks per second over the window.
    pub blocks_per_second: f64,
}

impl RateSample {
    /// Build a sample from the two headers and the computed rate.
    pub fn new(recent: &BlockHeader, historical: &BlockHeader, blocks_per_second: f64) -> Self {
        Self {
            recent_height: recent.height(),
            recent_time: recent.time(),
            historical_height: historical.height(),
            historical_time: historical.time(),
            blocks_per_second,
        }
    }

    /// Average seconds per block (the inverse of the rate).
    pub fn seconds_per_block(&self) -> f64 {
        1.0 / self.blocks_per_second
    }
}

/// Outcome of projecting a rate forward to a target time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Whole seconds from the current time to the target (negative if past).
    pub seconds_until_target: i64,
    /// Whole blocks expected in that interval, fractions discarded.
    pub blocks_until_target: i64,
    /// Estimated height at the target time.
    pub upgrade_height: i64,
}

/// When the upgrade should happen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeTarget {
    /// An absolute UTC time.
    At(DateTime<Utc>),
    /// A number of minutes after the start of the run.
    In {
        /// Minutes from now
        minutes: u64,
    },
}

impl UpgradeTarget {
    /// Resolve the target against the run's single captured `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, UpgradeHeightError> {
        match self {
            Self::At(at) => Ok(*at),
            Self::In { minutes } => i64::try_from(*minutes)
                .ok()
                .and_then(TimeDelta::try_minutes)
                .and_then(|delta| now.checked_add_signed(delta))
                .ok_or_else(|| {
                    UpgradeHeightError::InvalidConfig(format!(
                        "minutes until upgrade {minutes} is out of range"
                    ))
                }),
        }
    }
}

/// Parse `YYYY-MM-DD HH:MM:SS` as a UTC time.
///
/// Every field must be zero-padded; chrono alone also accepts `2024-3-1 1:2:3`.
pub fn parse_upgrade_datetime(input: &str) -> Result<DateTime<Utc>, UpgradeHeightError> {
    let trimmed = input.trim();
    if !is_padded_datetime(trimmed) {
        return Err(UpgradeHeightError::InvalidDateTime {
            input: input.to_string(),
            reason: "every field must be zero-padded".to_string(),
        });
    }

    NaiveDateTime::parse_from_str(trimmed, UPGRADE_DATETIME_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| UpgradeHeightError::InvalidDateTime {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

fn is_padded_datetime(input: &str) -> bool {
    input.len() == 19
        && input.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            10 => b == b' ',
            13 | 16 => b == b':',
            _ => b.is_ascii_digit(),
        })
}

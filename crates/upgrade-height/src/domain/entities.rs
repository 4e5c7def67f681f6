//! # Domain Entities
//!
//! Block samples as fetched from a block source.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::errors::BlockSourceError;

/// Block header subset needed for rate estimation.
///
/// Immutable once fetched. Heights are non-negative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockHeader {
    height: i64,
    time: DateTime<Utc>,
}

impl BlockHeader {
    /// Create a header, rejecting negative heights.
    pub fn new(height: i64, time: DateTime<Utc>) -> Result<Self, BlockSourceError> {
        if height < 0 {
            return Err(BlockSourceError::InvalidHeight {
                value: height.to_string(),
                reason: "height must be non-negative".to_string(),
            });
        }
        Ok(Self { height, time })
    }

    /// Block height.
    pub fn height(&self) -> i64 {
        self.height
    }

    /// Block timestamp.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Block timestamp in whole Unix seconds.
    pub fn unix_seconds(&self) -> i64 {
        self.time.timestamp()
    }
}

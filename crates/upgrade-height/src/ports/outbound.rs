//! # Outbound Ports
//!
//! Traits for external dependencies (the node serving block headers).

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::{BlockHeader, BlockSourceError};

/// Block source - outbound port.
///
/// Read-only access to block headers: the latest one, or one at a height.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Fetch the most recent block header.
    async fn latest_header(&self) -> Result<BlockHeader, BlockSourceError>;

    /// Fetch the block header at `height`.
    async fn header_at(&self, height: i64) -> Result<BlockHeader, BlockSourceError>;

    /// Source identifier (for logging).
    fn source_id(&self) -> &str;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// In-memory block source for testing.
///
/// Heights that were never inserted (or fall below `lowest_height`) answer the
/// way a pruned CometBFT node does.
#[derive(Default)]
pub struct MockBlockSource {
    /// Stored headers by height.
    pub headers: BTreeMap<i64, BlockHeader>,
    /// Heights below this are reported as pruned.
    pub lowest_height: i64,
    /// Fail every request with a connection error.
    pub should_fail: bool,
    calls: AtomicUsize,
}

impl MockBlockSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header at `height` with the given Unix time in seconds.
    pub fn with_block(mut self, height: i64, unix_seconds: i64) -> Self {
        let header = Utc
            .timestamp_opt(unix_seconds, 0)
            .single()
            .and_then(|time| BlockHeader::new(height, time).ok());
        if let Some(header) = header {
            self.headers.insert(height, header);
        }
        self
    }

    /// Report heights below `height` as pruned.
    pub fn with_lowest_height(mut self, height: i64) -> Self {
        self.lowest_height = height;
        self
    }

    /// Make every request fail.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Number of requests served (including failures).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> Result<(), BlockSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(BlockSourceError::Connection {
                url: "mock://block-source".to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BlockSource for MockBlockSource {
    async fn latest_header(&self) -> Result<BlockHeader, BlockSourceError> {
        self.record_call()?;
        self.headers
            .values()
            .next_back()
            .cloned()
            .ok_or(BlockSourceError::MissingField { path: "result" })
    }

    async fn header_at(&self, height: i64) -> Result<BlockHeader, BlockSourceError> {
        self.record_call()?;
        match self.headers.get(&height) {
            Some(header) if height >= self.lowest_height => Ok(header.clone()),
            _ => Err(BlockSourceError::Rpc {
                code: -32603,
                message: "Internal error".to_string(),
                data: Some(format!(
                    "height {} is not available, lowest height is {}",
                    height, self.lowest_height
                )),
            }),
        }
    }

    fn source_id(&self) -> &str {
        "mock"
    }
}

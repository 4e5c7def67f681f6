//! CometBFT RPC block source.
//!
//! Implements the `BlockSource` port over the node's JSON-over-HTTP
//! `/block` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::schema::decode_block_response;
use crate::domain::{
    BlockHeader, BlockSourceError, UpgradeHeightError, CONNECT_TIMEOUT_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::ports::BlockSource;

/// Prefix `http://` when no scheme is given and drop trailing slashes.
pub fn normalize_rpc_address(address: &str) -> Result<String, UpgradeHeightError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(UpgradeHeightError::InvalidConfig(
            "RPC address must not be empty".to_string(),
        ));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let normalized = with_scheme.trim_end_matches('/').to_string();

    Url::parse(&normalized).map_err(|e| {
        UpgradeHeightError::InvalidConfig(format!("invalid RPC address {address:?}: {e}"))
    })?;

    Ok(normalized)
}

/// HTTP client for a CometBFT node.
pub struct CometRpcBlockSource {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl CometRpcBlockSource {
    /// Create a block source with the default request timeout.
    pub fn new(rpc_address: &str) -> Result<Self, UpgradeHeightError> {
        Self::with_timeout(rpc_address, DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Create a block source with a custom request timeout.
    pub fn with_timeout(rpc_address: &str, timeout_secs: u64) -> Result<Self, UpgradeHeightError> {
        let base_url = normalize_rpc_address(rpc_address)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs)))
            .build()
            .map_err(|e| BlockSourceError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout_secs,
        })
    }

    /// Normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn block_url(&self, height: Option<i64>) -> String {
        match height {
            Some(h) => format!("{}/block?height={}", self.base_url, h),
            None => format!("{}/block", self.base_url),
        }
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> BlockSourceError {
        if e.is_timeout() {
            BlockSourceError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout_secs,
            }
        } else if e.is_connect() {
            BlockSourceError::Connection {
                url: url.to_string(),
                reason: e.to_string(),
            }
        } else {
            BlockSourceError::Http(e.to_string())
        }
    }

    async fn fetch(&self, url: String) -> Result<BlockHeader, BlockSourceError> {
        debug!("[upgrade-height] GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        // CometBFT answers pruned heights with a 500 and a JSON-RPC error
        // body, so the body is decoded whatever the status.
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        decode_block_response(&body).map_err(|e| match e {
            BlockSourceError::Decode(_) if !status.is_success() => {
                BlockSourceError::Http(format!("{url} returned {status}"))
            }
            other => other,
        })
    }
}

#[async_trait]
impl BlockSource for CometRpcBlockSource {
    async fn latest_header(&self) -> Result<BlockHeader, BlockSourceError> {
        self.fetch(self.block_url(None)).await
    }

    async fn header_at(&self, height: i64) -> Result<BlockHeader, BlockSourceError> {
        self.fetch(self.block_url(Some(height))).await
    }

    fn source_id(&self) -> &str {
        &self.base_url
    }
}

//! Response schema of the CometBFT `/block` endpoint (consumed subset).
//!
//! Each envelope level is decoded on its own so that a failure names its
//! dotted path: an absent or null level is [`BlockSourceError::MissingField`],
//! a level of the wrong JSON type is [`BlockSourceError::InvalidField`].

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{BlockHeader, BlockSourceError};

/// `/block` response envelope.
#[derive(Debug, Deserialize)]
pub struct BlockResponse {
    /// Present on success, decoded as [`BlockResult`].
    pub result: Option<Value>,
    /// Present when the node rejected the request (e.g. pruned height),
    /// decoded as [`RpcErrorBody`].
    pub error: Option<Value>,
}

/// `result` object.
#[derive(Debug, Deserialize)]
pub struct BlockResult {
    /// `result.block`, decoded as [`Block`].
    pub block: Option<Value>,
}

/// `result.block` object.
#[derive(Debug, Deserialize)]
pub struct Block {
    /// `result.block.header`, decoded as [`RawHeader`].
    pub header: Option<Value>,
}

/// `result.block.header`, fields still in wire form.
#[derive(Debug, Deserialize)]
pub struct RawHeader {
    /// Decimal string.
    pub height: Option<Value>,
    /// RFC3339 timestamp with nanoseconds.
    pub time: Option<Value>,
}

/// JSON-RPC error object.
#[derive(Debug, Deserialize)]
pub struct RpcErrorBody {
    /// Error code
    #[serde(default)]
    pub code: i64,
    /// Short message
    #[serde(default)]
    pub message: String,
    /// Detail text
    #[serde(default)]
    pub data: Option<String>,
}

/// Decode one envelope level found at `path`.
fn level<T: DeserializeOwned>(value: Option<Value>, path: &'static str) -> Result<T, BlockSourceError> {
    let value = value.ok_or(BlockSourceError::MissingField { path })?;
    serde_json::from_value(value).map_err(|e| BlockSourceError::InvalidField {
        path,
        reason: e.to_string(),
    })
}

impl BlockResponse {
    /// Walk the envelope down to the header.
    pub fn into_header(self) -> Result<BlockHeader, BlockSourceError> {
        if self.error.is_some() {
            let error: RpcErrorBody = level(self.error, "error")?;
            return Err(BlockSourceError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        let result: BlockResult = level(self.result, "result")?;
        let block: Block = level(result.block, "result.block")?;
        let header: RawHeader = level(block.header, "result.block.header")?;
        header.into_domain()
    }
}

impl RawHeader {
    /// Parse height and time.
    pub fn into_domain(self) -> Result<BlockHeader, BlockSourceError> {
        let height = self.height.ok_or(BlockSourceError::MissingField {
            path: "result.block.header.height",
        })?;
        let time = self.time.ok_or(BlockSourceError::MissingField {
            path: "result.block.header.time",
        })?;

        let parsed_height = match &height {
            Value::String(raw) => raw.parse::<i64>().map_err(|e| BlockSourceError::InvalidHeight {
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            other => {
                return Err(BlockSourceError::InvalidHeight {
                    value: other.to_string(),
                    reason: "expected a decimal string".to_string(),
                });
            }
        };

        let parsed_time = match &time {
            Value::String(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| BlockSourceError::InvalidTime {
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            other => {
                return Err(BlockSourceError::InvalidTime {
                    value: other.to_string(),
                    reason: "expected an RFC3339 string".to_string(),
                });
            }
        };

        BlockHeader::new(parsed_height, parsed_time)
    }
}

/// Decode a `/block` response body into a header.
pub fn decode_block_response(body: &[u8]) -> Result<BlockHeader, BlockSourceError> {
    let response: BlockResponse =
        serde_json::from_slice(body).map_err(|e| BlockSourceError::Decode(e.to_string()))?;
    response.into_header()
}

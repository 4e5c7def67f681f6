//! # Domain Errors
//!
//! Error types for upgrade height estimation.
//!
//! Every failure is fatal for the run: there is no retry or fallback. Each
//! error belongs to one [`ErrorCategory`] and may carry a remediation hint
//! for the operator.

use std::fmt;

use thiserror::Error;

/// Coarse classification used when reporting a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad operator input: date-time format, window size, RPC address.
    Configuration,
    /// RPC unreachable, timed out, or the HTTP exchange failed.
    Transport,
    /// The RPC answered with something other than a usable block.
    ResponseShape,
    /// The samples or inputs make the arithmetic meaningless.
    Arithmetic,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::Transport => "transport",
            Self::ResponseShape => "response",
            Self::Arithmetic => "arithmetic",
        };
        f.write_str(name)
    }
}

/// Errors raised by a [`crate::ports::BlockSource`].
#[derive(Debug, Error)]
pub enum BlockSourceError {
    /// Could not open a connection to the RPC.
    #[error("cannot connect to {url}: {reason}")]
    Connection {
        /// Requested URL
        url: String,
        /// Underlying transport message
        reason: String,
    },

    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL
        url: String,
        /// Configured timeout
        timeout_secs: u64,
    },

    /// Any other HTTP-level failure (building the request, reading the body).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}{}", rpc_detail(.data))]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message
        message: String,
        /// Optional detail (CometBFT puts the useful text here)
        data: Option<String>,
    },

    /// A level of the response envelope is absent or null.
    #[error("response is missing `{path}`")]
    MissingField {
        /// Dotted path of the first missing level
        path: &'static str,
    },

    /// A level of the response envelope has the wrong JSON type.
    #[error("response field `{path}` is malformed: {reason}")]
    InvalidField {
        /// Dotted path of the offending level
        path: &'static str,
        /// Decode failure
        reason: String,
    },

    /// `result.block.header.height` is not a non-negative decimal integer.
    #[error("invalid block height {value:?}: {reason}")]
    InvalidHeight {
        /// Raw value from the response
        value: String,
        /// Parse failure
        reason: String,
    },

    /// `result.block.header.time` is not an RFC3339 timestamp.
    #[error("invalid block time {value:?}: {reason}")]
    InvalidTime {
        /// Raw value from the response
        value: String,
        /// Parse failure
        reason: String,
    },

    /// The body is not JSON or does not match the envelope schema.
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

fn rpc_detail(data: &Option<String>) -> String {
    data.as_deref()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default()
}

impl BlockSourceError {
    /// Category of this failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Connection { .. } | Self::Timeout { .. } | Self::Http(_) => {
                ErrorCategory::Transport
            }
            Self::Rpc { .. }
            | Self::MissingField { .. }
            | Self::InvalidField { .. }
            | Self::InvalidHeight { .. }
            | Self::InvalidTime { .. }
            | Self::Decode(_) => ErrorCategory::ResponseShape,
        }
    }

    /// True when the node told us it has no block at the requested height,
    /// either through a JSON-RPC error or an envelope without `result`.
    pub fn is_unavailable_height(&self) -> bool {
        matches!(
            self,
            Self::Rpc { .. } | Self::MissingField { path: "result" }
        )
    }
}

/// Upgrade height estimation errors.
#[derive(Debug, Error)]
pub enum UpgradeHeightError {
    /// `upgrade_date_time` does not match `YYYY-MM-DD HH:MM:SS`.
    #[error("failed to parse upgrade date-time {input:?}: {reason}, must be of format 'YYYY-MM-DD HH:MM:SS' (UTC)")]
    InvalidDateTime {
        /// Operator input
        input: String,
        /// Parse failure
        reason: String,
    },

    /// The block window is not a positive integer.
    #[error("invalid block window {window}: must be a positive integer")]
    InvalidWindow {
        /// Requested window
        window: u64,
    },

    /// The block window reaches back to or past genesis.
    #[error("block window {window} must be smaller than the latest height {latest_height}")]
    WindowExceedsChain {
        /// Requested window
        window: u64,
        /// Height of the latest block
        latest_height: i64,
    },

    /// The node no longer retains the block at the start of the window.
    #[error("block {height} is not available from the RPC: {source}")]
    HistoryUnavailable {
        /// Height that was requested
        height: i64,
        /// What the node answered
        #[source]
        source: BlockSourceError,
    },

    /// Any other invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure fetching or decoding a block.
    #[error(transparent)]
    Source(#[from] BlockSourceError),

    /// The two samples are not separated in time or height.
    #[error("cannot compute block rate between heights {historical_height} and {recent_height}: {elapsed_secs}s elapsed")]
    DegenerateInterval {
        /// Latest sampled height
        recent_height: i64,
        /// Historical sampled height
        historical_height: i64,
        /// Whole seconds between the two block times
        elapsed_secs: i64,
    },

    /// The projection does not fit in a 64-bit signed height.
    #[error("projected height overflows: {0}")]
    ProjectionOverflow(String),
}

impl UpgradeHeightError {
    /// Category of this failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDateTime { .. }
            | Self::InvalidWindow { .. }
            | Self::WindowExceedsChain { .. }
            | Self::HistoryUnavailable { .. }
            | Self::InvalidConfig(_) => ErrorCategory::Configuration,
            Self::Source(e) => e.category(),
            Self::DegenerateInterval { .. } | Self::ProjectionOverflow(_) => {
                ErrorCategory::Arithmetic
            }
        }
    }

    /// Operator-facing hint, when one exists.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::InvalidDateTime { .. } => {
                Some("pass --upgrade-date-time as 'YYYY-MM-DD HH:MM:SS' in UTC")
            }
            Self::InvalidWindow { .. } => Some("pass a positive --block-window"),
            Self::WindowExceedsChain { .. } => Some("use a smaller --block-window"),
            Self::HistoryUnavailable { .. } => Some(
                "the RPC's retained block history is shorter than the requested window; \
                 use a different RPC with --rpc-addr or a smaller --block-window",
            ),
            Self::Source(e) => match e.category() {
                ErrorCategory::Transport => Some(
                    "if no RPC is running locally then provide one with --rpc-addr",
                ),
                _ => Some("use a different RPC address with --rpc-addr"),
            },
            Self::DegenerateInterval { .. } => Some("use a larger --block-window"),
            Self::InvalidConfig(_) | Self::ProjectionOverflow(_) => None,
        }
    }
}

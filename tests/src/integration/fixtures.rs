//! Canned CometBFT `/block` responses.

use chrono::{SecondsFormat, TimeZone, Utc};

/// Unix seconds to an RFC3339 timestamp with nanoseconds, as CometBFT emits.
pub fn comet_time(unix_seconds: i64) -> String {
    Utc.timestamp_opt(unix_seconds, 0)
        .single()
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Nanos, true))
        .unwrap_or_default()
}

/// Successful `/block` body for a block at `height` and `unix_seconds`.
pub fn block_response(height: i64, unix_seconds: i64) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": -1,
        "result": {
            "block_id": { "hash": "5F0C9A", "parts": { "total": 1, "hash": "11AA" } },
            "block": {
                "header": {
                    "version": { "block": "11" },
                    "chain_id": "test-chain",
                    "height": height.to_string(),
                    "time": comet_time(unix_seconds),
                    "proposer_address": "ABCDEF"
                },
                "data": { "txs": [] }
            }
        }
    })
    .to_string()
}

/// JSON-RPC error body of a node that pruned `height`.
pub fn pruned_response(height: i64, lowest: i64) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": -1,
        "error": {
            "code": -32603,
            "message": "Internal error",
            "data": format!("height {height} is not available, lowest height is {lowest}")
        }
    })
    .to_string()
}

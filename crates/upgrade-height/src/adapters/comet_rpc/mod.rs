//! CometBFT JSON-over-HTTP RPC adapter.

mod client;
pub mod schema;

pub use client::{normalize_rpc_address, CometRpcBlockSource};
pub use schema::decode_block_response;

//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound `BlockSource` port against real nodes.

pub mod comet_rpc;

pub use comet_rpc::{decode_block_response, normalize_rpc_address, CometRpcBlockSource};

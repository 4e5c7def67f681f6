//! # Upgrade Height Test Suite
//!
//! End-to-end flows running the estimation service against a mock CometBFT
//! RPC served over HTTP.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Service + HTTP block source + mock node
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qc-tests
//! cargo test -p qc-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;

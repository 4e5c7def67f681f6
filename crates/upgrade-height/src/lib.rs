//! # Upgrade Height
//!
//! Estimates the block height a CometBFT chain will reach at a target
//! wall-clock time, so operators can schedule coordinated upgrades.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Sample the recent block production rate of a running node and extrapolate
//! it linearly:
//! - Fetch the latest block header and the header `block_window` blocks back
//! - Average blocks per second between the two samples
//! - Project forward (or backward) to the target time
//!
//! ## Module Structure
//!
//! ```text
//! upgrade-height/
//! ├── domain/          # BlockHeader, RateSample, UpgradeTarget, errors
//! ├── algorithms/      # Rate estimation, height projection
//! ├── ports/           # API trait (inbound) + BlockSource (outbound)
//! ├── adapters/        # CometBFT JSON-over-HTTP block source
//! ├── application/     # UpgradeHeightService orchestrating one run
//! └── config.rs        # UpgradeHeightConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{normalize_rpc_address, CometRpcBlockSource};
pub use algorithms::{compute_rate, estimate_rate, project_height};
pub use application::{UpgradeEstimate, UpgradeHeightService};
pub use config::UpgradeHeightConfig;
pub use domain::{
    parse_upgrade_datetime, BlockHeader, BlockSourceError, ErrorCategory, ProjectionResult,
    RateSample, UpgradeHeightError, UpgradeTarget, DEFAULT_BLOCK_WINDOW,
    DEFAULT_MINUTES_UNTIL_UPGRADE, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RPC_ADDRESS,
    UPGRADE_DATETIME_FORMAT,
};
pub use ports::{BlockSource, MockBlockSource, UpgradeHeightApi};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}

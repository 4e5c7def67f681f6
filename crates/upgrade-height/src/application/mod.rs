//! # Application Layer
//!
//! Service orchestrating the estimation algorithms.

pub mod service;

pub use service::{UpgradeEstimate, UpgradeHeightService};

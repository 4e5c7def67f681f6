//! # Inbound Ports
//!
//! API trait defining what the estimator can do.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::UpgradeEstimate;
use crate::domain::{RateSample, UpgradeHeightError, UpgradeTarget};

/// Upgrade height API - inbound port.
#[async_trait]
pub trait UpgradeHeightApi: Send + Sync {
    /// Sample the current block rate over the configured window.
    async fn sample_rate(&self) -> Result<RateSample, UpgradeHeightError>;

    /// Run one full estimation.
    ///
    /// `now` is captured once by the caller; it resolves relative targets
    /// and is the current time the projection starts from.
    async fn estimate_upgrade_height(
        &self,
        target: &UpgradeTarget,
        now: DateTime<Utc>,
    ) -> Result<UpgradeEstimate, UpgradeHeightError>;
}

//! # Upgrade Height Service
//!
//! Application service running one estimation: resolve the target, sample
//! the rate, project the height.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::algorithms::{estimate_rate, project_height};
use crate::config::UpgradeHeightConfig;
use crate::domain::{RateSample, UpgradeHeightError, UpgradeTarget};
use crate::ports::{BlockSource, UpgradeHeightApi};

/// Report of a completed estimation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeEstimate {
    /// Block source the samples came from.
    pub source: String,
    /// Blocks between the two samples.
    pub block_window: u64,
    /// Latest sampled height.
    pub recent_height: i64,
    /// Blocks per second over the window.
    pub blocks_per_second: f64,
    /// Time the projection starts from.
    pub current_time: DateTime<Utc>,
    /// Resolved upgrade time.
    pub upgrade_time: DateTime<Utc>,
    /// Whole seconds until the upgrade time.
    pub seconds_until_upgrade: i64,
    /// Whole blocks until the upgrade time.
    pub blocks_until_upgrade: i64,
    /// Estimated upgrade height.
    pub upgrade_height: i64,
}

/// Upgrade Height Service - orchestrates one estimation run.
pub struct UpgradeHeightService<S: BlockSource> {
    /// Configuration.
    config: UpgradeHeightConfig,
    /// Where blocks come from.
    source: S,
}

impl<S: BlockSource> UpgradeHeightService<S> {
    /// Create a new service.
    pub fn new(config: UpgradeHeightConfig, source: S) -> Self {
        Self { config, source }
    }

    /// Configuration in use.
    pub fn config(&self) -> &UpgradeHeightConfig {
        &self.config
    }

    /// Underlying block source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

#[async_trait]
impl<S: BlockSource> UpgradeHeightApi for UpgradeHeightService<S> {
    async fn sample_rate(&self) -> Result<RateSample, UpgradeHeightError> {
        let window = self.config.block_window;
        let sample = estimate_rate(&self.source, window).await?;
        info!(
            "[upgrade-height] Block rate over past {} blocks: {:.6} blocks/s ({:.3} s/block)",
            window,
            sample.blocks_per_second,
            sample.seconds_per_block()
        );
        Ok(sample)
    }

    async fn estimate_upgrade_height(
        &self,
        target: &UpgradeTarget,
        now: DateTime<Utc>,
    ) -> Result<UpgradeEstimate, UpgradeHeightError> {
        // Resolved once; nothing below re-reads the clock
        let upgrade_time = target.resolve(now)?;
        let sample = self.sample_rate().await?;

        let projection = project_height(
            sample.recent_height,
            now,
            upgrade_time,
            sample.blocks_per_second,
        )?;

        info!("[upgrade-height] Seconds until upgrade: {}", projection.seconds_until_target);
        info!("[upgrade-height] Blocks until upgrade: {}", projection.blocks_until_target);
        if projection.seconds_until_target < 0 {
            info!("[upgrade-height] Upgrade time {} is in the past", upgrade_time);
        }
        info!("[upgrade-height] Estimated upgrade height: {}", projection.upgrade_height);

        Ok(UpgradeEstimate {
            source: self.source.source_id().to_string(),
            block_window: self.config.block_window,
            recent_height: sample.recent_height,
            blocks_per_second: sample.blocks_per_second,
            current_time: now,
            upgrade_time,
            seconds_until_upgrade: projection.seconds_until_target,
            blocks_until_upgrade: projection.blocks_until_target,
            upgrade_height: projection.upgrade_height,
        })
    }
}

//! # Upgrade Height Configuration
//!
//! Options recognized by an estimation run.

use serde::{Deserialize, Serialize};

use crate::adapters::normalize_rpc_address;
use crate::domain::{
    invariant_positive_window, parse_upgrade_datetime, UpgradeHeightError, UpgradeTarget,
    DEFAULT_BLOCK_WINDOW, DEFAULT_MINUTES_UNTIL_UPGRADE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RPC_ADDRESS,
};

/// Upgrade height configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeHeightConfig {
    /// CometBFT RPC address; `http://` is assumed when no scheme is given.
    pub rpc_address: String,

    /// Upgrade time as `YYYY-MM-DD HH:MM:SS` (UTC).
    pub upgrade_date_time: Option<String>,

    /// Minutes from now; ignored when `upgrade_date_time` is set.
    pub minutes_until_upgrade: u64,

    /// Blocks between the two rate samples.
    pub block_window: u64,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for UpgradeHeightConfig {
    fn default() -> Self {
        Self {
            rpc_address: DEFAULT_RPC_ADDRESS.to_string(),
            upgrade_date_time: None,
            minutes_until_upgrade: DEFAULT_MINUTES_UNTIL_UPGRADE,
            block_window: DEFAULT_BLOCK_WINDOW,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl UpgradeHeightConfig {
    /// Create a config for testing (small window, short timeout).
    pub fn for_testing() -> Self {
        Self {
            rpc_address: "http://127.0.0.1:26657".to_string(),
            upgrade_date_time: None,
            minutes_until_upgrade: 10,
            block_window: 100,
            request_timeout_secs: 1,
        }
    }

    /// Normalized RPC base URL.
    pub fn normalized_rpc_address(&self) -> Result<String, UpgradeHeightError> {
        normalize_rpc_address(&self.rpc_address)
    }

    /// Upgrade target described by this config.
    ///
    /// An explicit date-time wins over `minutes_until_upgrade`.
    pub fn upgrade_target(&self) -> Result<UpgradeTarget, UpgradeHeightError> {
        match self.upgrade_date_time.as_deref() {
            Some(input) if !input.trim().is_empty() => {
                parse_upgrade_datetime(input).map(UpgradeTarget::At)
            }
            _ => Ok(UpgradeTarget::In {
                minutes: self.minutes_until_upgrade,
            }),
        }
    }

    /// Check every option without touching the network.
    pub fn validate(&self) -> Result<(), UpgradeHeightError> {
        self.normalized_rpc_address()?;
        self.upgrade_target()?;
        invariant_positive_window(self.block_window)?;
        if self.request_timeout_secs == 0 {
            return Err(UpgradeHeightError::InvalidConfig(
                "request timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_default_config() {
        let config = UpgradeHeightConfig::default();
        assert_eq!(config.rpc_address, "localhost:26657");
        assert_eq!(config.minutes_until_upgrade, 120);
        assert_eq!(config.block_window, 10_000);
        assert_eq!(config.request_timeout_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_testing_config() {
        let config = UpgradeHeightConfig::for_testing();
        assert_eq!(config.block_window, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_target_is_minutes() {
        let config = UpgradeHeightConfig::default();
        assert_eq!(
            config.upgrade_target().unwrap(),
            UpgradeTarget::In { minutes: 120 }
        );
    }

    #[test]
    fn test_date_time_overrides_minutes() {
        let config = UpgradeHeightConfig {
            upgrade_date_time: Some("2025-06-30 14:00:00".to_string()),
            minutes_until_upgrade: 5,
            ..UpgradeHeightConfig::default()
        };
        assert_eq!(
            config.upgrade_target().unwrap(),
            UpgradeTarget::At(Utc.with_ymd_and_hms(2025, 6, 30, 14, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_malformed_date_time_rejected() {
        let config = UpgradeHeightConfig {
            upgrade_date_time: Some("30/06/2025 14:00".to_string()),
            ..UpgradeHeightConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(UpgradeHeightError::InvalidDateTime { .. })
        ));
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = UpgradeHeightConfig {
            block_window: 0,
            ..UpgradeHeightConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(UpgradeHeightError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = UpgradeHeightConfig {
            request_timeout_secs: 0,
            ..UpgradeHeightConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(UpgradeHeightError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_normalized_rpc_address() {
        let config = UpgradeHeightConfig::default();
        assert_eq!(
            config.normalized_rpc_address().unwrap(),
            "http://localhost:26657"
        );
    }
}

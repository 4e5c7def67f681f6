//! # Domain Invariants
//!
//! Defaults and the rules a block window must satisfy.

use super::errors::UpgradeHeightError;

/// Default CometBFT RPC address.
pub const DEFAULT_RPC_ADDRESS: &str = "localhost:26657";

/// Default offset from now when no upgrade date-time is given.
pub const DEFAULT_MINUTES_UNTIL_UPGRADE: u64 = 120;

/// Default number of blocks between the two rate samples.
pub const DEFAULT_BLOCK_WINDOW: u64 = 10_000;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Connect timeout used by the HTTP block source.
pub const CONNECT_TIMEOUT_SECS: u64 = 2;

/// `chrono` format of `--upgrade-date-time` (interpreted as UTC).
pub const UPGRADE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Invariant: the block window is a positive integer.
pub fn invariant_positive_window(window: u64) -> Result<(), UpgradeHeightError> {
    if window == 0 {
        return Err(UpgradeHeightError::InvalidWindow { window });
    }
    Ok(())
}

/// Invariant: the window start lies strictly above genesis.
///
/// `window` must be strictly less than the latest height.
pub fn invariant_window_below_tip(window: u64, latest_height: i64) -> Result<(), UpgradeHeightError> {
    let below = i64::try_from(window)
        .map(|w| w < latest_height)
        .unwrap_or(false);
    if !below {
        return Err(UpgradeHeightError::WindowExceedsChain {
            window,
            latest_height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_window() {
        assert!(invariant_positive_window(1).is_ok());
        assert!(matches!(
            invariant_positive_window(0),
            Err(UpgradeHeightError::InvalidWindow { window: 0 })
        ));
    }

    #[test]
    fn test_window_below_tip() {
        assert!(invariant_window_below_tip(999, 1000).is_ok());
        assert!(invariant_window_below_tip(1000, 1000).is_err());
        assert!(invariant_window_below_tip(1001, 1000).is_err());
    }

    #[test]
    fn test_window_beyond_i64_rejected() {
        assert!(invariant_window_below_tip(u64::MAX, i64::MAX).is_err());
    }
}

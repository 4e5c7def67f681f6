//! # Rate Estimator
//!
//! Average block production rate over a window ending at the latest block.

use tracing::debug;

use crate::domain::{
    invariant_positive_window, invariant_window_below_tip, BlockHeader, RateSample,
    UpgradeHeightError,
};
use crate::ports::BlockSource;

/// Blocks per second between two headers.
///
/// Uses whole Unix seconds of both block times. Fails instead of producing
/// infinity or NaN when the samples share a second or a height, or when the
/// historical sample is not older than the recent one.
pub fn compute_rate(
    recent: &BlockHeader,
    historical: &BlockHeader,
) -> Result<f64, UpgradeHeightError> {
    let blocks = recent.height() - historical.height();
    let elapsed_secs = recent.unix_seconds() - historical.unix_seconds();

    if blocks <= 0 || elapsed_secs <= 0 {
        return Err(UpgradeHeightError::DegenerateInterval {
            recent_height: recent.height(),
            historical_height: historical.height(),
            elapsed_secs,
        });
    }

    Ok(blocks as f64 / elapsed_secs as f64)
}

/// Sample the block rate over the last `window` blocks.
///
/// Performs exactly two reads against `source`: the latest header, then the
/// header `window` blocks below it. No retries.
///
/// # Errors
/// - `InvalidWindow` if `window` is zero (before any request)
/// - `WindowExceedsChain` if `window >= latest height`
/// - `HistoryUnavailable` if the source no longer has the historical block
/// - `DegenerateInterval` if the two samples share a timestamp
/// - `Source` for transport and response failures
pub async fn estimate_rate<S>(source: &S, window: u64) -> Result<RateSample, UpgradeHeightError>
where
    S: BlockSource + ?Sized,
{
    invariant_positive_window(window)?;

    let recent = source.latest_header().await?;
    debug!(
        "[upgrade-height] Latest block {} at {} from {}",
        recent.height(),
        recent.time(),
        source.source_id()
    );

    invariant_window_below_tip(window, recent.height())?;
    // window < recent height, so it fits in i64 and the difference is positive
    let historical_height = recent.height() - window as i64;

    let historical = source
        .header_at(historical_height)
        .await
        .map_err(|e| {
            if e.is_unavailable_height() {
                UpgradeHeightError::HistoryUnavailable {
                    height: historical_height,
                    source: e,
                }
            } else {
                UpgradeHeightError::Source(e)
            }
        })?;
    debug!(
        "[upgrade-height] Historical block {} at {}",
        historical.height(),
        historical.time()
    );

    let rate = compute_rate(&recent, &historical)?;
    Ok(RateSample::new(&recent, &historical, rate))
}

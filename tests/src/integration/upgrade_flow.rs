//! # Upgrade Height Flow
//!
//! Runs `UpgradeHeightService` over a real `CometRpcBlockSource` talking to a
//! mockito server that plays the CometBFT node.
//!
//! ## Flow Tested:
//!
//! 1. `GET /block` for the latest header
//! 2. `GET /block?height=H-window` for the historical header
//! 3. Rate, projection and the final report

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use std::net::TcpListener;

    use upgrade_height::{
        BlockSourceError, CometRpcBlockSource, ErrorCategory, UpgradeHeightApi,
        UpgradeHeightConfig, UpgradeHeightError, UpgradeHeightService, UpgradeTarget,
    };

    use crate::integration::fixtures::{block_response, pruned_response};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn localhost_binding_permitted() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    async fn mock_latest(server: &mut ServerGuard, body: String) -> Mock {
        server
            .mock("GET", "/block")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    async fn mock_at(server: &mut ServerGuard, height: i64, status: usize, body: String) -> Mock {
        server
            .mock("GET", "/block")
            .match_query(Matcher::UrlEncoded("height".into(), height.to_string()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    fn service_for(server: &ServerGuard, window: u64) -> UpgradeHeightService<CometRpcBlockSource> {
        let config = UpgradeHeightConfig {
            rpc_address: server.url(),
            block_window: window,
            ..UpgradeHeightConfig::for_testing()
        };
        let source =
            CometRpcBlockSource::with_timeout(&config.rpc_address, config.request_timeout_secs)
                .unwrap();
        UpgradeHeightService::new(config, source)
    }

    // =============================================================================
    // END-TO-END ESTIMATION
    // =============================================================================

    /// Latest 5000 @ 1000s, 4000 @ 900s, target 1100s -> 10 blocks/s -> 6000
    #[tokio::test]
    async fn test_estimates_upgrade_height_over_http() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let latest = mock_latest(&mut server, block_response(5000, 1000)).await;
        let historical = mock_at(&mut server, 4000, 200, block_response(4000, 900)).await;

        let service = service_for(&server, 1000);
        let estimate = service
            .estimate_upgrade_height(&UpgradeTarget::At(at(1100)), at(1000))
            .await
            .unwrap();

        latest.assert_async().await;
        historical.assert_async().await;

        assert_eq!(estimate.recent_height, 5000);
        assert!((estimate.blocks_per_second - 10.0).abs() < f64::EPSILON);
        assert_eq!(estimate.seconds_until_upgrade, 100);
        assert_eq!(estimate.blocks_until_upgrade, 1000);
        assert_eq!(estimate.upgrade_height, 6000);
        assert_eq!(estimate.source, server.url());
    }

    #[tokio::test]
    async fn test_report_serializes_to_json() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let _latest = mock_latest(&mut server, block_response(5000, 1000)).await;
        let _historical = mock_at(&mut server, 4000, 200, block_response(4000, 900)).await;

        let service = service_for(&server, 1000);
        let estimate = service
            .estimate_upgrade_height(&UpgradeTarget::In { minutes: 1 }, at(1000))
            .await
            .unwrap();

        let json = serde_json::to_value(&estimate).unwrap();
        assert_eq!(json["upgrade_height"], 5600);
        assert_eq!(json["block_window"], 1000);
    }

    // =============================================================================
    // FAILURE MODES
    // =============================================================================

    #[tokio::test]
    async fn test_pruned_node_reports_history_unavailable() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let _latest = mock_latest(&mut server, block_response(5000, 1000)).await;
        let _historical = mock_at(&mut server, 4000, 500, pruned_response(4000, 4500)).await;

        let service = service_for(&server, 1000);
        let err = service
            .estimate_upgrade_height(&UpgradeTarget::At(at(1100)), at(1000))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UpgradeHeightError::HistoryUnavailable { height: 4000, .. }
        ));
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.remediation().unwrap().contains("smaller --block-window"));
    }

    #[tokio::test]
    async fn test_window_larger_than_chain_makes_one_request() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let latest = mock_latest(&mut server, block_response(50, 1000)).await;

        let service = service_for(&server, 1000);
        let err = service.sample_rate().await.unwrap_err();

        latest.assert_async().await;
        assert!(matches!(
            err,
            UpgradeHeightError::WindowExceedsChain {
                window: 1000,
                latest_height: 50
            }
        ));
    }

    #[tokio::test]
    async fn test_truncated_header_is_response_shape_error() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let body = r#"{"jsonrpc":"2.0","id":-1,"result":{"block":{"header":{"time":"2024-01-01T00:00:00Z"}}}}"#;
        let _latest = mock_latest(&mut server, body.to_string()).await;

        let service = service_for(&server, 10);
        let err = service.sample_rate().await.unwrap_err();

        assert!(matches!(
            err,
            UpgradeHeightError::Source(BlockSourceError::MissingField {
                path: "result.block.header.height"
            })
        ));
        assert_eq!(err.category(), ErrorCategory::ResponseShape);
    }

    #[tokio::test]
    async fn test_identical_block_times_fail() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let _latest = mock_latest(&mut server, block_response(5000, 1000)).await;
        let _historical = mock_at(&mut server, 4000, 200, block_response(4000, 1000)).await;

        let service = service_for(&server, 1000);
        let err = service.sample_rate().await.unwrap_err();

        assert!(matches!(err, UpgradeHeightError::DegenerateInterval { .. }));
        assert_eq!(err.category(), ErrorCategory::Arithmetic);
    }
}

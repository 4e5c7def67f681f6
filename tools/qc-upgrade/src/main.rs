//! QC-Upgrade: upgrade height estimator.
//!
//! Samples the block rate of a CometBFT node and prints the height the chain
//! is expected to reach at the upgrade time.
//!
//! ## Usage
//!
//! ```bash
//! # Two hours from now against a local node (defaults)
//! qc-upgrade
//!
//! # Fixed UTC time against a remote node, 5000 block window
//! qc-upgrade --rpc-addr https://rpc.example.com \
//!     --upgrade-date-time "2025-06-30 14:00:00" --block-window 5000
//! ```
//!
//! Progress is logged to stderr; stdout carries only the estimated height
//! (or the JSON report with `--json`). Exit code is non-zero on any error.

mod telemetry;

use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};

use upgrade_height::{
    CometRpcBlockSource, UpgradeHeightApi, UpgradeHeightConfig, UpgradeHeightError,
    UpgradeHeightService, UpgradeTarget, DEFAULT_BLOCK_WINDOW, DEFAULT_MINUTES_UNTIL_UPGRADE,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RPC_ADDRESS,
};

use telemetry::LogConfig;

/// QC-Upgrade: estimate the block height at an upgrade time
#[derive(Parser, Debug)]
#[command(name = "qc-upgrade")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CometBFT RPC address
    #[arg(long, default_value = DEFAULT_RPC_ADDRESS)]
    rpc_addr: String,

    /// Upgrade time in UTC, format 'YYYY-MM-DD HH:MM:SS'
    #[arg(long)]
    upgrade_date_time: Option<String>,

    /// Minutes until the upgrade (ignored with --upgrade-date-time)
    #[arg(long, default_value_t = DEFAULT_MINUTES_UNTIL_UPGRADE)]
    minutes_until_upgrade: u64,

    /// Number of blocks over which to calculate the block rate
    #[arg(long, default_value_t = DEFAULT_BLOCK_WINDOW, value_parser = clap::value_parser!(u64).range(1..))]
    block_window: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Print the full estimate as JSON instead of the bare height
    #[arg(long)]
    json: bool,
}

impl Args {
    fn to_config(&self) -> UpgradeHeightConfig {
        UpgradeHeightConfig {
            rpc_address: self.rpc_addr.clone(),
            upgrade_date_time: self.upgrade_date_time.clone(),
            minutes_until_upgrade: self.minutes_until_upgrade,
            block_window: self.block_window,
            request_timeout_secs: self.timeout_secs,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = telemetry::init_logging(&LogConfig::from_env()) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.to_config();

    // Everything that can be checked offline is checked before the first request
    config.validate()?;
    let target = config.upgrade_target()?;
    let now = Utc::now();

    match &target {
        UpgradeTarget::In { minutes } => info!(
            "Upgrade date-time not provided, calculating block height for {} minutes from now",
            minutes
        ),
        UpgradeTarget::At(at) => info!("Calculating block height for upgrade at {}", at),
    }

    let source = CometRpcBlockSource::with_timeout(&config.rpc_address, config.request_timeout_secs)?;
    info!("Using CometBFT RPC at {}", source.base_url());

    let service = UpgradeHeightService::new(config, source);
    let estimate = service.estimate_upgrade_height(&target, now).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        println!("{}", estimate.upgrade_height);
    }

    Ok(())
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<UpgradeHeightError>() {
        Some(e) => {
            error!(category = %e.category(), "{}", e);
            if let Some(hint) = e.remediation() {
                error!("{}", hint);
            }
        }
        None => error!("{:#}", err),
    }
}

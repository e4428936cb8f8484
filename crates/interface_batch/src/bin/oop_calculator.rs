//! Out-of-pocket calculator binary
//!
//! Prices claim histories against a plan catalog and writes JSON lines.
//!
//! # Usage
//!
//! ```bash
//! # Cost map for every state and start month
//! CALC_CLAIMS_PATH=data/claims CALC_PLANS_PATH=data/plans.json cargo run --bin oop-calculator
//!
//! # Full breakdown for one person starting in July
//! CALC_MODE=breakdown CALC_BREAKDOWN_MONTH=7 CALC_PERSON_IDS=764308502 cargo run --bin oop-calculator
//! ```
//!
//! # Environment Variables
//!
//! * `CALC_MODE` - `batch`, `breakdown` or `proration` (default: batch)
//! * `CALC_CLAIMS_PATH` - Claim history file or directory
//! * `CALC_PLANS_PATH` - Plan catalog file or directory
//! * `CALC_OUTPUT_PATH` - JSON-lines output file
//! * `CALC_CLAIM_YEAR` - Claim year (default: current year)
//! * `CALC_MONTHS` - Comma-separated start months (default: all twelve)
//! * `CALC_BREAKDOWN_MONTH` - Start month for breakdown runs (default: 1)
//! * `CALC_STATES` - Comma-separated state FIPS filter
//! * `CALC_PERSON_IDS` - Comma-separated person filter
//! * `CALC_PLAN_IDS` - Comma-separated plan filter for breakdown and proration runs
//! * `CALC_FORCE_NETWORK` - `in_network`, `out_network` or `none` (default: in_network)
//! * `CALC_TRUNCATE_AT_YEAR_BOUNDARY` - Cut stays at January 1 (default: false)
//! * `CALC_OOP_ONLY` - Breakdowns keep only the OOP total (default: false)
//! * `CALC_LOG_LEVEL` - trace, debug, info, warn, error (default: info)

use anyhow::Context;
use interface_batch::{run_from_config, BatchConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = BatchConfig::from_env().context("loading CALC_ configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        mode = ?config.mode,
        claims = %config.claims_path.display(),
        plans = %config.plans_path.display(),
        claim_year = config.claim_year,
        "Starting OOP calculator"
    );

    let summary = run_from_config(&config).context("batch run failed")?;

    tracing::info!(
        people = summary.people,
        records = summary.records,
        failed_sessions = summary.failed_sessions,
        output = %config.output_path.display(),
        "OOP calculator finished"
    );
    Ok(())
}

/// Initializes the tracing subscriber
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

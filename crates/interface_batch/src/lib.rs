//! Batch Interface
//!
//! Runs the adjudication engine over claim histories and plan catalogs kept
//! in JSON files and writes the results as JSON lines.
//!
//! # Architecture
//!
//! - **Config**: `CALC_`-prefixed environment settings
//! - **Adapters**: JSON implementations of the claim-history, plan-catalog
//!   and cost-result ports
//! - **Runner**: cost-map, breakdown and proration runs per person
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_batch::{BatchConfig, BatchRunner, RunSettings};
//!
//! let config = BatchConfig::from_env()?;
//! let runner = BatchRunner::new(claims, plans, results, RunSettings::from_config(&config)?);
//! let summary = runner.run(&person_ids)?;
//! ```

pub mod config;
pub mod adapters;
pub mod runner;
pub mod error;

pub use config::{BatchConfig, RunMode};
pub use adapters::{JsonClaimHistory, JsonLinesResultWriter, JsonPlanCatalog};
pub use runner::{BatchRunner, PersonOutput, RunSettings, RunSummary};
pub use error::BatchError;

/// Opens the JSON adapters named in the configuration and runs every
/// configured person (or everyone in the claim source)
pub fn run_from_config(config: &BatchConfig) -> Result<RunSummary, BatchError> {
    let settings = RunSettings::from_config(config)?;
    let claims = JsonClaimHistory::open(&config.claims_path)?;
    let plans = JsonPlanCatalog::open(&config.plans_path)?;
    let results = JsonLinesResultWriter::create(&config.output_path)?;

    let person_ids = config.person_filter().unwrap_or_else(|| claims.person_ids());
    BatchRunner::new(claims, plans, results, settings).run(&person_ids)
}

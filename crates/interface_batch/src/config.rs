//! Batch configuration
//!
//! Settings are read from `CALC_`-prefixed environment variables, e.g.
//! `CALC_CLAIMS_PATH`, `CALC_MONTHS=01,04,07`. Anything unset falls back to
//! [`BatchConfig::default`].

use chrono::{Datelike, Utc};
use serde::Deserialize;
use std::path::PathBuf;

use core_kernel::{PersonId, PlanId};
use domain_benefits::NetworkType;
use domain_claims::CalculationOptions;
use crate::error::BatchError;

/// What a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Cost map: OOP per plan for every state and start month
    #[default]
    Batch,
    /// Full cost breakdown per plan for one start month
    Breakdown,
    /// Proration results per plan for every start month
    Proration,
}

/// Batch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub mode: RunMode,
    /// Claim history file, or a directory of one file per person
    pub claims_path: PathBuf,
    /// Plan catalog file, or a directory of one file per plan
    pub plans_path: PathBuf,
    /// JSON-lines output file
    pub output_path: PathBuf,
    pub claim_year: i32,
    /// Comma-separated start months
    pub months: String,
    /// Start month for breakdown runs
    pub breakdown_month: u32,
    /// Comma-separated state FIPS codes; unset runs every state
    pub states: Option<String>,
    /// Comma-separated person ids; unset runs everyone in the claims source
    pub person_ids: Option<String>,
    /// Comma-separated plan ids for breakdown and proration runs; unset prices every plan
    pub plan_ids: Option<String>,
    /// `in_network`, `out_network`, or `none` to keep each claim's own network
    pub force_network: String,
    pub truncate_at_year_boundary: bool,
    /// Breakdown runs keep only the final OOP
    pub oop_only: bool,
    pub log_level: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Batch,
            claims_path: PathBuf::from("data/claims.json"),
            plans_path: PathBuf::from("data/plans.json"),
            output_path: PathBuf::from("out/costs.jsonl"),
            claim_year: Utc::now().year(),
            months: "01,02,03,04,05,06,07,08,09,10,11,12".to_string(),
            breakdown_month: 1,
            states: None,
            person_ids: None,
            plan_ids: None,
            force_network: NetworkType::InNetwork.as_str().to_string(),
            truncate_at_year_boundary: false,
            oop_only: false,
            log_level: "info".to_string(),
        }
    }
}

impl BatchConfig {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, BatchError> {
        Self::from_environment(config::Environment::with_prefix("CALC"))
    }

    /// Loads configuration from an environment source
    pub fn from_environment(environment: config::Environment) -> Result<Self, BatchError> {
        let config = config::Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Configured start months, validated
    pub fn start_months(&self) -> Result<Vec<u32>, BatchError> {
        let months = split_list(&self.months)
            .into_iter()
            .map(|month| {
                month
                    .parse::<u32>()
                    .ok()
                    .filter(|m| (1..=12).contains(m))
                    .ok_or_else(|| BatchError::invalid_setting("months", format!("'{month}' is not a month")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if months.is_empty() {
            return Err(BatchError::invalid_setting("months", "no start months configured"));
        }
        Ok(months)
    }

    pub fn state_filter(&self) -> Option<Vec<String>> {
        self.states.as_deref().map(split_list).filter(|states| !states.is_empty())
    }

    pub fn person_filter(&self) -> Option<Vec<PersonId>> {
        self.person_ids
            .as_deref()
            .map(|ids| split_list(ids).into_iter().map(PersonId::new).collect::<Vec<_>>())
            .filter(|ids| !ids.is_empty())
    }

    pub fn plan_filter(&self) -> Option<Vec<PlanId>> {
        self.plan_ids
            .as_deref()
            .map(|ids| split_list(ids).into_iter().map(PlanId::new).collect::<Vec<_>>())
            .filter(|ids| !ids.is_empty())
    }

    /// Claim preparation options for every session in the run
    pub fn calculation_options(&self) -> Result<CalculationOptions, BatchError> {
        let force_network = match self.force_network.trim() {
            "" | "none" => None,
            "in_network" => Some(NetworkType::InNetwork),
            "out_network" => Some(NetworkType::OutNetwork),
            other => {
                return Err(BatchError::invalid_setting(
                    "force_network",
                    format!("unknown network '{other}'"),
                ))
            }
        };

        Ok(CalculationOptions {
            force_network,
            truncate_at_year_boundary: self.truncate_at_year_boundary,
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

//! Batch runner
//!
//! Drives adjudication sessions for a set of people across a plan catalog.
//! Every person x plan x start month is an independent session; a session
//! that fails is logged and left out of the output without stopping the run.

use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

use core_kernel::{PersonId, PlanId, ProrationWindow};
use domain_benefits::{Plan, PlanCatalogPort};
use domain_claims::{
    calculate_proration, calculate_with, claims_in_window, CalculationOptions, ClaimError,
    ClaimHistoryPort, CostBreakdown, CostMapItem, CostResultPort, PlanBreakdown, PlanCosts,
    ProrationResult, RawClaim,
};
use crate::config::{BatchConfig, RunMode};
use crate::error::BatchError;

/// Validated settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub mode: RunMode,
    pub claim_year: i32,
    pub start_months: Vec<u32>,
    pub breakdown_month: u32,
    pub states: Option<Vec<String>>,
    /// Plans for breakdown and proration runs; unset prices the whole catalog
    pub plan_ids: Option<Vec<PlanId>>,
    pub options: CalculationOptions,
    pub oop_only: bool,
}

impl RunSettings {
    pub fn from_config(config: &BatchConfig) -> Result<Self, BatchError> {
        if !(1..=12).contains(&config.breakdown_month) {
            return Err(BatchError::invalid_setting(
                "breakdown_month",
                format!("'{}' is not a month", config.breakdown_month),
            ));
        }

        Ok(Self {
            mode: config.mode,
            claim_year: config.claim_year,
            start_months: config.start_months()?,
            breakdown_month: config.breakdown_month,
            states: config.state_filter(),
            plan_ids: config.plan_filter(),
            options: config.calculation_options()?,
            oop_only: config.oop_only,
        })
    }
}

/// Records produced for one person
#[derive(Debug, Clone, PartialEq)]
pub struct PersonOutput<T> {
    pub records: Vec<T>,
    pub failed_sessions: usize,
}

impl<T> Default for PersonOutput<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            failed_sessions: 0,
        }
    }
}

/// Totals for a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub people: usize,
    pub skipped_people: usize,
    pub records: usize,
    pub failed_sessions: usize,
}

impl RunSummary {
    fn add<T>(&mut self, output: &PersonOutput<T>) {
        self.people += 1;
        self.records += output.records.len();
        self.failed_sessions += output.failed_sessions;
    }
}

/// Runs adjudication sessions against the configured ports
pub struct BatchRunner<C, P, W> {
    claims: C,
    plans: P,
    results: W,
    settings: RunSettings,
}

impl<C, P, W> BatchRunner<C, P, W>
where
    C: ClaimHistoryPort,
    P: PlanCatalogPort,
    W: CostResultPort,
{
    pub fn new(claims: C, plans: P, results: W, settings: RunSettings) -> Self {
        Self {
            claims,
            plans,
            results,
            settings,
        }
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Runs every person and writes their results
    ///
    /// A person with no claim history is skipped.
    pub fn run(&self, person_ids: &[PersonId]) -> Result<RunSummary, BatchError> {
        let mut summary = RunSummary::default();

        for person_id in person_ids {
            let person = match self.claims.person_claims(person_id) {
                Ok(person) => person,
                Err(e) if e.is_not_found() => {
                    warn!(%person_id, "No claim history, skipping");
                    summary.skipped_people += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let claims = &person.medical_claims;

            match self.settings.mode {
                RunMode::Batch => {
                    let output = self.cost_map(person_id, claims)?;
                    self.results.write_cost_map(&output.records)?;
                    summary.add(&output);
                }
                RunMode::Breakdown => {
                    let output = self.breakdowns(person_id, claims)?;
                    self.results.write_breakdowns(&output.records)?;
                    summary.add(&output);
                }
                RunMode::Proration => {
                    let output = self.proration(person_id, claims)?;
                    self.results.write_proration(&output.records)?;
                    summary.add(&output);
                }
            }
        }

        info!(
            mode = ?self.settings.mode,
            people = summary.people,
            skipped = summary.skipped_people,
            records = summary.records,
            failed_sessions = summary.failed_sessions,
            "Run complete"
        );
        Ok(summary)
    }

    /// OOP per plan for every state and start month
    #[instrument(skip(self, claims), fields(claims = claims.len()))]
    pub fn cost_map(
        &self,
        person_id: &PersonId,
        claims: &[RawClaim],
    ) -> Result<PersonOutput<CostMapItem>, BatchError> {
        let mut output = PersonOutput::default();

        for (state, plans) in self.plans_by_state()? {
            for &month in &self.settings.start_months {
                let window = window(self.settings.claim_year, month)?;
                let mut oops = BTreeMap::new();

                for plan in &plans {
                    match self.price(claims, plan, &window) {
                        Ok(costs) => {
                            oops.insert(plan.plan_id.clone(), costs.oop);
                        }
                        Err(e) => {
                            warn!(plan_id = %plan.plan_id, month, error = %e, "Session failed");
                            output.failed_sessions += 1;
                        }
                    }
                }

                output.records.push(CostMapItem {
                    month: window.month_label(),
                    person_id: person_id.clone(),
                    state: state.clone(),
                    oops,
                });
            }
        }

        Ok(output)
    }

    /// Full breakdown per plan for the breakdown month
    #[instrument(skip(self, claims), fields(claims = claims.len()))]
    pub fn breakdowns(
        &self,
        person_id: &PersonId,
        claims: &[RawClaim],
    ) -> Result<PersonOutput<PlanBreakdown>, BatchError> {
        let window = window(self.settings.claim_year, self.settings.breakdown_month)?;
        let mut output = PersonOutput::default();

        for plan in self.plans_to_price()? {
            match self.price(claims, &plan, &window) {
                Ok(costs) => {
                    let costs = if self.settings.oop_only {
                        PlanCosts::OopOnly { oop: costs.oop }
                    } else {
                        PlanCosts::Full(costs)
                    };
                    output.records.push(PlanBreakdown {
                        person_id: person_id.clone(),
                        plan_id: plan.plan_id.clone(),
                        costs,
                    });
                }
                Err(e) => {
                    warn!(plan_id = %plan.plan_id, error = %e, "Session failed");
                    output.failed_sessions += 1;
                }
            }
        }

        Ok(output)
    }

    /// Proration results per plan for every start month
    #[instrument(skip(self, claims), fields(claims = claims.len()))]
    pub fn proration(
        &self,
        person_id: &PersonId,
        claims: &[RawClaim],
    ) -> Result<PersonOutput<ProrationResult>, BatchError> {
        let mut output = PersonOutput::default();

        for plan in self.plans_to_price()? {
            match calculate_proration(
                person_id,
                claims,
                &plan,
                self.settings.claim_year,
                &self.settings.start_months,
            ) {
                Ok(results) => output.records.extend(results),
                Err(e) => {
                    warn!(plan_id = %plan.plan_id, error = %e, "Proration failed");
                    output.failed_sessions += 1;
                }
            }
        }

        Ok(output)
    }

    /// Plans priced by breakdown and proration runs
    ///
    /// Configured plan ids win, then the state filter. Otherwise every plan
    /// in the catalog is priced, with or without a state.
    pub fn plans_to_price(&self) -> Result<Vec<Plan>, BatchError> {
        if let Some(ids) = &self.settings.plan_ids {
            return Ok(self.plans.plans_by_id(ids)?);
        }
        match &self.settings.states {
            Some(_) => Ok(self.plans_by_state()?.into_values().flatten().collect()),
            None => Ok(self.plans.all_plans()?),
        }
    }

    /// Plans for cost-map runs, keyed by state
    ///
    /// Without a state filter every plan that names a state is run.
    pub fn plans_by_state(&self) -> Result<BTreeMap<String, Vec<Plan>>, BatchError> {
        let mut by_state: BTreeMap<String, Vec<Plan>> = BTreeMap::new();

        match &self.settings.states {
            Some(states) => {
                for state in states {
                    by_state.insert(state.clone(), self.plans.plans_for_state(state)?);
                }
            }
            None => {
                for plan in self.plans.all_plans()? {
                    match plan.state_fips.clone() {
                        Some(state) => by_state.entry(state).or_default().push(plan),
                        None => warn!(plan_id = %plan.plan_id, "Plan has no state, skipping"),
                    }
                }
            }
        }

        Ok(by_state)
    }

    fn price(
        &self,
        claims: &[RawClaim],
        plan: &Plan,
        window: &ProrationWindow,
    ) -> Result<CostBreakdown, ClaimError> {
        calculate_with(&claims_in_window(claims, window), plan, self.settings.options)
    }
}

fn window(claim_year: i32, month: u32) -> Result<ProrationWindow, BatchError> {
    ProrationWindow::new(claim_year, month).map_err(|e| BatchError::Claim(ClaimError::from(e)))
}

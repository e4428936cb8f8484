//! Proration runs
//!
//! A proration run prices the rest of a claim year as if coverage started
//! in a given month: only claims discharged inside the window are
//! adjudicated, with every claim treated as in-network.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{PersonId, PlanId, ProrationWindow};
use domain_benefits::Plan;
use crate::accumulator::CostBreakdown;
use crate::calculator::{calculate_with, CalculationOptions};
use crate::claim::RawClaim;
use crate::error::ClaimError;

/// Start months for a whole-year proration sweep
pub const ALL_MONTHS: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

/// Costs for one plan from one start month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProrationResult {
    pub plan_id: PlanId,
    pub person_id: PersonId,
    /// Two-digit start month
    pub start_month: String,
    pub in_network_oop: Decimal,
    pub allowed: Decimal,
    /// Out-of-network costs are not estimated; always zero
    pub out_network_oop: Decimal,
}

/// Claims whose recorded discharge date falls inside the window, in their original order
pub fn claims_in_window(claims: &[RawClaim], window: &ProrationWindow) -> Vec<RawClaim> {
    claims
        .iter()
        .filter(|claim| window.contains(claim.discharged))
        .cloned()
        .collect()
}

/// Adjudicates the claims that fall in one window, all in-network
pub fn calculate_for_window(
    claims: &[RawClaim],
    plan: &Plan,
    window: &ProrationWindow,
) -> Result<CostBreakdown, ClaimError> {
    let in_window = claims_in_window(claims, window);
    debug!(
        plan_id = %plan.plan_id,
        start_month = window.start_month(),
        claims = in_window.len(),
        "Pricing proration window"
    );
    calculate_with(&in_window, plan, CalculationOptions::in_network())
}

/// Prices one plan for each start month of a claim year
pub fn calculate_proration(
    person_id: &PersonId,
    claims: &[RawClaim],
    plan: &Plan,
    claim_year: i32,
    start_months: &[u32],
) -> Result<Vec<ProrationResult>, ClaimError> {
    start_months
        .iter()
        .map(|&month| -> Result<ProrationResult, ClaimError> {
            let window = ProrationWindow::new(claim_year, month)?;
            let costs = calculate_for_window(claims, plan, &window)?;

            Ok(ProrationResult {
                plan_id: plan.plan_id.clone(),
                person_id: person_id.clone(),
                start_month: window.month_label(),
                in_network_oop: costs.oop,
                allowed: costs.allowed,
                out_network_oop: Decimal::ZERO,
            })
        })
        .collect()
}

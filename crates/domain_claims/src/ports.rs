//! Ports for claim histories and computed results
//!
//! Adapters for specific storage systems implement these traits; the
//! engine itself never performs I/O.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{DomainPort, PersonId, PlanId, PortError};
use crate::accumulator::CostBreakdown;
use crate::claim::RawClaim;
use crate::proration::ProrationResult;

/// A person's claim history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonClaims {
    #[serde(alias = "uid")]
    pub person_id: PersonId,
    #[serde(default)]
    pub medical_claims: Vec<RawClaim>,
}

/// Out-of-pocket cost per plan for one person, state and start month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostMapItem {
    /// Two-digit start month
    pub month: String,
    pub person_id: PersonId,
    /// State FIPS code the plans were drawn from
    pub state: String,
    pub oops: BTreeMap<PlanId, Decimal>,
}

/// Costs reported for one plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanCosts {
    Full(CostBreakdown),
    /// Only the final OOP; every other total is left out of the record
    OopOnly { oop: Decimal },
}

impl PlanCosts {
    pub fn oop(&self) -> Decimal {
        match self {
            PlanCosts::Full(costs) => costs.oop,
            PlanCosts::OopOnly { oop } => *oop,
        }
    }

    pub fn full(&self) -> Option<&CostBreakdown> {
        match self {
            PlanCosts::Full(costs) => Some(costs),
            PlanCosts::OopOnly { .. } => None,
        }
    }
}

/// Costs for one person under one plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanBreakdown {
    pub person_id: PersonId,
    pub plan_id: PlanId,
    #[serde(flatten)]
    pub costs: PlanCosts,
}

/// Source of claim histories
pub trait ClaimHistoryPort: DomainPort {
    /// Claim history for a person, in admission order
    fn person_claims(&self, person_id: &PersonId) -> Result<PersonClaims, PortError>;
}

/// Sink for computed costs
pub trait CostResultPort: DomainPort {
    fn write_cost_map(&self, items: &[CostMapItem]) -> Result<(), PortError>;

    fn write_breakdowns(&self, breakdowns: &[PlanBreakdown]) -> Result<(), PortError>;

    fn write_proration(&self, results: &[ProrationResult]) -> Result<(), PortError>;
}

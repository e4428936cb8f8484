//! Plan catalog port
//!
//! Plan definitions arrive from outside the engine (object storage, a
//! key-value table, a bundled file). Implementations hand back fully parsed
//! plans; a plan that fails to parse is a `PortError::Validation`.

use core_kernel::{DomainPort, PlanId, PortError};
use crate::plan::Plan;

/// Source of benefit plan definitions
pub trait PlanCatalogPort: DomainPort {
    /// Every plan in the catalog
    fn all_plans(&self) -> Result<Vec<Plan>, PortError>;

    /// Plans with the given ids, in request order
    ///
    /// An unknown id is `PortError::NotFound`.
    fn plans_by_id(&self, ids: &[PlanId]) -> Result<Vec<Plan>, PortError> {
        let plans = self.all_plans()?;
        ids.iter()
            .map(|id| {
                plans
                    .iter()
                    .find(|plan| &plan.plan_id == id)
                    .cloned()
                    .ok_or_else(|| PortError::not_found("Plan", id))
            })
            .collect()
    }

    /// Plans offered in a state
    fn plans_for_state(&self, state_fips: &str) -> Result<Vec<Plan>, PortError> {
        Ok(self
            .all_plans()?
            .into_iter()
            .filter(|plan| plan.state_fips.as_deref() == Some(state_fips))
            .collect())
    }
}

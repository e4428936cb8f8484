//! Benefit Plan Domain
//!
//! This crate models what a benefit plan promises and answers cost-sharing
//! questions against it. It holds no per-claim state; the claims domain owns
//! adjudication and calls into this crate for:
//!
//! - **Category patching**: which benefit table a claim category is read from
//! - **Tiers**: ordered copay/coinsurance tiers for a category and network
//! - **Thresholds**: deductibles and OOP limits at composite, network, and
//!   category scope
//! - **Shared OOP**: the member's share of a cost under day-interval tiers
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_benefits::{CostSharingResolver, BenefitCategory, NetworkType, ThresholdKind};
//!
//! let mut resolver = CostSharingResolver::new(&plan);
//! let tiers = resolver.tiers(&BenefitCategory::from("12"), NetworkType::InNetwork);
//! let deductibles = resolver.threshold(&BenefitCategory::from("12"), ThresholdKind::Deductible)?;
//! ```

pub mod category;
pub mod plan;
pub mod resolver;
pub mod ports;
pub mod error;

pub use category::BenefitCategory;
pub use plan::{
    Plan, Benefits, CategoryBenefit, NetworkBenefit, CostSharingTier, CopaySpec,
    CoinsuranceSpec, PlanThreshold, ThresholdTable, BenefitPeriodKind, NetworkType,
    NetworkScope, ThresholdKind,
};
pub use resolver::{CostSharingResolver, ScopedThresholds, DayRange, shared_oop, max_covered_days};
pub use ports::PlanCatalogPort;
pub use error::BenefitError;

//! Claim Adjudication Domain
//!
//! This crate adjudicates a person's medical claims against one benefit plan
//! and produces out-of-pocket, allowed and uncovered totals broken down by
//! network and benefit category.
//!
//! # Session Flow
//!
//! ```text
//! RawClaim -> MedicalClaim -> Calendar (Part A days, SNF eligibility)
//!                          -> CostSharingResolver (tiers, thresholds)
//!                          -> CostAccumulator -> CostBreakdown
//! ```
//!
//! Claims must arrive in admission order. A session never shares state with
//! another, so sessions for different people, plans or proration windows
//! can run side by side.

pub mod claim;
pub mod benefit_period;
pub mod claim_store;
pub mod calendar;
pub mod accumulator;
pub mod calculator;
pub mod proration;
pub mod ports;
pub mod error;

pub use claim::{MedicalClaim, RawClaim};
pub use benefit_period::BenefitPeriod;
pub use claim_store::{ClaimClass, ClaimStore};
pub use calendar::Calendar;
pub use accumulator::{Breakdown, ClaimContribution, CostAccumulator, CostBreakdown};
pub use calculator::{calculate, calculate_with, CalculationOptions, Calculator};
pub use proration::{calculate_proration, claims_in_window, ProrationResult, ALL_MONTHS};
pub use ports::{ClaimHistoryPort, CostMapItem, CostResultPort, PersonClaims, PlanBreakdown, PlanCosts};
pub use error::ClaimError;

//! Core Kernel - Foundational types for the adjudication engine
//!
//! This crate provides the building blocks shared by the benefit and claim domains:
//! - Decimal limits where "no threshold" is explicit rather than infinite
//! - Service-date windows and proration periods
//! - Plan, person, and session identifiers
//! - The error type returned by external-collaborator ports

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Limit, non_negative};
pub use temporal::{ProrationWindow, TemporalError, QUALIFYING_STAY_WINDOW, BENEFIT_PERIOD_GAP};
pub use identifiers::{PlanId, PersonId, SessionId};
pub use ports::{PortError, DomainPort};
pub use error::CoreError;

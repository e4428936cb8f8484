//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! adjudication engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Canonical plans, dates and claims
//! - `builders`: Builder patterns for claims and plans
//! - `assertions`: Custom assertion helpers for cost breakdowns
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;

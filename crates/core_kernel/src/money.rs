//! Monetary limits with precise decimal arithmetic
//!
//! Amounts are plain `rust_decimal::Decimal` values. Plan thresholds
//! (deductibles, out-of-pocket limits) may be absent, which means "no limit";
//! `Limit` makes that explicit instead of relying on a floating-point infinity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A threshold that is either a finite amount or unlimited
///
/// `Limit` is totally ordered with `Unlimited` greater than every amount, so
/// the tightest of several limits is simply their minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    /// No threshold configured
    Unlimited,
    /// A finite threshold
    Amount(Decimal),
}

impl Limit {
    /// Creates a finite limit
    pub fn amount(amount: Decimal) -> Self {
        Limit::Amount(amount)
    }

    /// Creates a limit from an optional configured amount
    pub fn from_option(amount: Option<Decimal>) -> Self {
        amount.map_or(Limit::Unlimited, Limit::Amount)
    }

    /// Returns true if no threshold is configured
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Limit::Unlimited)
    }

    /// Returns the finite amount, if any
    pub fn as_amount(&self) -> Option<Decimal> {
        match self {
            Limit::Unlimited => None,
            Limit::Amount(amount) => Some(*amount),
        }
    }

    /// Room left under this limit once `applied` has been counted against it
    ///
    /// Never negative: an exhausted limit has zero room.
    pub fn remaining(&self, applied: Decimal) -> Limit {
        match self {
            Limit::Unlimited => Limit::Unlimited,
            Limit::Amount(amount) => Limit::Amount(non_negative(*amount - applied)),
        }
    }

    /// The tighter of two limits
    pub fn lesser(self, other: Limit) -> Limit {
        std::cmp::min(self, other)
    }

    /// Caps `amount` at this limit
    pub fn cap(&self, amount: Decimal) -> Decimal {
        match self {
            Limit::Unlimited => amount,
            Limit::Amount(limit) => amount.min(*limit),
        }
    }
}

impl Default for Limit {
    fn default() -> Self {
        Limit::Unlimited
    }
}

impl PartialOrd for Limit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Limit {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Limit::Unlimited, Limit::Unlimited) => Ordering::Equal,
            (Limit::Unlimited, Limit::Amount(_)) => Ordering::Greater,
            (Limit::Amount(_), Limit::Unlimited) => Ordering::Less,
            (Limit::Amount(a), Limit::Amount(b)) => a.cmp(b),
        }
    }
}

impl From<Decimal> for Limit {
    fn from(amount: Decimal) -> Self {
        Limit::Amount(amount)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Unlimited => write!(f, "unlimited"),
            Limit::Amount(amount) => write!(f, "{}", amount),
        }
    }
}

/// Clamps an amount at zero
pub fn non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

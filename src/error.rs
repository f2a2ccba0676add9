//! Error taxonomy for the index calculation.
//!
//! Every stage fails closed: it returns one of these variants instead of
//! substituting a default or an extrapolated value, and the orchestrator
//! propagates the error to the caller unchanged.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VixError {
    /// Fewer than two usable future expiries after skipping short-dated ones.
    #[error("insufficient expiries: {usable} usable future expiries (of {available} supplied), need 2")]
    InsufficientExpiries { available: usize, usable: usize },

    /// No strike carries a live call and a live put, so no forward can be derived.
    #[error("no viable strike for expiry {expiry}: no strike has two-sided live markets")]
    NoViableStrike { expiry: NaiveDate },

    /// Zero-bid truncation left too few strikes to form a variance sum.
    #[error("empty strike universe for expiry {expiry}: {strikes} usable strikes, need 2 ({reason})")]
    EmptyUniverse {
        expiry: NaiveDate,
        strikes: usize,
        reason: String,
    },

    /// The variance formula produced a negative (or non-finite) number.
    #[error("degenerate variance for {context}: raw value {value}")]
    DegenerateVariance { context: String, value: f64 },

    /// The selected expiry pair does not bracket the constant-maturity target.
    #[error(
        "invalid expiry window: near {near_years:.6}y / next {next_years:.6}y do not bracket target {target_years:.6}y"
    )]
    InvalidExpiryWindow {
        near_years: f64,
        next_years: f64,
        target_years: f64,
    },
}

/// Fieldless discriminant of [`VixError`], convenient for matching and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VixErrorKind {
    InsufficientExpiries,
    NoViableStrike,
    EmptyUniverse,
    DegenerateVariance,
    InvalidExpiryWindow,
}

pub type VixResult<T> = Result<T, VixError>;

impl VixError {
    pub fn kind(&self) -> VixErrorKind {
        match self {
            Self::InsufficientExpiries { .. } => VixErrorKind::InsufficientExpiries,
            Self::NoViableStrike { .. } => VixErrorKind::NoViableStrike,
            Self::EmptyUniverse { .. } => VixErrorKind::EmptyUniverse,
            Self::DegenerateVariance { .. } => VixErrorKind::DegenerateVariance,
            Self::InvalidExpiryWindow { .. } => VixErrorKind::InvalidExpiryWindow,
        }
    }

    pub(crate) fn empty_universe(expiry: NaiveDate, strikes: usize, reason: impl Into<String>) -> Self {
        Self::EmptyUniverse {
            expiry,
            strikes,
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(context: impl Into<String>, value: f64) -> Self {
        Self::DegenerateVariance {
            context: context.into(),
            value,
        }
    }
}

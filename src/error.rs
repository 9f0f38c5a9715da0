//! Error types for mining and rule derivation

use thiserror::Error;

use crate::types::Itemset;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MiningError {
    #[error("transaction dataset is empty")]
    EmptyDataset,

    #[error("invalid parameter {name} = {value}: expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("frequent itemset table is inconsistent at {itemset}")]
    InconsistentTable { itemset: Itemset },

    #[error("mining was cancelled")]
    Cancelled,
}

impl MiningError {
    pub(crate) fn invalid(name: &'static str, value: f64, expected: &'static str) -> Self {
        MiningError::InvalidParameter {
            name,
            value,
            expected,
        }
    }
}

pub type Result<T> = std::result::Result<T, MiningError>;

/// `min_support` must lie in (0, 1].
pub(crate) fn check_min_support(min_support: f64) -> Result<()> {
    if min_support > 0.0 && min_support <= 1.0 {
        Ok(())
    } else {
        Err(MiningError::invalid("min_support", min_support, "a value in (0, 1]"))
    }
}

/// `min_confidence` must lie in [0, 1].
pub(crate) fn check_min_confidence(min_confidence: f64) -> Result<()> {
    if (0.0..=1.0).contains(&min_confidence) {
        Ok(())
    } else {
        Err(MiningError::invalid(
            "min_confidence",
            min_confidence,
            "a value in [0, 1]",
        ))
    }
}

/// `min_lift` must be positive and finite.
pub(crate) fn check_min_lift(min_lift: f64) -> Result<()> {
    if min_lift > 0.0 && min_lift.is_finite() {
        Ok(())
    } else {
        Err(MiningError::invalid("min_lift", min_lift, "a finite value > 0"))
    }
}

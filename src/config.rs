//! Mining parameters.
//!
//! # Example JSON configuration:
//! ```json
//! {
//!   "min_support": 0.05,
//!   "min_confidence": 0.6,
//!   "algorithm": "apriori",
//!   "max_len": 3
//! }
//! ```
//!
//! Omitted fields fall back to [`MiningConfig::default`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{check_min_confidence, check_min_lift, check_min_support, Result},
    itemsets::apriori::check_max_len,
    types::ItemsetLength,
};

/// Which engine mines the frequent itemsets. Both produce the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Apriori,
    #[default]
    FpGrowth,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Apriori => write!(f, "apriori"),
            Algorithm::FpGrowth => write!(f, "fp-growth"),
        }
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "apriori" => Ok(Algorithm::Apriori),
            "fp-growth" | "fpgrowth" | "fp_growth" => Ok(Algorithm::FpGrowth),
            other => Err(format!(
                "Unknown algorithm: '{}'. Use: apriori, fp-growth",
                other
            )),
        }
    }
}

/// Thresholds and engine choice for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Minimum fraction of transactions an itemset must appear in, (0, 1].
    pub min_support: f64,

    /// Minimum rule confidence, [0, 1].
    pub min_confidence: f64,

    /// Minimum rule lift, > 0.
    pub min_lift: f64,

    pub algorithm: Algorithm,

    /// Largest itemset size to mine. `None` mines every size.
    pub max_len: Option<ItemsetLength>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: 0.02,
            min_confidence: 0.7,
            min_lift: 1.2,
            algorithm: Algorithm::FpGrowth,
            max_len: None,
        }
    }
}

impl MiningConfig {
    pub fn validate(&self) -> Result<()> {
        check_min_support(self.min_support)?;
        check_min_confidence(self.min_confidence)?;
        check_min_lift(self.min_lift)?;
        check_max_len(self.max_len)
    }
}

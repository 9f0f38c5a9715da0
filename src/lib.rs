//! Frequent itemset mining and association rules over market-basket data.
//!
//! A [`TransactionStore`] normalizes raw transactions once. Either engine,
//! Apriori or FP-Growth, then mines the same [`FrequentItemsets`] table, from
//! which [`rules::derive`] ranks association rules by lift.

pub mod cancel;
pub mod combi;
pub mod config;
pub mod error;
pub mod fp;
pub mod itemset;
pub mod itemsets;
pub mod rules;
pub mod store;
pub mod types;

#[cfg(feature = "python")]
mod wrapper;

#[cfg(test)]
mod tests;

pub use cancel::CancelToken;
pub use config::{Algorithm, MiningConfig};
pub use error::{MiningError, Result};
pub use itemset::{FrequentItemsets, ItemsetRecord, SupportRecord};
pub use rules::{Rule, RuleRecord};
pub use store::TransactionStore;
pub use types::{ItemId, Itemset};

use tracing::debug;

/// Mine frequent itemsets with the engine `config.algorithm` names.
pub fn mine<T>(
    store: &TransactionStore<T>,
    config: &MiningConfig,
    cancel: &CancelToken,
) -> Result<FrequentItemsets> {
    config.validate()?;
    debug!(algorithm = %config.algorithm, "mining");

    match config.algorithm {
        Algorithm::Apriori => {
            itemsets::apriori::mine_with(store, config.min_support, config.max_len, cancel)
        }
        Algorithm::FpGrowth => fp::growth::mine_with(store, config.min_support, config.max_len, cancel),
    }
}

/// Mine frequent itemsets, then derive the rules they support.
pub fn analyse<T>(
    store: &TransactionStore<T>,
    config: &MiningConfig,
    cancel: &CancelToken,
) -> Result<(FrequentItemsets, Vec<Rule>)> {
    let frequent_itemsets = mine(store, config, cancel)?;
    cancel.check()?;
    let rules = rules::derive(&frequent_itemsets, config.min_confidence, config.min_lift)?;
    Ok((frequent_itemsets, rules))
}

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::wrap_pyfunction;

#[cfg(feature = "python")]
#[pymodule]
fn basket(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(wrapper::frequent_itemsets, m)?)?;
    m.add_function(wrap_pyfunction!(wrapper::association_rules, m)?)?;
    Ok(())
}

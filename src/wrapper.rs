use pyo3::{
    exceptions::{PyRuntimeError, PyValueError},
    prelude::*,
};

use crate::{
    analyse, mine, Algorithm, CancelToken, ItemsetRecord, MiningConfig, MiningError, RuleRecord,
    TransactionStore,
};

type ItemsetRow = (Vec<String>, f64, usize);
type RuleRow = (Vec<String>, Vec<String>, f64, f64, f64);

impl From<MiningError> for PyErr {
    fn from(err: MiningError) -> Self {
        match err {
            MiningError::InvalidParameter { .. } | MiningError::EmptyDataset => {
                PyValueError::new_err(err.to_string())
            }
            _ => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

fn parse_algorithm(algorithm: &str) -> PyResult<Algorithm> {
    algorithm.parse().map_err(PyValueError::new_err)
}

/// Frequent itemsets as (items, support, length), most frequent first.
#[pyfunction]
#[pyo3(signature = (transactions, min_support, algorithm = "fp-growth", max_len = None))]
pub fn frequent_itemsets(
    py: Python<'_>,
    transactions: Vec<Vec<String>>,
    min_support: f64,
    algorithm: &str,
    max_len: Option<usize>,
) -> PyResult<Vec<ItemsetRow>> {
    let config = MiningConfig {
        min_support,
        algorithm: parse_algorithm(algorithm)?,
        max_len,
        ..MiningConfig::default()
    };

    let rows = py.allow_threads(|| -> Result<Vec<ItemsetRow>, MiningError> {
        let store = TransactionStore::new(transactions)?;
        let frequent_itemsets = mine(&store, &config, &CancelToken::new())?;
        Ok(frequent_itemsets
            .records(&store)
            .into_iter()
            .map(|ItemsetRecord { items, support, length }| (items, support, length))
            .collect())
    })?;
    Ok(rows)
}

/// Association rules as (antecedents, consequents, support, confidence,
/// lift), strongest lift first.
#[pyfunction]
#[pyo3(signature = (transactions, min_support, min_confidence, min_lift, algorithm = "fp-growth"))]
pub fn association_rules(
    py: Python<'_>,
    transactions: Vec<Vec<String>>,
    min_support: f64,
    min_confidence: f64,
    min_lift: f64,
    algorithm: &str,
) -> PyResult<Vec<RuleRow>> {
    let config = MiningConfig {
        min_support,
        min_confidence,
        min_lift,
        algorithm: parse_algorithm(algorithm)?,
        max_len: None,
    };

    let rows = py.allow_threads(|| -> Result<Vec<RuleRow>, MiningError> {
        let store = TransactionStore::new(transactions)?;
        let (_, rules) = analyse(&store, &config, &CancelToken::new())?;
        Ok(rules
            .iter()
            .map(|rule| {
                let record = RuleRecord::from_rule(rule, &store);
                (
                    record.antecedents,
                    record.consequents,
                    record.support,
                    record.confidence,
                    record.lift,
                )
            })
            .collect())
    })?;
    Ok(rows)
}

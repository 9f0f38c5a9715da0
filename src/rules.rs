pub mod rule;
pub mod search;

use rayon::prelude::*;
use tracing::info;

use crate::{
    error::{check_min_confidence, check_min_lift, Result},
    itemset::FrequentItemsets,
    types::Itemset,
};

pub use rule::{Rule, RuleRecord};

/// Generate rules based on frequent itemsets.
///
/// Rules come out by descending lift, then descending confidence, then
/// canonical antecedent and consequent order.
pub fn derive(table: &FrequentItemsets, min_confidence: f64, min_lift: f64) -> Result<Vec<Rule>> {
    check_min_confidence(min_confidence)?;
    check_min_lift(min_lift)?;

    let itemsets: Vec<Itemset> = table
        .iter()
        .filter(|record| record.itemset.len() > 1)
        .map(|record| record.itemset)
        .collect();

    let per_itemset: Vec<Vec<Rule>> = itemsets
        .par_iter()
        .map(|itemset| search::bfs(itemset, table, min_confidence, min_lift))
        .collect::<Result<_>>()?;

    let mut rules: Vec<Rule> = per_itemset.into_iter().flatten().collect();
    rules.sort_by(rule::ranking);

    info!(
        min_confidence,
        min_lift,
        itemsets = itemsets.len(),
        rules = rules.len(),
        "derived association rules"
    );
    Ok(rules)
}

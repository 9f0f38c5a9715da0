use std::{cmp::Ordering, fmt::Display};

use itertools::Itertools;
use serde::Serialize;

use crate::{store::TransactionStore, types::Itemset};

/// A directional association rule `antecedent => consequent` and its metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    /// Support of `antecedent ∪ consequent`.
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    pub leverage: f64,
    /// `f64::INFINITY` when confidence is 1.
    pub conviction: f64,
}

impl Rule {
    pub(crate) fn from_counts(
        antecedent: Itemset,
        consequent: Itemset,
        union_count: u32,
        antecedent_count: u32,
        consequent_count: u32,
        num_transactions: usize,
    ) -> Self {
        let n = num_transactions as f64;
        let support = union_count as f64 / n;
        let antecedent_support = antecedent_count as f64 / n;
        let consequent_support = consequent_count as f64 / n;

        let confidence = union_count as f64 / antecedent_count as f64;
        // single rounding: A => C and C => A get bit-identical lifts
        let lift = (union_count as f64 * n) / (antecedent_count as f64 * consequent_count as f64);
        let leverage = support - antecedent_support * consequent_support;
        let conviction = if confidence >= 1.0 {
            f64::INFINITY
        } else {
            (1.0 - consequent_support) / (1.0 - confidence)
        };

        Self {
            antecedent,
            consequent,
            support,
            confidence,
            lift,
            antecedent_support,
            consequent_support,
            leverage,
            conviction,
        }
    }

    /// Renders the rule as `a, b => c`.
    ///
    /// Panics if the rule holds ids not issued by `store`.
    pub fn describe<T: Display>(&self, store: &TransactionStore<T>) -> String {
        let antecedent = store.resolve(&self.antecedent).into_iter().join(", ");
        let consequent = store.resolve(&self.consequent).into_iter().join(", ");
        format!("{} => {}", antecedent, consequent)
    }
}

/// Descending lift, then descending confidence, then canonical itemset order.
pub(crate) fn ranking(a: &Rule, b: &Rule) -> Ordering {
    b.lift
        .total_cmp(&a.lift)
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| a.antecedent.cmp(&b.antecedent))
        .then_with(|| a.consequent.cmp(&b.consequent))
}

/// Presentation row for one rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleRecord<T> {
    pub antecedents: Vec<T>,
    pub consequents: Vec<T>,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub leverage: f64,
    pub conviction: f64,
}

impl<T: Clone> RuleRecord<T> {
    /// Panics if the rule holds ids not issued by `store`.
    pub fn from_rule(rule: &Rule, store: &TransactionStore<T>) -> Self {
        Self {
            antecedents: store.resolve(&rule.antecedent).into_iter().cloned().collect(),
            consequents: store.resolve(&rule.consequent).into_iter().cloned().collect(),
            support: rule.support,
            confidence: rule.confidence,
            lift: rule.lift,
            leverage: rule.leverage,
            conviction: rule.conviction,
        }
    }
}

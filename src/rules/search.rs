use std::collections::{HashSet, VecDeque};

use crate::{
    error::{MiningError, Result},
    itemset::FrequentItemsets,
    rules::rule::Rule,
    types::{ItemId, Itemset},
};

/// One way of splitting an itemset: `combi[..split]` is the antecedent,
/// `combi[split..]` the consequent. Both halves are kept sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Split {
    split: usize,
    combi: Vec<ItemId>,
}

impl Split {
    /// Splits with a single-item consequent.
    fn from_pattern(pattern: &[ItemId]) -> Vec<Split> {
        let mother = Split {
            split: pattern.len(),
            combi: pattern.to_vec(),
        };
        mother.create_children()
    }

    /// Moves each antecedent item, in turn, into the consequent.
    fn create_children(&self) -> Vec<Self> {
        if self.split <= 1 {
            return Vec::new();
        }

        let new_split = self.split - 1;
        let mut children = Vec::with_capacity(self.split);
        let mut tmp_combi = self.combi.to_owned();

        for _ in 0..self.split {
            let window = &mut tmp_combi[..self.split];
            window.rotate_left(1);

            let mut combi = tmp_combi.clone();
            combi[..new_split].sort_unstable();
            combi[new_split..].sort_unstable();

            children.push(Self {
                split: new_split,
                combi,
            });
        }

        children
    }

    fn antecedent(&self) -> &[ItemId] {
        &self.combi[..self.split]
    }

    fn consequent(&self) -> &[ItemId] {
        &self.combi[self.split..]
    }

    /// A child moved more items into the consequent than its parent did.
    fn is_child_of(&self, parent: &Self) -> bool {
        if self.combi.len() != parent.combi.len() {
            return false;
        }
        if self.consequent().len() <= parent.consequent().len() {
            return false;
        }

        let consequent = self.consequent();
        parent
            .consequent()
            .iter()
            .all(|item| consequent.binary_search(item).is_ok())
    }

    fn is_a_child_of_a_blacklisted_rule(&self, blacklist: &[Self]) -> bool {
        blacklist
            .iter()
            .any(|blacklisted_rule| self.is_child_of(blacklisted_rule))
    }
}

/// Given a frequent itemset, find every rule it yields above the thresholds.
///
/// Splits are visited by growing consequent. Shrinking the antecedent can
/// only lower confidence, so the children of a split below `min_confidence`
/// are never counted.
pub fn bfs(
    itemset: &Itemset,
    table: &FrequentItemsets,
    min_confidence: f64,
    min_lift: f64,
) -> Result<Vec<Rule>> {
    let union_count = lookup(table, itemset)?;

    let mut queue: VecDeque<Split> = Split::from_pattern(itemset).into();
    let mut queued: HashSet<Vec<ItemId>> = queue
        .iter()
        .map(|split| split.consequent().to_vec())
        .collect();
    let mut blacklist = vec![];
    let mut rules = vec![];

    while let Some(split) = queue.pop_front() {
        if split.is_a_child_of_a_blacklisted_rule(&blacklist) {
            continue;
        }

        let antecedent_count = lookup_subset(table, split.antecedent(), union_count)?;
        let confidence = union_count as f64 / antecedent_count as f64;

        if confidence < min_confidence {
            blacklist.push(split);
            continue;
        }

        for child in split.create_children() {
            if queued.insert(child.consequent().to_vec()) {
                queue.push_back(child);
            }
        }

        let consequent_count = lookup_subset(table, split.consequent(), union_count)?;
        let rule = Rule::from_counts(
            Itemset::from_sorted(split.antecedent().to_vec()),
            Itemset::from_sorted(split.consequent().to_vec()),
            union_count,
            antecedent_count,
            consequent_count,
            table.num_transactions(),
        );
        if rule.lift >= min_lift {
            rules.push(rule);
        }
    }

    Ok(rules)
}

fn lookup(table: &FrequentItemsets, items: &[ItemId]) -> Result<u32> {
    table
        .count(items)
        .ok_or_else(|| MiningError::InconsistentTable {
            itemset: Itemset::from_sorted(items.to_vec()),
        })
}

/// A subset is in at least every transaction its superset is in.
fn lookup_subset(table: &FrequentItemsets, items: &[ItemId], union_count: u32) -> Result<u32> {
    let count = lookup(table, items)?;
    if count < union_count {
        return Err(MiningError::InconsistentTable {
            itemset: Itemset::from_sorted(items.to_vec()),
        });
    }
    Ok(count)
}

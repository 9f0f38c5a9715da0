use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    cancel::CancelToken,
    combi::{join_step, prune_step},
    error::{check_min_support, MiningError, Result},
    itemset::FrequentItemsets,
    store::TransactionStore,
    types::{Itemset, ItemsetLength, TidSet},
};

/// Frequent itemsets of one size, in canonical order, with the transactions
/// containing each of them.
#[derive(Debug, Default)]
struct Level {
    itemsets: Vec<Itemset>,
    tidsets: Vec<TidSet>,
    counts: Vec<u32>,
}

impl Level {
    fn push(&mut self, itemset: Itemset, tids: TidSet, count: u32) {
        self.itemsets.push(itemset);
        self.tidsets.push(tids);
        self.counts.push(count);
    }

    fn len(&self) -> usize {
        self.itemsets.len()
    }

    fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }
}

/// Generate all frequent itemsets level by level.
pub fn mine<T>(store: &TransactionStore<T>, min_support: f64) -> Result<FrequentItemsets> {
    mine_with(store, min_support, None, &CancelToken::new())
}

/// Like [`mine`], optionally stopping after itemsets of `max_len` items.
pub fn mine_with<T>(
    store: &TransactionStore<T>,
    min_support: f64,
    max_len: Option<ItemsetLength>,
    cancel: &CancelToken,
) -> Result<FrequentItemsets> {
    check_min_support(min_support)?;
    check_max_len(max_len)?;
    let max_len = max_len.unwrap_or(ItemsetLength::MAX);
    let min_support_count = store.min_support_count(min_support);

    let mut frequent_itemsets = FrequentItemsets::new(store.num_transactions(), min_support);

    cancel.check()?;
    let mut level = generate_frequent_1_itemsets(store, min_support_count);
    let mut size = 1;
    debug!(size, frequent = level.len(), "counted itemsets");

    while !level.is_empty() {
        for (itemset, &count) in level.itemsets.iter().zip(level.counts.iter()) {
            frequent_itemsets.insert(itemset.clone(), count);
        }
        if size >= max_len {
            break;
        }

        cancel.check()?;
        size += 1;
        level = generate_frequent_k_itemsets(&level, min_support_count);
        debug!(size, frequent = level.len(), "counted itemsets");
    }

    info!(
        algorithm = "apriori",
        min_support,
        itemsets = frequent_itemsets.len(),
        "mined frequent itemsets"
    );
    Ok(frequent_itemsets)
}

pub(crate) fn check_max_len(max_len: Option<ItemsetLength>) -> Result<()> {
    match max_len {
        Some(0) => Err(MiningError::invalid("max_len", 0.0, "at least 1")),
        _ => Ok(()),
    }
}

fn generate_frequent_1_itemsets<T>(store: &TransactionStore<T>, min_support_count: u32) -> Level {
    let mut level = Level::default();
    for item in 0..store.num_items() {
        let count = store.item_count(item);
        if count >= min_support_count {
            level.push(Itemset::singleton(item), store.tidset(item).clone(), count);
        }
    }
    level
}

/// Join, prune, then count the survivors in parallel. A candidate's
/// transactions are the intersection of its two parents' transactions.
fn generate_frequent_k_itemsets(previous: &Level, min_support_count: u32) -> Level {
    let candidates = prune_step(join_step(&previous.itemsets), &previous.itemsets);
    debug!(candidates = candidates.len(), "counting candidates");

    let counted: Vec<(Itemset, TidSet, u32)> = candidates
        .into_par_iter()
        .filter_map(|candidate| {
            let mut tids = previous.tidsets[candidate.left].clone();
            tids &= previous.tidsets[candidate.right].as_bitslice();
            let count = tids.count_ones() as u32;
            (count >= min_support_count).then(|| (candidate.itemset, tids, count))
        })
        .collect();

    let mut level = Level::default();
    for (itemset, tids, count) in counted {
        level.push(itemset, tids, count);
    }
    level
}

use std::collections::HashMap;

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info};

use super::tree::{FPTree, PrefixPath};
use crate::{
    cancel::CancelToken,
    error::{check_min_support, Result},
    itemset::FrequentItemsets,
    itemsets::apriori::check_max_len,
    store::TransactionStore,
    types::{ItemCounts, ItemId, Itemset, ItemsetLength, Transaction},
};

type Pattern = (Itemset, u32);

/// Parameters shared by every recursion frame of one run.
struct Growth<'a> {
    /// Position of each item in the global descending-frequency order,
    /// `None` for infrequent items.
    rank: &'a [Option<usize>],
    min_support_count: u32,
    max_len: ItemsetLength,
    cancel: &'a CancelToken,
}

/// Mine all frequent itemsets through an FP-tree, without generating candidates.
pub fn mine<T>(store: &TransactionStore<T>, min_support: f64) -> Result<FrequentItemsets> {
    mine_with(store, min_support, None, &CancelToken::new())
}

/// Like [`mine`], optionally limiting itemsets to `max_len` items.
pub fn mine_with<T>(
    store: &TransactionStore<T>,
    min_support: f64,
    max_len: Option<ItemsetLength>,
    cancel: &CancelToken,
) -> Result<FrequentItemsets> {
    check_min_support(min_support)?;
    check_max_len(max_len)?;
    let min_support_count = store.min_support_count(min_support);

    let frequent_items: Vec<ItemId> = store
        .items_by_frequency()
        .into_iter()
        .take_while(|&item| store.item_count(item) >= min_support_count)
        .collect();
    let mut rank = vec![None; store.num_items()];
    for (position, &item) in frequent_items.iter().enumerate() {
        rank[item] = Some(position);
    }

    cancel.check()?;
    let fp_tree = build_fp_tree(store.transactions(), &rank);
    debug!(
        items = frequent_items.len(),
        nodes = fp_tree.len(),
        "built FP-tree"
    );

    let growth = Growth {
        rank: &rank,
        min_support_count,
        max_len: max_len.unwrap_or(ItemsetLength::MAX),
        cancel,
    };
    let patterns = fp_growth_recursive(&fp_tree, &frequent_items, &[], &growth)?;

    let mut frequent_itemsets = FrequentItemsets::new(store.num_transactions(), min_support);
    for (itemset, count) in patterns {
        frequent_itemsets.insert(itemset, count);
    }

    info!(
        algorithm = "fp-growth",
        min_support,
        itemsets = frequent_itemsets.len(),
        "mined frequent itemsets"
    );
    Ok(frequent_itemsets)
}

/// Inserts every transaction, restricted to frequent items and reordered by rank.
fn build_fp_tree(transactions: &[Transaction], rank: &[Option<usize>]) -> FPTree {
    let mut fp_tree = FPTree::new();
    let mut path: Vec<ItemId> = Vec::new();

    for transaction in transactions {
        path.clear();
        path.extend(transaction.iter().copied().filter(|&item| rank[item].is_some()));
        path.sort_unstable_by_key(|&item| rank[item]);

        if !path.is_empty() {
            fp_tree.insert(&path, 1);
        }
    }

    fp_tree
}

/// Mines `fp_tree`, whose frequent items are `items` in rank order, and
/// returns every pattern extending `suffix`.
fn fp_growth_recursive(
    fp_tree: &FPTree,
    items: &[ItemId],
    suffix: &[ItemId],
    growth: &Growth,
) -> Result<Vec<Pattern>> {
    growth.cancel.check()?;

    if let Some(path) = fp_tree.single_path() {
        return Ok(single_path_patterns(&path, suffix, growth));
    }

    // least frequent first keeps conditional trees small
    let results: Vec<Vec<Pattern>> = items
        .par_iter()
        .rev()
        .map(|&item| -> Result<Vec<Pattern>> {
            let support = fp_tree.item_support(item);
            if support < growth.min_support_count {
                return Ok(Vec::new());
            }

            let mut new_suffix = suffix.to_vec();
            new_suffix.push(item);
            let mut patterns = vec![(pattern(&new_suffix, &[]), support)];

            if new_suffix.len() < growth.max_len {
                let prefix_paths = fp_tree.prefix_paths(item);
                let (cond_tree, cond_items) = build_conditional_fp_tree(&prefix_paths, growth);
                if !cond_items.is_empty() {
                    patterns.extend(fp_growth_recursive(
                        &cond_tree,
                        &cond_items,
                        &new_suffix,
                        growth,
                    )?);
                }
            }

            Ok(patterns)
        })
        .collect::<Result<_>>()?;

    Ok(results.into_iter().flatten().collect())
}

/// Every combination of the path's nodes joined with `suffix`. Counts do not
/// increase along a path, so a combination's support is its smallest count.
fn single_path_patterns(path: &[(ItemId, u32)], suffix: &[ItemId], growth: &Growth) -> Vec<Pattern> {
    let path: Vec<(ItemId, u32)> = path
        .iter()
        .copied()
        .filter(|&(_, count)| count >= growth.min_support_count)
        .collect();
    let room = growth.max_len.saturating_sub(suffix.len());

    (1..=path.len().min(room))
        .flat_map(|size| path.iter().combinations(size))
        .filter_map(|combination| {
            let support = combination.iter().map(|&&(_, count)| count).min()?;
            let items: Vec<ItemId> = combination.iter().map(|&&(item, _)| item).collect();
            Some((pattern(suffix, &items), support))
        })
        .collect()
}

/// Builds the conditional tree of one item from its pattern base, dropping
/// items that are no longer frequent. Returns the remaining items in rank order.
fn build_conditional_fp_tree(prefix_paths: &[PrefixPath], growth: &Growth) -> (FPTree, Vec<ItemId>) {
    let mut item_counts: ItemCounts = HashMap::new();
    for (path, count) in prefix_paths {
        for &item in path {
            *item_counts.entry(item).or_insert(0) += count;
        }
    }
    item_counts.retain(|_, &mut count| count >= growth.min_support_count);

    let mut cond_items: Vec<ItemId> = item_counts.keys().copied().collect();
    cond_items.sort_unstable_by_key(|&item| growth.rank[item]);

    let mut cond_tree = FPTree::new();
    let mut filtered: Vec<ItemId> = Vec::new();
    for (path, count) in prefix_paths {
        // paths are already in rank order
        filtered.clear();
        filtered.extend(path.iter().copied().filter(|item| item_counts.contains_key(item)));
        if !filtered.is_empty() {
            cond_tree.insert(&filtered, *count);
        }
    }

    (cond_tree, cond_items)
}

fn pattern(suffix: &[ItemId], items: &[ItemId]) -> Itemset {
    let mut pattern: Vec<ItemId> = suffix.iter().chain(items).copied().collect();
    pattern.sort_unstable();
    Itemset::from_sorted(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::MiningError, itemsets::apriori};
    use maplit::hashmap;
    use std::collections::HashMap;

    fn as_map(frequent_itemsets: &FrequentItemsets) -> HashMap<Vec<ItemId>, u32> {
        frequent_itemsets
            .iter()
            .map(|record| (record.itemset.into_vec(), record.count))
            .collect()
    }

    fn groceries() -> TransactionStore<&'static str> {
        TransactionStore::new(vec![
            vec!["bread", "milk"],
            vec!["bread", "diapers", "beer", "eggs"],
            vec!["milk", "diapers", "beer", "cola"],
            vec!["bread", "milk", "diapers", "beer"],
            vec!["bread", "milk", "diapers", "cola"],
        ])
        .unwrap()
    }

    #[test]
    fn test_fp_growth_simple() {
        // items 0, 1 and 2 each appear in 3 of 4 transactions
        let store =
            TransactionStore::new(vec![vec![0, 1], vec![0, 1, 2], vec![0, 2], vec![1, 2]]).unwrap();
        let frequent_itemsets = mine(&store, 0.5).unwrap();

        assert_eq!(
            as_map(&frequent_itemsets),
            hashmap! {
                vec![0] => 3,
                vec![1] => 3,
                vec![2] => 3,
                vec![0, 1] => 2,
                vec![0, 2] => 2,
                vec![1, 2] => 2,
            }
        );
    }

    #[test]
    fn milk_bread_butter() {
        let store = TransactionStore::new(vec![
            vec!["milk", "bread"],
            vec!["milk", "bread", "butter"],
            vec!["bread", "butter"],
            vec!["milk"],
        ])
        .unwrap();
        let frequent_itemsets = mine(&store, 0.5).unwrap();

        let milk = store.id_of(&"milk").unwrap();
        let bread = store.id_of(&"bread").unwrap();
        let butter = store.id_of(&"butter").unwrap();
        assert_eq!(frequent_itemsets.support(&[milk]), Some(0.75));
        assert_eq!(frequent_itemsets.support(&[butter]), Some(0.5));
        assert_eq!(frequent_itemsets.support(&[bread, milk]), Some(0.5));
        assert_eq!(frequent_itemsets.support(&[bread, butter]), Some(0.5));
        assert_eq!(frequent_itemsets.len(), 5);
    }

    #[test]
    fn single_path_tree() {
        let store = TransactionStore::new(vec![vec!["a", "b", "c"], vec!["a", "b"], vec!["a"]]).unwrap();
        let frequent_itemsets = mine(&store, 0.3).unwrap();

        assert_eq!(
            as_map(&frequent_itemsets),
            hashmap! {
                vec![0] => 3,
                vec![1] => 2,
                vec![2] => 1,
                vec![0, 1] => 2,
                vec![0, 2] => 1,
                vec![1, 2] => 1,
                vec![0, 1, 2] => 1,
            }
        );
    }

    #[test]
    fn matches_apriori() {
        let store = groceries();
        for min_support in [0.2, 0.4, 0.6, 0.8, 1.0] {
            assert_eq!(
                mine(&store, min_support).unwrap(),
                apriori::mine(&store, min_support).unwrap(),
                "min_support = {}",
                min_support
            );
        }
    }

    #[test]
    fn max_len_limits_both_branches() {
        let store = groceries();
        for max_len in 1..=4 {
            let cancel = CancelToken::new();
            let fp = mine_with(&store, 0.2, Some(max_len), &cancel).unwrap();
            let ap = apriori::mine_with(&store, 0.2, Some(max_len), &cancel).unwrap();
            assert_eq!(fp, ap);
            assert!(fp.max_len() <= max_len);
        }
    }

    #[test]
    fn rejects_invalid_min_support() {
        let store = groceries();
        assert!(matches!(
            mine(&store, 1.5),
            Err(MiningError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn cancelled_run_returns_no_table() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(
            mine_with(&groceries(), 0.2, None, &cancel),
            Err(MiningError::Cancelled)
        );
    }

    #[test]
    fn cancelled_between_frames() {
        let store = groceries();
        let rank: Vec<Option<usize>> = (0..store.num_items()).map(Some).collect();
        let items: Vec<ItemId> = (0..store.num_items()).collect();
        let fp_tree = build_fp_tree(store.transactions(), &rank);
        assert!(fp_tree.single_path().is_none());

        let cancel = CancelToken::new();
        let growth = Growth {
            rank: &rank,
            min_support_count: 1,
            max_len: ItemsetLength::MAX,
            cancel: &cancel,
        };
        assert!(fp_growth_recursive(&fp_tree, &items, &[], &growth).is_ok());

        let worker = cancel.clone();
        rayon::scope(|scope| scope.spawn(move |_| worker.cancel()));
        assert_eq!(
            fp_growth_recursive(&fp_tree, &items, &[], &growth),
            Err(MiningError::Cancelled)
        );
    }

    #[test]
    fn concurrent_cancel_never_yields_a_partial_table() {
        let store = TransactionStore::new((0..400_usize).map(|tid| {
            (0..16_usize)
                .filter(|item| (tid * 7 + item * item * 3) % 5 < 3)
                .collect::<Vec<_>>()
        }))
        .unwrap();
        let full = mine(&store, 0.05).unwrap();

        for delay in [0, 50, 200, 1_000, 5_000] {
            let cancel = CancelToken::new();
            let canceller = cancel.clone();
            let handle = std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_micros(delay));
                canceller.cancel();
            });
            let result = mine_with(&store, 0.05, None, &cancel);
            handle.join().unwrap();

            match result {
                Ok(table) => assert_eq!(table, full),
                Err(err) => assert_eq!(err, MiningError::Cancelled),
            }
        }
    }

    #[test]
    fn conditional_tree_drops_infrequent_items() {
        let rank = vec![Some(0), Some(1), Some(2)];
        let cancel = CancelToken::new();
        let growth = Growth {
            rank: &rank,
            min_support_count: 2,
            max_len: ItemsetLength::MAX,
            cancel: &cancel,
        };
        let paths = vec![(vec![0, 1], 1), (vec![0, 2], 1), (vec![0], 1)];
        let (tree, items) = build_conditional_fp_tree(&paths, &growth);

        assert_eq!(items, vec![0]);
        assert_eq!(tree.single_path(), Some(vec![(0, 3)]));
    }
}

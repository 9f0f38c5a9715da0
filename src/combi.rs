use std::collections::HashSet;

use itertools::Itertools;

use crate::types::{ItemId, Itemset};

/// Candidate of size k, built from two frequent (k-1)-itemsets sharing a
/// (k-2)-prefix. `left` and `right` index the parents in the previous level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub itemset: Itemset,
    pub left: usize,
    pub right: usize,
}

/// https://github.com/tommyod/Efficient-Apriori/blob/master/efficient_apriori/itemsets.py
///
/// `itemsets` must be sorted and all of the same size. Candidates come out
/// sorted, and each one is produced exactly once.
pub fn join_step(itemsets: &[Itemset]) -> Vec<Candidate> {
    debug_assert!(itemsets.windows(2).all(|w| w[0] < w[1]));

    let mut candidates = Vec::new();

    let mut i = 0;
    while i < itemsets.len() {
        let prefix = &itemsets[i][..itemsets[i].len() - 1];

        // itemsets sharing `prefix` are adjacent once sorted
        let mut skip = 1;
        while i + skip < itemsets.len() && &itemsets[i + skip][..prefix.len()] == prefix {
            skip += 1;
        }

        for (left, right) in (i..i + skip).tuple_combinations() {
            let mut items: Vec<ItemId> = Vec::with_capacity(prefix.len() + 2);
            items.extend_from_slice(&itemsets[left]);
            items.push(itemsets[right][prefix.len()]);
            candidates.push(Candidate {
                itemset: Itemset::from_sorted(items),
                left,
                right,
            });
        }

        i += skip;
    }

    candidates
}

/// Drops every candidate with a (k-1)-subset missing from the previous level.
pub fn prune_step(candidates: Vec<Candidate>, previous: &[Itemset]) -> Vec<Candidate> {
    let frequent: HashSet<&[ItemId]> = previous.iter().map(|itemset| itemset.as_slice()).collect();
    let mut subset: Vec<ItemId> = Vec::new();

    candidates
        .into_iter()
        .filter(|candidate| {
            let items = candidate.itemset.as_slice();
            // dropping either of the last two items yields a parent, already frequent
            (0..items.len().saturating_sub(2)).all(|skip| {
                subset.clear();
                subset.extend_from_slice(&items[..skip]);
                subset.extend_from_slice(&items[skip + 1..]);
                frequent.contains(subset.as_slice())
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn itemsets(raw: Vec<Vec<ItemId>>) -> Vec<Itemset> {
        let mut itemsets: Vec<Itemset> = raw.into_iter().filter_map(Itemset::new).collect();
        itemsets.sort();
        itemsets
    }

    fn items(candidates: &[Candidate]) -> Vec<Vec<ItemId>> {
        candidates
            .iter()
            .map(|candidate| candidate.itemset.to_vec())
            .collect()
    }

    #[test]
    fn test_join_step() {
        let level = itemsets(vec![
            vec![1, 2, 3],
            vec![1, 2, 4],
            vec![1, 3, 4],
            vec![1, 3, 5],
            vec![2, 3, 4],
        ]);
        let candidates = join_step(&level);
        assert_eq!(items(&candidates), vec![vec![1, 2, 3, 4], vec![1, 3, 4, 5]]);
        assert_eq!((candidates[0].left, candidates[0].right), (0, 1));
        assert_eq!((candidates[1].left, candidates[1].right), (2, 3));
    }

    #[test]
    fn test_join_step_singletons() {
        let level = itemsets(vec![vec![10], vec![13], vec![14]]);
        let candidates = join_step(&level);
        assert_eq!(
            items(&candidates),
            vec![vec![10, 13], vec![10, 14], vec![13, 14]]
        );
    }

    #[test]
    fn test_join_step_3() {
        let level = itemsets(vec![vec![1, 2], vec![2, 3], vec![1, 3], vec![1, 4], vec![3, 4]]);
        let candidates = join_step(&level);
        assert_eq!(
            items(&candidates),
            vec![vec![1, 2, 3], vec![1, 2, 4], vec![1, 3, 4]]
        );
    }

    #[test]
    fn test_join_step_no_shared_prefix() {
        let level = itemsets(vec![vec![10, 11], vec![13, 14]]);
        assert!(join_step(&level).is_empty());
        assert!(join_step(&[]).is_empty());
    }

    #[test]
    fn test_prune_step() {
        let level = itemsets(vec![vec![1, 2], vec![2, 3], vec![1, 3], vec![1, 4], vec![3, 4]]);
        let candidates = prune_step(join_step(&level), &level);
        // [1, 2, 4] needs [2, 4]
        assert_eq!(items(&candidates), vec![vec![1, 2, 3], vec![1, 3, 4]]);
    }

    #[test]
    fn test_prune_step_keeps_pairs() {
        let level = itemsets(vec![vec![1], vec![2]]);
        let candidates = prune_step(join_step(&level), &level);
        assert_eq!(items(&candidates), vec![vec![1, 2]]);
    }
}

use bitvec::vec::BitVec;
use tracing::debug;

use crate::{
    error::{MiningError, Result},
    types::{ItemId, TidSet, Transaction},
};

/// Read-only, normalized view over a transaction dataset.
///
/// Items are mapped to dense [`ItemId`]s in ascending item order. For every
/// item the store keeps the set of transactions containing it, so support
/// counts are bit-set intersections instead of scans.
#[derive(Debug, Clone)]
pub struct TransactionStore<T> {
    inventory: Vec<T>,
    transactions: Vec<Transaction>,
    tidsets: Vec<TidSet>,
    item_counts: Vec<u32>,
}

impl<T: Ord + Clone> TransactionStore<T> {
    /// Normalizes `raw_transactions`. Duplicate items within a transaction
    /// are collapsed; transactions without items still count toward the total.
    pub fn new<R, I>(raw_transactions: R) -> Result<Self>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = T>,
    {
        let raw_transactions: Vec<Vec<T>> = raw_transactions
            .into_iter()
            .map(|transaction| transaction.into_iter().collect())
            .collect();
        if raw_transactions.is_empty() {
            return Err(MiningError::EmptyDataset);
        }

        let mut inventory: Vec<T> = raw_transactions.iter().flatten().cloned().collect();
        inventory.sort_unstable();
        inventory.dedup();

        let num_transactions = raw_transactions.len();
        let mut tidsets: Vec<TidSet> =
            vec![BitVec::repeat(false, num_transactions); inventory.len()];
        let mut item_counts = vec![0_u32; inventory.len()];

        let transactions: Vec<Transaction> = raw_transactions
            .iter()
            .enumerate()
            .map(|(tid, raw_transaction)| {
                // every item is in the inventory by construction
                let mut items: Transaction = raw_transaction
                    .iter()
                    .filter_map(|item| inventory.binary_search(item).ok())
                    .collect();
                items.sort_unstable();
                items.dedup();

                for &item in &items {
                    tidsets[item].set(tid, true);
                    item_counts[item] += 1;
                }
                items
            })
            .collect();

        debug!(
            transactions = num_transactions,
            items = inventory.len(),
            "built transaction store"
        );

        Ok(Self {
            inventory,
            transactions,
            tidsets,
            item_counts,
        })
    }

    pub fn id_of(&self, item: &T) -> Option<ItemId> {
        self.inventory.binary_search(item).ok()
    }
}

impl<T> TransactionStore<T> {
    pub fn num_transactions(&self) -> usize {
        self.transactions.len()
    }

    pub fn num_items(&self) -> usize {
        self.inventory.len()
    }

    /// Panics if `id` was not issued by this store.
    pub fn item(&self, id: ItemId) -> &T {
        &self.inventory[id]
    }

    pub fn items(&self) -> &[T] {
        &self.inventory
    }

    /// Panics if an id was not issued by this store.
    pub fn resolve<'s>(&'s self, itemset: &[ItemId]) -> Vec<&'s T> {
        itemset.iter().map(|&id| &self.inventory[id]).collect()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Panics if `id` was not issued by this store.
    pub fn item_count(&self, id: ItemId) -> u32 {
        self.item_counts[id]
    }

    /// Panics if `id` was not issued by this store.
    pub fn tidset(&self, id: ItemId) -> &TidSet {
        &self.tidsets[id]
    }

    /// Transactions containing every item of `itemset`. Panics on ids not
    /// issued by this store.
    pub fn tidset_of(&self, itemset: &[ItemId]) -> TidSet {
        match itemset.split_first() {
            None => BitVec::repeat(true, self.num_transactions()),
            Some((&first, rest)) => {
                let mut tids = self.tidsets[first].clone();
                for &item in rest {
                    tids &= self.tidsets[item].as_bitslice();
                }
                tids
            }
        }
    }

    /// Number of transactions that are supersets of `itemset`. Panics on ids
    /// not issued by this store.
    pub fn support_count(&self, itemset: &[ItemId]) -> u32 {
        match itemset {
            [] => self.num_transactions() as u32,
            [item] => self.item_counts[*item],
            _ => self.tidset_of(itemset).count_ones() as u32,
        }
    }

    pub fn support(&self, itemset: &[ItemId]) -> f64 {
        self.support_count(itemset) as f64 / self.num_transactions() as f64
    }

    /// Distinct items by descending count, ties broken by item order.
    pub fn items_by_frequency(&self) -> Vec<ItemId> {
        let mut items: Vec<ItemId> = (0..self.num_items()).collect();
        items.sort_by(|&a, &b| {
            self.item_counts[b]
                .cmp(&self.item_counts[a])
                .then_with(|| a.cmp(&b))
        });
        items
    }

    /// Smallest count `c` with `c / n >= min_support`, evaluated in `f64` so
    /// every engine applies the inclusive threshold identically.
    pub fn min_support_count(&self, min_support: f64) -> u32 {
        let n = self.num_transactions() as f64;
        let meets = |count: u32| count as f64 / n >= min_support;

        let mut count = (min_support * n).ceil().max(0.0) as u32;
        while count > 0 && meets(count - 1) {
            count -= 1;
        }
        while !meets(count) {
            count += 1;
        }
        count
    }
}

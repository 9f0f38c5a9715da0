use std::collections::HashMap;

use serde::Serialize;

use crate::{
    error::{check_min_support, MiningError, Result},
    store::TransactionStore,
    types::{ItemId, Itemset, ItemsetCounts, ItemsetLength},
};

/// An itemset with its support count and support.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportRecord {
    pub itemset: Itemset,
    pub count: u32,
    pub support: f64,
}

/// Presentation row for one frequent itemset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemsetRecord<T> {
    pub items: Vec<T>,
    pub support: f64,
    pub length: ItemsetLength,
}

/// Result of one mining run: every frequent itemset with its support count.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItemsets {
    counts: ItemsetCounts,
    num_transactions: usize,
    min_support: f64,
}

impl FrequentItemsets {
    pub(crate) fn new(num_transactions: usize, min_support: f64) -> Self {
        Self {
            counts: HashMap::new(),
            num_transactions,
            min_support,
        }
    }

    /// Builds a table from externally held counts, e.g. a cached run.
    ///
    /// Fails with `EmptyDataset` when `num_transactions` is 0 and with
    /// `InconsistentTable` when a count exceeds it or falls below
    /// `min_support`. The rule deriver checks subsets when it needs them.
    pub fn from_counts<I>(num_transactions: usize, min_support: f64, counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Itemset, u32)>,
    {
        check_min_support(min_support)?;
        if num_transactions == 0 {
            return Err(MiningError::EmptyDataset);
        }

        let mut table = Self::new(num_transactions, min_support);
        for (itemset, count) in counts {
            if count as usize > num_transactions || table.to_support(count) < min_support {
                return Err(MiningError::InconsistentTable { itemset });
            }
            table.insert(itemset, count);
        }
        Ok(table)
    }

    pub(crate) fn insert(&mut self, itemset: Itemset, count: u32) {
        self.counts.insert(itemset, count);
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn num_transactions(&self) -> usize {
        self.num_transactions
    }

    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    /// Size of the largest frequent itemset, 0 when the table is empty.
    pub fn max_len(&self) -> ItemsetLength {
        self.counts.keys().map(|itemset| itemset.len()).max().unwrap_or(0)
    }

    pub fn contains(&self, itemset: &[ItemId]) -> bool {
        self.counts.contains_key(itemset)
    }

    pub fn count(&self, itemset: &[ItemId]) -> Option<u32> {
        self.counts.get(itemset).copied()
    }

    pub fn support(&self, itemset: &[ItemId]) -> Option<f64> {
        self.count(itemset).map(|count| self.to_support(count))
    }

    pub(crate) fn to_support(&self, count: u32) -> f64 {
        count as f64 / self.num_transactions as f64
    }

    fn record(&self, itemset: &Itemset, count: u32) -> SupportRecord {
        SupportRecord {
            itemset: itemset.clone(),
            count,
            support: self.to_support(count),
        }
    }

    /// All itemsets in canonical order: by size, then by items.
    pub fn iter(&self) -> impl Iterator<Item = SupportRecord> + '_ {
        let mut itemsets: Vec<(&Itemset, &u32)> = self.counts.iter().collect();
        itemsets.sort_unstable_by(|a, b| a.0.cmp(b.0));
        itemsets
            .into_iter()
            .map(move |(itemset, &count)| self.record(itemset, count))
    }

    /// Itemsets of exactly `size` items, in canonical order.
    pub fn of_size(&self, size: ItemsetLength) -> Vec<SupportRecord> {
        self.iter()
            .filter(|record| record.itemset.len() == size)
            .collect()
    }

    /// All itemsets by descending support, ties in canonical order.
    pub fn ranked(&self) -> Vec<SupportRecord> {
        let mut records: Vec<SupportRecord> = self.iter().collect();
        // stable sort keeps canonical order among equal counts
        records.sort_by(|a, b| b.count.cmp(&a.count));
        records
    }

    /// Presentation rows, ordered like [`ranked`](Self::ranked).
    ///
    /// Panics if the table holds ids not issued by `store`.
    pub fn records<T: Clone>(&self, store: &TransactionStore<T>) -> Vec<ItemsetRecord<T>> {
        self.ranked()
            .into_iter()
            .map(|record| ItemsetRecord {
                items: record.itemset.iter().map(|&id| store.item(id).clone()).collect(),
                support: record.support,
                length: record.itemset.len(),
            })
            .collect()
    }
}

use std::{
    borrow::Borrow,
    cmp::Ordering,
    collections::HashMap,
    fmt::{Display, Formatter},
    ops::Deref,
};

use bitvec::vec::BitVec;

/// Dense id of an item inside one [`TransactionStore`](crate::TransactionStore).
///
/// Ids are assigned in ascending item order, so comparing ids compares items.
pub type ItemId = usize;

pub type Transaction = Vec<ItemId>;
/// One bit per transaction, set when the transaction contains the itemset.
pub type TidSet = BitVec;

pub type ItemCounts = HashMap<ItemId, u32>;
pub type ItemsetCounts = HashMap<Itemset, u32>;

pub type ItemsetLength = usize;

/// A non-empty, sorted, duplicate-free set of item ids.
///
/// Canonical order between itemsets is by size first, then lexicographic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Itemset(Vec<ItemId>);

impl Itemset {
    /// Builds an itemset from arbitrary ids. Returns `None` when no ids are given.
    pub fn new<I: IntoIterator<Item = ItemId>>(items: I) -> Option<Self> {
        let mut items: Vec<ItemId> = items.into_iter().collect();
        if items.is_empty() {
            return None;
        }
        items.sort_unstable();
        items.dedup();
        Some(Self(items))
    }

    pub(crate) fn from_sorted(items: Vec<ItemId>) -> Self {
        debug_assert!(!items.is_empty());
        debug_assert!(items.windows(2).all(|w| w[0] < w[1]));
        Self(items)
    }

    pub fn singleton(item: ItemId) -> Self {
        Self(vec![item])
    }

    pub fn as_slice(&self) -> &[ItemId] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ItemId> {
        self.0
    }

    /// Items of `self` that are not in `other`, or `None` when nothing is left.
    pub fn difference(&self, other: &[ItemId]) -> Option<Self> {
        let rest: Vec<ItemId> = self
            .0
            .iter()
            .copied()
            .filter(|item| other.binary_search(item).is_err())
            .collect();
        (!rest.is_empty()).then(|| Self(rest))
    }
}

impl Deref for Itemset {
    type Target = [ItemId];

    fn deref(&self) -> &[ItemId] {
        &self.0
    }
}

impl Borrow<[ItemId]> for Itemset {
    fn borrow(&self) -> &[ItemId] {
        &self.0
    }
}

impl Ord for Itemset {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Itemset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Itemset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

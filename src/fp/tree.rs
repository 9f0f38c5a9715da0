use std::collections::HashMap;

use crate::types::ItemId;

pub type NodeId = usize;

/// A node of an [`FPTree`]. Nodes live in the tree's arena: `children` owns
/// its entries, `parent` is only a back link.
#[derive(Debug, Clone)]
pub struct FPNode {
    pub item: Option<ItemId>,
    pub count: u32,
    pub parent: Option<NodeId>,
    pub children: HashMap<ItemId, NodeId>,
}

impl FPNode {
    fn new_root() -> Self {
        Self {
            item: None,
            count: 0,
            parent: None,
            children: HashMap::new(),
        }
    }

    fn new_item(item: ItemId, count: u32, parent: NodeId) -> Self {
        Self {
            item: Some(item),
            count,
            parent: Some(parent),
            children: HashMap::new(),
        }
    }
}

/// Prefix path leading to one node, weighted by that node's count.
pub type PrefixPath = (Vec<ItemId>, u32);

/// Prefix tree over transactions with a header table linking every node of
/// the same item.
#[derive(Debug, Clone)]
pub struct FPTree {
    nodes: Vec<FPNode>,
    header_table: HashMap<ItemId, Vec<NodeId>>,
}

impl Default for FPTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FPTree {
    const ROOT: NodeId = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![FPNode::new_root()],
            header_table: HashMap::new(),
        }
    }

    /// Inserts `path` with weight `count`. Items must already be in the
    /// tree's global order.
    pub fn insert(&mut self, path: &[ItemId], count: u32) {
        let mut current = Self::ROOT;

        for &item in path {
            if let Some(&child) = self.nodes[current].children.get(&item) {
                self.nodes[child].count += count;
                current = child;
            } else {
                let child = self.nodes.len();
                self.nodes.push(FPNode::new_item(item, count, current));
                self.nodes[current].children.insert(item, child);
                self.header_table.entry(item).or_default().push(child);
                current = child;
            }
        }
    }

    pub fn node(&self, id: NodeId) -> &FPNode {
        &self.nodes[id]
    }

    pub fn root(&self) -> &FPNode {
        &self.nodes[Self::ROOT]
    }

    /// Number of item nodes, excluding the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node_links(&self, item: ItemId) -> &[NodeId] {
        self.header_table
            .get(&item)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total count of `item` across all its nodes.
    pub fn item_support(&self, item: ItemId) -> u32 {
        self.node_links(item)
            .iter()
            .map(|&node| self.nodes[node].count)
            .sum()
    }

    /// Conditional pattern base of `item`: the path above each of its nodes.
    pub fn prefix_paths(&self, item: ItemId) -> Vec<PrefixPath> {
        self.node_links(item)
            .iter()
            .filter_map(|&node| {
                let mut path = Vec::new();
                let mut current = self.nodes[node].parent;

                while let Some(id) = current {
                    if let Some(item) = self.nodes[id].item {
                        path.push(item);
                    }
                    current = self.nodes[id].parent;
                }

                path.reverse();
                (!path.is_empty()).then(|| (path, self.nodes[node].count))
            })
            .collect()
    }

    /// Items and counts along the only branch, or `None` if the tree branches.
    pub fn single_path(&self) -> Option<Vec<(ItemId, u32)>> {
        let mut path = Vec::new();
        let mut current = self.root();

        loop {
            let mut children = current.children.values();
            match (children.next(), children.next()) {
                (None, _) => return Some(path),
                (Some(&child), None) => {
                    current = &self.nodes[child];
                    if let Some(item) = current.item {
                        path.push((item, current.count));
                    }
                }
                (Some(_), Some(_)) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fp_tree_insert() {
        let mut tree = FPTree::new();

        tree.insert(&[1, 2, 3], 1);
        assert!(tree.root().children.contains_key(&1));
        assert_eq!(tree.node_links(1).len(), 1);
        assert_eq!(tree.node_links(2).len(), 1);
        assert_eq!(tree.node_links(3).len(), 1);

        // shares the [1, 2] prefix
        tree.insert(&[1, 2, 4], 1);
        let node1 = tree.root().children[&1];
        assert_eq!(tree.node(node1).count, 2);
        assert_eq!(tree.node_links(4).len(), 1);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_fp_tree_weighted_insert() {
        let mut tree = FPTree::new();
        tree.insert(&[1, 2], 3);
        tree.insert(&[2], 2);

        assert_eq!(tree.item_support(1), 3);
        assert_eq!(tree.item_support(2), 5);
        assert_eq!(tree.node_links(2).len(), 2);
        assert_eq!(tree.item_support(9), 0);
    }

    #[test]
    fn test_fp_tree_prefix_paths() {
        // root -> 1 -> 2 -> 3
        //              \-> 4
        let mut tree = FPTree::new();
        tree.insert(&[1, 2, 3], 1);
        tree.insert(&[1, 2, 4], 1);
        tree.insert(&[1, 2, 4], 1);

        assert_eq!(tree.prefix_paths(3), vec![(vec![1, 2], 1)]);
        assert_eq!(tree.prefix_paths(4), vec![(vec![1, 2], 2)]);
        // nodes directly below the root have no prefix
        assert!(tree.prefix_paths(1).is_empty());
    }

    #[test]
    fn test_fp_tree_single_path() {
        let mut tree = FPTree::new();
        tree.insert(&[1, 2, 3], 2);
        tree.insert(&[1, 2], 1);
        assert_eq!(tree.single_path(), Some(vec![(1, 3), (2, 3), (3, 2)]));

        let mut branching = FPTree::new();
        branching.insert(&[1, 2], 1);
        branching.insert(&[1, 3], 1);
        assert_eq!(branching.single_path(), None);

        assert_eq!(FPTree::new().single_path(), Some(vec![]));
        assert!(FPTree::new().is_empty());
    }
}

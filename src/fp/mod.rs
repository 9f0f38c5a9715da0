pub mod growth;
pub mod tree;

pub use tree::{FPNode, FPTree};

// src/tree/mod.rs
// =============================================================================
// The repository tree: the node type and the recursive builder that fills it.
//
// Submodules:
// - node: TreeNode, path joining and sibling ordering
// - builder: walks the remote listing API and assembles the tree
// =============================================================================

mod builder;
mod node;

pub use builder::build_tree;
pub use node::TreeNode;

#[cfg(test)]
pub use node::{join_path, NodeKind};

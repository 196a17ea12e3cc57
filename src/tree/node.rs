// src/tree/node.rs
// =============================================================================
// The assembled repository tree.
//
// A TreeNode is either a file (no children) or a directory (an ordered
// vector of children, possibly empty). `path` is always the parent's path
// joined with `name`, and is the key passed back to fetch a file's content.
// =============================================================================

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "file")]
    File,
    #[serde(rename = "dir")]
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: String,
    /// Only present on directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
    /// Set on a directory whose listing failed; its children are then empty
    #[serde(default, skip_serializing_if = "is_false")]
    pub partial: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TreeNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File,
            path: path.into(),
            children: None,
            partial: false,
        }
    }

    pub fn directory(name: impl Into<String>, path: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory,
            path: path.into(),
            children: Some(children),
            partial: false,
        }
    }

    /// A directory whose contents could not be listed
    pub fn partial_directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self { partial: true, ..Self::directory(name, path, Vec::new()) }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Depth-first search by path
    pub fn find<'a>(nodes: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
        nodes.iter().find_map(|node| {
            if node.path == path {
                Some(node)
            } else if node.is_dir() && path.starts_with(&format!("{}/", node.path)) {
                TreeNode::find(node.children(), path)
            } else {
                None
            }
        })
    }
}

/// Joins a parent path and an entry name; the root has an empty path
pub fn join_path(parent: &str, name: &str) -> String {
    let parent = parent.trim_end_matches('/');
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Sibling order: directories first, then files. Within a kind names
/// compare case-insensitively, ties broken by byte order so the order is
/// total.
pub fn compare_siblings(a: &TreeNode, b: &TreeNode) -> Ordering {
    match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    }
}

pub fn sort_siblings(nodes: &mut [TreeNode]) {
    nodes.sort_by(compare_siblings);
}

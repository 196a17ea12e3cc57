// src/tree/builder.rs
// =============================================================================
// Recursive acquisition of the repository tree.
//
// How it works:
// 1. List the directory at the requested path through the ContentSource
// 2. Turn every entry into a TreeNode; directories recurse into step 1
// 3. Sibling directories are expanded concurrently and joined before sorting
// 4. Sort siblings (directories first, then by name) and return them
//
// Failure policy:
// - The root listing failing fails the whole build (no tree at all)
// - A subdirectory listing failing yields an empty directory marked
//   `partial`, and its siblings are unaffected
//
// Every call returns its own subtree; nothing is accumulated in shared state.
// The request concurrency ceiling lives in the gateway, so firing all
// siblings at once only queues excess requests.
// =============================================================================

use futures::future::{join_all, BoxFuture, FutureExt};
use tracing::{debug, warn};

use super::node::{join_path, sort_siblings, TreeNode};
use crate::error::ExploreResult;
use crate::github::{ContentSource, EntryKind, RawEntry, RepoRef};

/// Builds the full tree below `root` ("" for the repository root).
pub async fn build_tree(source: &dyn ContentSource, repo: &RepoRef, root: &str) -> ExploreResult<Vec<TreeNode>> {
    let entries = source.list_directory(repo, root).await?;
    Ok(assemble(source, repo, root, entries).await)
}

// Lists one subdirectory. Errors are absorbed here: None means the listing
// failed and the caller marks the node as partial.
//
// Boxed because it is (indirectly) recursive.
fn expand<'a>(source: &'a dyn ContentSource, repo: &'a RepoRef, path: String) -> BoxFuture<'a, Option<Vec<TreeNode>>> {
    async move {
        match source.list_directory(repo, &path).await {
            Ok(entries) => Some(assemble(source, repo, &path, entries).await),
            Err(err) => {
                warn!(%repo, %path, error = %err, "could not list directory, showing it as empty");
                None
            }
        }
    }
    .boxed()
}

async fn assemble(source: &dyn ContentSource, repo: &RepoRef, parent: &str, entries: Vec<RawEntry>) -> Vec<TreeNode> {
    debug!(%repo, path = parent, entries = entries.len(), "assembling directory");

    let nodes = entries.into_iter().map(|entry| {
        let path = join_path(parent, &entry.name);
        async move {
            match entry.kind {
                EntryKind::Dir => match expand(source, repo, path.clone()).await {
                    Some(children) => TreeNode::directory(entry.name, path, children),
                    None => TreeNode::partial_directory(entry.name, path),
                },
                // Symlinks and submodules are shown as plain files
                EntryKind::File | EntryKind::Symlink | EntryKind::Submodule | EntryKind::Other => {
                    TreeNode::file(entry.name, path)
                }
            }
        }
    });

    let mut nodes = join_all(nodes).await;
    sort_siblings(&mut nodes);
    nodes
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is expand() boxed?
//    - An async fn that (indirectly) calls itself would have an infinitely
//      sized future type
//    - BoxFuture puts each level on the heap, so depth only costs one
//      allocation per directory
//
// 2. Why join_all and not a loop with .await?
//    - A loop would list sibling directories one after another
//    - join_all starts them all and waits for all of them; the gateway's
//      semaphore decides how many actually hit the network at once
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExploreError;
    use crate::testing::MemorySource;
    use crate::tree::NodeKind;
    use pretty_assertions::assert_eq;

    fn repo() -> RepoRef {
        RepoRef::new("octo", "explorer")
    }

    #[tokio::test]
    async fn test_scenario_tree() {
        let source = MemorySource::new()
            .dir("", &[("src", EntryKind::Dir), ("README.md", EntryKind::File)])
            .dir("src", &[("a.ts", EntryKind::File)]);

        let tree = build_tree(&source, &repo(), "").await.unwrap();

        assert_eq!(
            tree,
            vec![
                TreeNode::directory("src", "src", vec![TreeNode::file("a.ts", "src/a.ts")]),
                TreeNode::file("README.md", "README.md"),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_directory_is_not_an_error() {
        let source = MemorySource::new().dir("", &[("docs", EntryKind::Dir)]).dir("docs", &[]);

        let tree = build_tree(&source, &repo(), "").await.unwrap();

        assert_eq!(tree, vec![TreeNode::directory("docs", "docs", vec![])]);
        assert!(!tree[0].partial);
    }

    #[tokio::test]
    async fn test_every_entry_becomes_a_node_in_order() {
        let source = MemorySource::new()
            .dir(
                "",
                &[
                    ("zz.txt", EntryKind::File),
                    ("lib", EntryKind::Dir),
                    ("Cargo.toml", EntryKind::File),
                    ("vendor", EntryKind::Submodule),
                    ("bin", EntryKind::Dir),
                    ("link", EntryKind::Symlink),
                ],
            )
            .dir("lib", &[])
            .dir("bin", &[]);

        let tree = build_tree(&source, &repo(), "").await.unwrap();

        assert_eq!(tree.len(), 6);
        let summary: Vec<_> = tree.iter().map(|n| (n.name.as_str(), n.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("bin", NodeKind::Directory),
                ("lib", NodeKind::Directory),
                ("Cargo.toml", NodeKind::File),
                ("link", NodeKind::File),
                ("vendor", NodeKind::File),
                ("zz.txt", NodeKind::File),
            ]
        );
    }

    #[tokio::test]
    async fn test_failing_subdirectory_degrades_to_empty() {
        let source = MemorySource::new()
            .dir("", &[("good", EntryKind::Dir), ("bad", EntryKind::Dir), ("flaky", EntryKind::Dir)])
            .dir("good", &[("deep", EntryKind::Dir)])
            .dir("good/deep", &[("x.rs", EntryKind::File)])
            .fail("bad", ExploreError::NotFound { status: 404, message: "Not Found".into(), path: None })
            .fail("flaky", ExploreError::Transient { status: Some(502), message: "Bad Gateway".into() });

        let tree = build_tree(&source, &repo(), "").await.unwrap();

        assert_eq!(tree.len(), 3);
        let bad = TreeNode::find(&tree, "bad").unwrap();
        assert!(bad.partial);
        assert_eq!(bad.children, Some(vec![]));
        assert!(TreeNode::find(&tree, "flaky").unwrap().partial);

        let deep_file = TreeNode::find(&tree, "good/deep/x.rs").unwrap();
        assert_eq!(deep_file.kind, NodeKind::File);
        assert!(!TreeNode::find(&tree, "good").unwrap().partial);
    }

    #[tokio::test]
    async fn test_root_failure_propagates() {
        let source = MemorySource::new().fail(
            "",
            ExploreError::RateLimited { status: 403, message: "API rate limit exceeded".into() },
        );

        let err = build_tree(&source, &repo(), "").await.unwrap_err();
        assert!(matches!(err, ExploreError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_paths_join_parent_and_name() {
        let source = MemorySource::new()
            .dir("", &[("a", EntryKind::Dir)])
            .dir("a", &[("b", EntryKind::Dir), ("one.md", EntryKind::File)])
            .dir("a/b", &[("two.md", EntryKind::File)]);

        let tree = build_tree(&source, &repo(), "").await.unwrap();

        fn check(nodes: &[TreeNode], parent: &str) {
            for node in nodes {
                assert_eq!(node.path, join_path(parent, &node.name));
                check(node.children(), &node.path);
            }
        }
        check(&tree, "");
        assert!(TreeNode::find(&tree, "a/b/two.md").is_some());
    }

    #[tokio::test]
    async fn test_subtree_build() {
        let source = MemorySource::new()
            .dir("", &[("src", EntryKind::Dir)])
            .dir("src", &[("main.rs", EntryKind::File)]);

        let tree = build_tree(&source, &repo(), "src").await.unwrap();
        assert_eq!(tree, vec![TreeNode::file("main.rs", "src/main.rs")]);
    }

    #[tokio::test]
    async fn test_sibling_directories_expand_concurrently() {
        let source = MemorySource::new()
            .dir("", &[("a", EntryKind::Dir), ("b", EntryKind::Dir), ("c", EntryKind::Dir)])
            .dir("a", &[])
            .dir("b", &[])
            .dir("c", &[])
            .with_latency(std::time::Duration::from_millis(20));

        build_tree(&source, &repo(), "").await.unwrap();

        // Root first, then the three siblings together
        assert_eq!(source.max_in_flight(), 3);
        assert_eq!(source.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_repeated_builds_are_identical() {
        let source = MemorySource::new()
            .dir("", &[("src", EntryKind::Dir), ("README.md", EntryKind::File), ("docs", EntryKind::Dir)])
            .dir("src", &[("b.rs", EntryKind::File), ("a.rs", EntryKind::File)])
            .dir("docs", &[]);

        let first = build_tree(&source, &repo(), "").await.unwrap();
        let second = build_tree(&source, &repo(), "").await.unwrap();
        assert_eq!(first, second);
    }
}

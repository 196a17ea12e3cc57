// src/explorer/mod.rs
// =============================================================================
// The operations the front end calls.
//
// - load_repository: metadata, then the full tree and the readme
// - fetch_file_content: one decoded file, addressed by a TreeNode path
// - fetch_readme: the decoded readme, if the repository has one
//
// Errors from the metadata call, the root listing and single-file fetches
// are returned to the caller. Subdirectory failures are absorbed by the tree
// builder, and a missing readme is simply `None`.
// =============================================================================

mod session;

pub use session::{Generation, LoadOutcome, Session};

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ExploreError, ExploreResult};
use crate::github::{ContentSource, FileContent, RepoRef, RepositoryMetadata};
use crate::tree::{build_tree, TreeNode};

/// Everything shown for one loaded repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySnapshot {
    pub repo: RepoRef,
    pub metadata: RepositoryMetadata,
    pub tree: Vec<TreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
}

impl RepositorySnapshot {
    /// Number of (files, directories) in the tree
    pub fn counts(&self) -> (usize, usize) {
        fn walk(nodes: &[TreeNode], files: &mut usize, dirs: &mut usize) {
            for node in nodes {
                if node.is_dir() {
                    *dirs += 1;
                    walk(node.children(), files, dirs);
                } else {
                    *files += 1;
                }
            }
        }
        let (mut files, mut dirs) = (0, 0);
        walk(&self.tree, &mut files, &mut dirs);
        (files, dirs)
    }
}

pub async fn load_repository(source: &dyn ContentSource, repo: &RepoRef) -> ExploreResult<RepositorySnapshot> {
    info!(%repo, "loading repository");

    // No tree is built unless the metadata call succeeded
    let metadata = source.repository(repo).await?;

    let (tree, readme) = tokio::join!(build_tree(source, repo, ""), fetch_readme(source, repo));
    let tree = tree?;
    let readme = readme.unwrap_or_else(|err| {
        warn!(%repo, error = %err, "could not load readme");
        None
    });

    let snapshot = RepositorySnapshot { repo: repo.clone(), metadata, tree, readme };
    let (files, dirs) = snapshot.counts();
    info!(%repo, files, dirs, "repository loaded");
    Ok(snapshot)
}

pub async fn fetch_file_content(source: &dyn ContentSource, repo: &RepoRef, path: &str) -> ExploreResult<FileContent> {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Err(ExploreError::malformed("no file path given"));
    }
    // A 404 here means the path, not the repository
    source.file(repo, path).await.map_err(|err| match err {
        ExploreError::NotFound { status, message, .. } => {
            ExploreError::NotFound { status, message, path: Some(path.to_string()) }
        }
        err => err,
    })
}

/// `Ok(None)` when the repository has no readme
pub async fn fetch_readme(source: &dyn ContentSource, repo: &RepoRef) -> ExploreResult<Option<String>> {
    match source.readme(repo).await {
        Ok(file) => Ok(Some(file.text())),
        Err(ExploreError::NotFound { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

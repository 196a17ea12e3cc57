// src/github/identifier.rs
// =============================================================================
// Turns free-form user input into a validated owner/repository pair.
//
// Supported formats:
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo.git
//   - https://github.com/owner/repo/tree/main/src   (extra segments ignored)
//   - github.com/owner/repo
//   - git@github.com:owner/repo.git
//   - owner/repo
// =============================================================================

use std::fmt;

use serde::Serialize;

use crate::error::{ExploreError, ExploreResult};

/// A validated repository reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self { owner: owner.into(), name: name.into() }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// Parses a repository identifier
//
// Returns: RepoRef on success, InvalidIdentifier otherwise
//
// Example:
//   "https://github.com/rust-lang/rust" -> rust-lang/rust
pub fn parse_repo_identifier(input: &str) -> ExploreResult<RepoRef> {
    let trimmed = input.trim();
    let invalid = || ExploreError::InvalidIdentifier(trimmed.to_string());

    // Drop query strings and fragments before looking at path segments
    let without_suffix = trimmed
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();

    let path = if let Some(rest) = without_suffix.strip_prefix("git@github.com:") {
        rest
    } else {
        let stripped = without_suffix
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.");

        if let Some(rest) = stripped.strip_prefix("github.com/") {
            rest
        } else if stripped.contains("://") || first_segment_is_host(stripped) {
            // A URL, but not one pointing at github.com
            return Err(invalid());
        } else {
            stripped
        }
    };

    let mut parts = path.split('/').filter(|part| !part.is_empty());
    let owner = parts.next().ok_or_else(invalid)?;
    let repo = parts.next().ok_or_else(invalid)?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if !is_valid_owner(owner) || !is_valid_repo_name(repo) {
        return Err(invalid());
    }

    Ok(RepoRef::new(owner, repo))
}

// "gitlab.com/user/repo" has a dotted first segment; GitHub owners never do
fn first_segment_is_host(path: &str) -> bool {
    path.split('/').next().map_or(false, |segment| segment.contains('.'))
}

fn is_valid_owner(owner: &str) -> bool {
    !owner.is_empty()
        && owner
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_valid_repo_name(repo: &str) -> bool {
    !repo.is_empty()
        && repo != "."
        && repo != ".."
        && repo
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

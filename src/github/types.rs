// src/github/types.rs
// =============================================================================
// Wire types for the GitHub REST API and the values the gateway hands out.
//
// The provider's JSON uses its own field names (stargazers_count,
// owner.login, ...). We deserialize into Raw* structs and convert them into
// flat values so the rest of the program never sees the wire shape.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Kind of an entry in a directory listing, as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// One entry of a "list directory contents" response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

/// A single-file body from the contents or readme endpoint, still encoded
#[derive(Debug, Clone, Deserialize)]
pub struct RawFile {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// The contents endpoint answers with an array for directories and an
/// object for files; `untagged` picks whichever matches.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawContents {
    Listing(Vec<RawEntry>),
    File(RawFile),
}

/// Error body returned by the provider on non-2xx responses
#[derive(Debug, Default, Deserialize)]
pub struct RawApiError {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOwner {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLicense {
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /repos/{owner}/{repo}` as the provider sends it
#[derive(Debug, Clone, Deserialize)]
pub struct RawRepository {
    pub name: String,
    pub owner: RawOwner,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub license: Option<RawLicense>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub fork: bool,
}

/// Repository metadata, passed through to the presentation unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryMetadata {
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    /// Size in KiB, as reported by the provider
    pub size: u64,
    pub license: Option<String>,
    pub topics: Vec<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub default_branch: String,
    pub homepage: Option<String>,
    pub html_url: String,
    pub is_fork: bool,
}

impl From<RawRepository> for RepositoryMetadata {
    fn from(raw: RawRepository) -> Self {
        Self {
            owner: raw.owner.login,
            name: raw.name,
            description: raw.description.filter(|d| !d.is_empty()),
            language: raw.language,
            stars: raw.stargazers_count,
            forks: raw.forks_count,
            watchers: raw.watchers_count,
            open_issues: raw.open_issues_count,
            size: raw.size,
            license: raw.license.and_then(|l| l.name),
            topics: raw.topics,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            default_branch: raw.default_branch.unwrap_or_else(|| "main".to_string()),
            homepage: raw.homepage.filter(|h| !h.is_empty()),
            html_url: raw.html_url,
            is_fork: raw.fork,
        }
    }
}

/// A decoded file body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub name: String,
    pub path: String,
    pub bytes: Vec<u8>,
}

impl FileContent {
    /// The content as text; invalid UTF-8 sequences are replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_and_file_shapes() {
        let listing: RawContents = serde_json::from_str(
            r#"[{"name":"src","path":"src","type":"dir","sha":"x"},
                {"name":"vendored","path":"vendored","type":"submodule"},
                {"name":"odd","path":"odd","type":"something-new"}]"#,
        )
        .unwrap();
        match listing {
            RawContents::Listing(entries) => {
                assert_eq!(entries.len(), 3);
                assert_eq!(entries[0].kind, EntryKind::Dir);
                assert_eq!(entries[1].kind, EntryKind::Submodule);
                assert_eq!(entries[2].kind, EntryKind::Other);
            }
            RawContents::File(_) => panic!("expected a listing"),
        }

        let file: RawContents = serde_json::from_str(
            r#"{"name":"a.rs","path":"src/a.rs","type":"file","content":"Zm4K","encoding":"base64"}"#,
        )
        .unwrap();
        assert!(matches!(file, RawContents::File(RawFile { ref encoding, .. }) if encoding.as_deref() == Some("base64")));
    }

    #[test]
    fn test_repository_conversion() {
        let raw: RawRepository = serde_json::from_str(
            r#"{
                "name": "explorer",
                "owner": {"login": "octo"},
                "description": "",
                "language": "Rust",
                "stargazers_count": 10,
                "forks_count": 2,
                "watchers_count": 10,
                "open_issues_count": 1,
                "size": 2048,
                "license": {"key": "mit", "name": "MIT License"},
                "topics": ["cli"],
                "created_at": "2024-01-02T03:04:05Z",
                "updated_at": "2024-02-03T04:05:06Z",
                "default_branch": "trunk",
                "homepage": null,
                "html_url": "https://github.com/octo/explorer",
                "fork": true
            }"#,
        )
        .unwrap();

        let meta = RepositoryMetadata::from(raw);
        assert_eq!(meta.owner, "octo");
        assert_eq!(meta.description, None);
        assert_eq!(meta.license.as_deref(), Some("MIT License"));
        assert_eq!(meta.default_branch, "trunk");
        assert!(meta.is_fork);
        assert_eq!(meta.stars, 10);
    }

    #[test]
    fn test_lossy_text() {
        let file = FileContent { name: "b".into(), path: "b".into(), bytes: vec![b'o', b'k', 0xff] };
        assert_eq!(file.text(), "ok\u{fffd}");
    }
}

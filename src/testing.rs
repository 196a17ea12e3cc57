// src/testing.rs
// =============================================================================
// Test support: an in-memory ContentSource.
//
// Listings, files, metadata and the readme are registered up front; every
// call is recorded so tests can assert on what was (or was not) requested.
// Paths that were never registered answer with NotFound, like the provider.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ExploreError, ExploreResult};
use crate::github::{ContentSource, EntryKind, FileContent, RawEntry, RepoRef, RepositoryMetadata};
use crate::tree::join_path;

#[derive(Default)]
pub struct MemorySource {
    listings: HashMap<String, ExploreResult<Vec<RawEntry>>>,
    files: HashMap<String, ExploreResult<FileContent>>,
    metadata: Option<ExploreResult<RepositoryMetadata>>,
    readme: Option<ExploreResult<FileContent>>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

fn not_found() -> ExploreError {
    ExploreError::NotFound { status: 404, message: "Not Found".to_string(), path: None }
}

pub fn sample_metadata(repo: &RepoRef) -> RepositoryMetadata {
    RepositoryMetadata {
        owner: repo.owner.clone(),
        name: repo.name.clone(),
        description: Some("Explore repositories from the terminal".to_string()),
        language: Some("Rust".to_string()),
        stars: 1200,
        forks: 34,
        watchers: 1200,
        open_issues: 5,
        size: 2560,
        license: Some("MIT License".to_string()),
        topics: vec!["cli".to_string(), "github".to_string()],
        created_at: Some("2023-04-01T10:00:00Z".to_string()),
        updated_at: Some("2024-06-15T08:30:00Z".to_string()),
        default_branch: "main".to_string(),
        homepage: None,
        html_url: format!("https://github.com/{}/{}", repo.owner, repo.name),
        is_fork: false,
    }
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a directory listing at `path`
    pub fn dir(mut self, path: &str, entries: &[(&str, EntryKind)]) -> Self {
        let entries = entries
            .iter()
            .map(|(name, kind)| RawEntry { name: name.to_string(), path: join_path(path, name), kind: *kind })
            .collect();
        self.listings.insert(path.to_string(), Ok(entries));
        self
    }

    /// Makes the listing at `path` fail
    pub fn fail(mut self, path: &str, error: ExploreError) -> Self {
        self.listings.insert(path.to_string(), Err(error));
        self
    }

    pub fn file(mut self, path: &str, content: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        let file = FileContent { name, path: path.to_string(), bytes: content.as_bytes().to_vec() };
        self.files.insert(path.to_string(), Ok(file));
        self
    }

    pub fn metadata(mut self, result: ExploreResult<RepositoryMetadata>) -> Self {
        self.metadata = Some(result);
        self
    }

    pub fn readme(mut self, result: ExploreResult<FileContent>) -> Self {
        self.readme = Some(result);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Every request made so far, as "kind:path"
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn request(&self, call: String) {
        self.calls.lock().unwrap().push(call);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn repository(&self, repo: &RepoRef) -> ExploreResult<RepositoryMetadata> {
        self.request(format!("repo:{}", repo)).await;
        self.metadata.clone().unwrap_or_else(|| Ok(sample_metadata(repo)))
    }

    async fn list_directory(&self, _repo: &RepoRef, path: &str) -> ExploreResult<Vec<RawEntry>> {
        self.request(format!("list:{}", path)).await;
        self.listings.get(path).cloned().unwrap_or_else(|| Err(not_found()))
    }

    async fn file(&self, _repo: &RepoRef, path: &str) -> ExploreResult<FileContent> {
        self.request(format!("file:{}", path)).await;
        self.files.get(path).cloned().unwrap_or_else(|| Err(not_found()))
    }

    async fn readme(&self, _repo: &RepoRef) -> ExploreResult<FileContent> {
        self.request("readme".to_string()).await;
        self.readme.clone().unwrap_or_else(|| Err(not_found()))
    }
}

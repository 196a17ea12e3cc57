// src/github/gateway.rs
// =============================================================================
// The boundary to the GitHub REST API.
//
// Each method performs exactly one GET request and returns either the decoded
// payload or a typed ExploreError. There are no retries and no caching.
//
// Endpoints used:
//   GET /repos/{owner}/{repo}                  -> repository metadata
//   GET /repos/{owner}/{repo}/contents/{path}  -> listing (array) or file (object)
//   GET /repos/{owner}/{repo}/readme           -> readme file
//
// The ContentSource trait is the seam the tree builder and the explorer work
// against; GithubGateway is the only network-backed implementation.
// =============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;
use url::Url;

use super::decode::decode_file;
use super::identifier::RepoRef;
use super::types::{FileContent, RawApiError, RawContents, RawEntry, RawFile, RawRepository, RepositoryMetadata};
use crate::config::Config;
use crate::error::{ExploreError, ExploreResult};

/// Something that can answer repository queries.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Repository metadata
    async fn repository(&self, repo: &RepoRef) -> ExploreResult<RepositoryMetadata>;

    /// Entries of the directory at `path` ("" is the root), in arrival order
    async fn list_directory(&self, repo: &RepoRef, path: &str) -> ExploreResult<Vec<RawEntry>>;

    /// Decoded content of the file at `path`
    async fn file(&self, repo: &RepoRef, path: &str) -> ExploreResult<FileContent>;

    /// Decoded content of the repository's readme
    async fn readme(&self, repo: &RepoRef) -> ExploreResult<FileContent>;
}

pub struct GithubGateway {
    client: Client,
    api_url: Url,
    // Bounds the number of requests in flight; excess callers wait here
    permits: Arc<Semaphore>,
}

impl GithubGateway {
    pub fn new(config: &Config) -> ExploreResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));

        // The provider rejects requests without a User-Agent
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            permits: Arc::new(Semaphore::new(config.max_requests)),
        })
    }

    // Builds {api_url}/repos/{owner}/{repo}/{tail...} with each segment
    // percent-encoded on its own
    fn endpoint<'a, I>(&self, repo: &RepoRef, tail: I) -> ExploreResult<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| ExploreError::malformed(format!("API URL cannot be a base: {}", self.api_url)))?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.name.as_str()])
            .extend(tail);
        Ok(url)
    }

    fn contents_url(&self, repo: &RepoRef, path: &str) -> ExploreResult<Url> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            // The root listing is addressed as ".../contents/"
            return self.endpoint(repo, ["contents", ""]);
        }
        self.endpoint(repo, std::iter::once("contents").chain(segments))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ExploreResult<T> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ExploreError::malformed("request limiter was closed"))?;

        debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.unwrap_or_default();
            debug!(%url, status = status.as_u16(), "request failed");
            return Err(error_from_parts(status, remaining.as_deref(), &body));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

// Builds the typed error for a non-success response
fn error_from_parts(status: StatusCode, remaining: Option<&str>, body: &str) -> ExploreError {
    let message = serde_json::from_str::<RawApiError>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    let exhausted = remaining.map(str::trim) == Some("0");
    ExploreError::from_status(status, message, exhausted)
}

#[async_trait]
impl ContentSource for GithubGateway {
    async fn repository(&self, repo: &RepoRef) -> ExploreResult<RepositoryMetadata> {
        let url = self.endpoint(repo, [])?;
        let raw: RawRepository = self.get_json(url).await?;
        Ok(raw.into())
    }

    async fn list_directory(&self, repo: &RepoRef, path: &str) -> ExploreResult<Vec<RawEntry>> {
        let url = self.contents_url(repo, path)?;
        match self.get_json::<RawContents>(url).await? {
            RawContents::Listing(entries) => Ok(entries),
            RawContents::File(_) => Err(ExploreError::malformed(format!("{} is a file, not a directory", path))),
        }
    }

    async fn file(&self, repo: &RepoRef, path: &str) -> ExploreResult<FileContent> {
        let url = self.contents_url(repo, path)?;
        match self.get_json::<RawContents>(url).await? {
            RawContents::File(raw) => decode_file(raw),
            RawContents::Listing(_) => Err(ExploreError::malformed(format!("{} is a directory, not a file", path))),
        }
    }

    async fn readme(&self, repo: &RepoRef) -> ExploreResult<FileContent> {
        let url = self.endpoint(repo, ["readme"])?;
        let raw: RawFile = self.get_json(url).await?;
        decode_file(raw)
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a Semaphore and not a fixed pool of workers?
//    - The tree builder fires every sibling listing at once and does not know
//      how many requests are already out
//    - Each get_json call takes one permit for the duration of its request,
//      so callers past the limit wait in line instead of failing
//    - The permit is dropped before the body is handed back, which means a
//      recursive walk never holds a permit while waiting for its children
//
// 2. Why read x-ratelimit-remaining?
//    - A throttled request and a private repository both answer 403
//    - The message usually says "rate limit", but the header is the signal
//      that is always present once the budget is spent
//
// 3. Why one contents endpoint for both files and directories?
//    - The provider decides the shape: an array for a directory, an object
//      for a file. RawContents is untagged, so the shape picks the variant
//      and asking for the wrong one is reported instead of mis-decoded
// -----------------------------------------------------------------------------

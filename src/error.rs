// src/error.rs
// =============================================================================
// The error taxonomy shared by the gateway, the tree builder and the explorer.
//
// Every failure that leaves the core is one of these variants. The binary
// turns them into a human-readable message with `user_message()`; the
// variants themselves keep the upstream status code and message so callers
// can tell a throttled request from a missing repository.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExploreError {
    /// The user's input did not contain an owner/repository pair
    #[error("invalid repository identifier: {0}")]
    InvalidIdentifier(String),

    /// HTTP 404 from the provider. `path` names the file that was asked
    /// for; `None` means the repository itself
    #[error("not found (HTTP {status}): {message}")]
    NotFound { status: u16, message: String, path: Option<String> },

    /// HTTP 403 with a rate-limit signal, or HTTP 429
    #[error("rate limited (HTTP {status}): {message}")]
    RateLimited { status: u16, message: String },

    /// HTTP 401, or HTTP 403 without a rate-limit signal
    #[error("unauthorized (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Timeouts, connection failures, 408 and 5xx
    #[error("transient failure{}: {message}", fmt_status(.status))]
    Transient { status: Option<u16>, message: String },

    /// Anything else, including payloads we could not decode
    #[error("request failed{}: {message}", fmt_status(.status))]
    Unknown { status: Option<u16>, message: String },
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

pub type ExploreResult<T> = Result<T, ExploreError>;

impl ExploreError {
    /// Classifies a non-success response from the provider.
    ///
    /// `message` is the `message` field of the provider's JSON error body
    /// (or the canonical reason when the body had none) and
    /// `rate_limit_exhausted` reflects an `x-ratelimit-remaining: 0` header.
    pub fn from_status(status: StatusCode, message: String, rate_limit_exhausted: bool) -> Self {
        let code = status.as_u16();
        let mentions_rate_limit = message.to_lowercase().contains("rate limit");

        match status {
            StatusCode::NOT_FOUND => ExploreError::NotFound { status: code, message, path: None },
            StatusCode::TOO_MANY_REQUESTS => ExploreError::RateLimited { status: code, message },
            StatusCode::FORBIDDEN if mentions_rate_limit || rate_limit_exhausted => {
                ExploreError::RateLimited { status: code, message }
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ExploreError::Unauthorized { status: code, message }
            }
            StatusCode::REQUEST_TIMEOUT => ExploreError::Transient { status: Some(code), message },
            s if s.is_server_error() => ExploreError::Transient { status: Some(code), message },
            _ => ExploreError::Unknown { status: Some(code), message },
        }
    }

    /// A payload arrived but did not have the shape we expected.
    pub fn malformed(message: impl Into<String>) -> Self {
        ExploreError::Unknown { status: None, message: message.into() }
    }

    /// The upstream status code, when the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ExploreError::InvalidIdentifier(_) => None,
            ExploreError::NotFound { status, .. }
            | ExploreError::RateLimited { status, .. }
            | ExploreError::Unauthorized { status, .. } => Some(*status),
            ExploreError::Transient { status, .. } | ExploreError::Unknown { status, .. } => {
                *status
            }
        }
    }

    /// The text shown to the person at the terminal.
    pub fn user_message(&self) -> String {
        match self {
            ExploreError::InvalidIdentifier(input) => {
                format!("Invalid GitHub URL: {}", input)
            }
            ExploreError::NotFound { path: Some(path), .. } => {
                format!("File not found: {}", path)
            }
            ExploreError::NotFound { path: None, .. } => {
                "Repository not found. Please check the URL.".to_string()
            }
            ExploreError::RateLimited { .. } => {
                "GitHub API rate limit exceeded. Please try again in a few minutes or use a different network."
                    .to_string()
            }
            ExploreError::Unauthorized { message, .. } => {
                format!("Access denied by GitHub: {}", message)
            }
            ExploreError::Transient { message, .. } => {
                format!("GitHub is temporarily unreachable: {}", message)
            }
            ExploreError::Unknown { message, .. } => {
                format!("Failed to fetch repository: {}", message)
            }
        }
    }
}

// Transport-level failures never carry a status; the response path goes
// through `from_status` instead.
impl From<reqwest::Error> for ExploreError {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        if error.is_timeout() || error.is_connect() || error.is_request() {
            ExploreError::Transient { status: None, message }
        } else {
            ExploreError::Unknown { status: error.status().map(|s| s.as_u16()), message }
        }
    }
}

impl From<serde_json::Error> for ExploreError {
    fn from(error: serde_json::Error) -> Self {
        ExploreError::malformed(format!("unexpected response body: {}", error))
    }
}

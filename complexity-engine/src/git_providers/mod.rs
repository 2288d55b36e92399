//! Hosting provider seam.
//!
//! The core consumes three collaborator capabilities from the code hosting
//! platform: comparing two commits, fetching raw (base64) file content at a
//! ref, and posting a pull request comment. They are grouped into the
//! `PullRequestHost` trait. Methods return `Send` futures so callers can be
//! driven from HTTP handlers; implementations are free to write plain
//! `async fn` (no `async-trait`, no boxed futures).

pub mod types;
pub use types::*;

pub mod github;

use std::future::Future;

use crate::errors::EngineResult;

/// Runtime configuration for the GitHub client.
///
/// Usually injected from environment via the API layer.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API base, e.g. "https://api.github.com".
    pub base_api: String,
    /// Access token for the provider (PAT or app token).
    pub token: String,
}

/// Collaborator capabilities the report pipeline needs from the hosting API.
pub trait PullRequestHost: Send + Sync {
    /// Lists files changed between `base_sha` and `head_sha`.
    fn compare_commits(
        &self,
        repo: &RepoId,
        base_sha: &str,
        head_sha: &str,
    ) -> impl Future<Output = EngineResult<CommitComparison>> + Send;

    /// Fetches `path` at `git_ref` as base64-encoded text.
    ///
    /// A missing file is an error, not an empty result.
    fn fetch_content(
        &self,
        repo: &RepoId,
        path: &str,
        git_ref: &str,
    ) -> impl Future<Output = EngineResult<String>> + Send;

    /// Posts `body` as a new comment on the pull request.
    fn post_comment(
        &self,
        pr: &PullRequestId,
        body: &str,
    ) -> impl Future<Output = EngineResult<()>> + Send;
}

//! GitHub provider (REST v3) for commit comparisons, file content and comments.
//!
//! Endpoints used:
//!   * GET  /repos/{owner}/{repo}/compare/{base}...{head}
//!   * GET  /repos/{owner}/{repo}/contents/{path}?ref={ref}
//!   * POST /repos/{owner}/{repo}/issues/{number}/comments

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{DecodeError, EngineResult, ProviderError};
use crate::git_providers::types::*;
use crate::git_providers::{ProviderConfig, PullRequestHost};

/// GitHub HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String,      // "https://api.github.com"
    authorization: String, // "Bearer <token>" or "token <PAT>"
}

impl GitHubClient {
    /// Builds a client with a stable user agent so GitHub can identify the
    /// integration.
    pub fn from_config(cfg: ProviderConfig) -> EngineResult<Self> {
        debug!("Initializing GitHub client: base_api={}", cfg.base_api);

        let http = Client::builder()
            .user_agent("pr-complexity/0.1")
            .build()?;

        Ok(Self::new(http, cfg.base_api, &cfg.token))
    }

    /// Constructs a GitHub client with a shared HTTP instance and auth token.
    pub fn new(http: Client, base_api: String, token: &str) -> Self {
        Self {
            http,
            base_api: base_api.trim_end_matches('/').to_string(),
            authorization: authorization_header(token),
        }
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("Authorization", &self.authorization)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }
}

impl PullRequestHost for GitHubClient {
    async fn compare_commits(
        &self,
        repo: &RepoId,
        base_sha: &str,
        head_sha: &str,
    ) -> EngineResult<CommitComparison> {
        let url = format!(
            "{}/repos/{}/{}/compare/{}...{}",
            self.base_api, repo.owner, repo.name, base_sha, head_sha
        );
        debug!("GitHub compare_commits: {}", url);

        // NOTE: GitHub caps the file list of a comparison at 300 entries.
        let resp = self.authorized(self.http.get(url)).send().await?;
        let comparison: CommitComparison = ensure_success(resp)?.json().await?;

        debug!(files = comparison.files.len(), "comparison fetched");
        Ok(comparison)
    }

    async fn fetch_content(&self, repo: &RepoId, path: &str, git_ref: &str) -> EngineResult<String> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_api,
            repo.owner,
            repo.name,
            encode_path(path)
        );
        debug!("GitHub fetch_content: url={}, ref={}", url, git_ref);

        let resp = self
            .authorized(self.http.get(url))
            .query(&[("ref", git_ref)])
            .send()
            .await?;

        let file: GitHubContent = ensure_success(resp)?.json().await?;

        match file.encoding.as_deref() {
            Some("base64") | None => Ok(file.content.unwrap_or_default()),
            Some(other) => Err(DecodeError::UnsupportedEncoding {
                path: path.to_string(),
                encoding: other.to_string(),
            }
            .into()),
        }
    }

    async fn post_comment(&self, pr: &PullRequestId, body: &str) -> EngineResult<()> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.base_api, pr.repo.owner, pr.repo.name, pr.number
        );
        debug!("GitHub post_comment: url={}, bytes={}", url, body.len());

        let resp = self
            .authorized(self.http.post(url))
            .json(&GitHubCommentCreate { body })
            .send()
            .await?;

        ensure_success(resp)?;
        Ok(())
    }
}

/// Turns non-2xx responses into provider errors, honoring `Retry-After`.
fn ensure_success(resp: Response) -> Result<Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let code = status.as_u16();
    if code == 429 {
        let retry_after_secs = resp
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        return Err(ProviderError::RateLimited { retry_after_secs });
    }

    Err(ProviderError::from_status(code))
}

/// Percent-encodes each path segment while keeping the separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Bare tokens are sent as bearer tokens; values with a scheme are kept.
fn authorization_header(token: &str) -> String {
    let token = token.trim();
    if token.contains(' ') {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

/// GitHub contents response (subset).
#[derive(Debug, Deserialize)]
struct GitHubContent {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Serialize)]
struct GitHubCommentCreate<'a> {
    body: &'a str,
}

//! Provider-agnostic data model for pull requests and commit comparisons.

use serde::{Deserialize, Serialize};

/// A repository on the hosting platform ("owner/repo").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    /// Splits "owner/repo" into components.
    ///
    /// Returns `None` when the value has no owner, no repo, or extra segments.
    pub fn parse(full_name: &str) -> Option<Self> {
        let mut parts = full_name.split('/');
        let owner = parts.next().unwrap_or("").trim();
        let name = parts.next().unwrap_or("").trim();

        if owner.is_empty() || name.is_empty() || parts.next().is_some() {
            return None;
        }

        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A unique reference to a pull request inside a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestId {
    pub repo: RepoId,
    pub number: u64,
}

/// One side of a pull request: commit SHA plus branch ref.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    pub sha: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
}

impl Revision {
    /// Branch name used when fetching file content at this revision.
    pub fn content_ref(&self) -> &str {
        self.git_ref
            .strip_prefix("refs/heads/")
            .unwrap_or(self.git_ref.as_str())
    }
}

/// Everything an event run needs to know about the pull request.
#[derive(Debug, Clone)]
pub struct PullRequestEvent {
    pub id: PullRequestId,
    pub base: Revision,
    pub head: Revision,
}

/// Status of a file inside a commit comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    #[serde(other)]
    Unknown,
}

/// One entry from a commit comparison.
///
/// Identity is the filename, assumed stable across base and head.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    #[serde(default = "default_status")]
    pub status: FileStatus,
}

fn default_status() -> FileStatus {
    FileStatus::Modified
}

impl ChangedFile {
    /// Whether the file has a revision on the base side of the comparison.
    pub fn exists_at_base(&self) -> bool {
        self.status != FileStatus::Added
    }
}

/// Result of comparing two commits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitComparison {
    #[serde(default)]
    pub files: Vec<ChangedFile>,
}

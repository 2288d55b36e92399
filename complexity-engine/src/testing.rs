//! In-memory collaborators for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::errors::{EngineResult, OracleError, ProviderError};
use crate::git_providers::{
    ChangedFile, CommitComparison, FileStatus, PullRequestHost, PullRequestId, RepoId,
};
use crate::oracle::{ComplexityMetrics, ComplexityOracle, OracleRequest};

pub fn encode(text: &str) -> String {
    STANDARD.encode(text)
}

pub fn changed(filename: &str) -> ChangedFile {
    ChangedFile {
        filename: filename.to_string(),
        status: FileStatus::Modified,
    }
}

/// Hosting API fake: files keyed by (path, ref), records fetches and comments.
#[derive(Default)]
pub struct FakeHost {
    files: HashMap<(String, String), String>,
    comparison: CommitComparison,
    fetches: Mutex<Vec<(String, String)>>,
    comments: Mutex<Vec<(PullRequestId, String)>>,
    compares: Mutex<Vec<(String, String)>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, git_ref: &str, text: &str) -> Self {
        self.files
            .insert((path.to_string(), git_ref.to_string()), text.to_string());
        self
    }

    pub fn with_changed(mut self, file: ChangedFile) -> Self {
        self.comparison.files.push(file);
        self
    }

    pub fn fetches(&self) -> Vec<(String, String)> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn comments(&self) -> Vec<(PullRequestId, String)> {
        self.comments.lock().unwrap().clone()
    }

    pub fn compares(&self) -> Vec<(String, String)> {
        self.compares.lock().unwrap().clone()
    }
}

impl PullRequestHost for FakeHost {
    async fn compare_commits(
        &self,
        _repo: &RepoId,
        base_sha: &str,
        head_sha: &str,
    ) -> EngineResult<CommitComparison> {
        self.compares
            .lock()
            .unwrap()
            .push((base_sha.to_string(), head_sha.to_string()));
        Ok(self.comparison.clone())
    }

    async fn fetch_content(&self, _repo: &RepoId, path: &str, git_ref: &str) -> EngineResult<String> {
        self.fetches
            .lock()
            .unwrap()
            .push((path.to_string(), git_ref.to_string()));

        match self.files.get(&(path.to_string(), git_ref.to_string())) {
            Some(text) => Ok(encode(text)),
            None => Err(ProviderError::NotFound.into()),
        }
    }

    async fn post_comment(&self, pr: &PullRequestId, body: &str) -> EngineResult<()> {
        self.comments
            .lock()
            .unwrap()
            .push((pr.clone(), body.to_string()));
        Ok(())
    }
}

/// Oracle fake: a fixed raw score per exact text, line count from the text.
#[derive(Default)]
pub struct FakeOracle {
    scores: HashMap<String, f64>,
    calls: Mutex<Vec<(String, OracleRequest)>>,
}

impl FakeOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(mut self, text: &str, score: f64) -> Self {
        self.scores.insert(text.to_string(), score);
        self
    }

    pub fn calls(&self) -> Vec<(String, OracleRequest)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ComplexityOracle for FakeOracle {
    async fn score(
        &self,
        text: &str,
        request: &OracleRequest,
    ) -> Result<ComplexityMetrics, OracleError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), request.clone()));

        let score = self
            .scores
            .get(text)
            .copied()
            .ok_or_else(|| OracleError::Remote(format!("cannot score {text:?}")))?;

        Ok(ComplexityMetrics {
            total_lines: text.lines().count() as u64,
            dependency_count: 0,
            score,
            lines: None,
        })
    }
}

//! Per-file revision analysis.
//!
//! Every changed file is an independent unit: fetch head/base content, decode
//! it, score both sides with the oracle. Units run concurrently on the current
//! task and are awaited jointly; the first failure aborts the whole batch so
//! a partial report is never produced.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use futures::future::{try_join, try_join_all};
use tracing::debug;

use super::FileAnalysisResult;
use super::classify::{SourceKind, extension};
use crate::errors::{EngineError, EngineResult};
use crate::git_providers::{ChangedFile, FileStatus, PullRequestHost, RepoId};
use crate::oracle::{ComplexityOracle, OracleRequest};

/// Refs the content is fetched at.
#[derive(Debug, Clone, Copy)]
pub struct RevisionRefs<'a> {
    pub base: &'a str,
    pub head: &'a str,
}

/// Analyzes `files` between `refs.base` and `refs.head`.
///
/// The output has one entry per input file, in input order.
pub async fn analyze<H, O>(
    host: &H,
    oracle: &O,
    repo: &RepoId,
    files: &[ChangedFile],
    refs: RevisionRefs<'_>,
) -> EngineResult<Vec<FileAnalysisResult>>
where
    H: PullRequestHost,
    O: ComplexityOracle,
{
    debug!(files = files.len(), base = refs.base, head = refs.head, "analyzing revision");

    try_join_all(
        files
            .iter()
            .map(|file| analyze_file(host, oracle, repo, file, refs)),
    )
    .await
}

async fn analyze_file<H, O>(
    host: &H,
    oracle: &O,
    repo: &RepoId,
    file: &ChangedFile,
    refs: RevisionRefs<'_>,
) -> EngineResult<FileAnalysisResult>
where
    H: PullRequestHost,
    O: ComplexityOracle,
{
    let kind = SourceKind::classify(&file.filename);

    if !kind.is_supported() {
        if kind.is_flow_typed() {
            debug!(file = %file.filename, "flow-typed source, not analyzed");
        }
        return Ok(FileAnalysisResult::skipped(&file.filename, kind));
    }

    if file.status == FileStatus::Removed {
        debug!(file = %file.filename, "removed in head, nothing to analyze");
        return Ok(FileAnalysisResult::skipped(&file.filename, kind));
    }

    let head = fetch_text(host, repo, &file.filename, refs.head);
    let base = async {
        if file.exists_at_base() {
            fetch_text(host, repo, &file.filename, refs.base).await.map(Some)
        } else {
            Ok(None)
        }
    };
    let (head_text, base_text) = try_join(head, base).await?;

    let request = OracleRequest::new(
        extension(&file.filename).unwrap_or_default(),
        kind.is_typescript(),
    );

    let current = async {
        oracle
            .score(&head_text, &request)
            .await
            .map_err(EngineError::from)
    };
    let previous = async {
        match &base_text {
            Some(text) => oracle
                .score(text, &request)
                .await
                .map(Some)
                .map_err(EngineError::from),
            None => Ok(None),
        }
    };
    let (metrics, previous_metrics) = try_join(current, previous).await?;

    debug!(
        file = %file.filename,
        score = metrics.score,
        previous = ?previous_metrics.as_ref().map(|m| m.score),
        "file analyzed"
    );

    Ok(FileAnalysisResult::analyzed(
        &file.filename,
        kind,
        metrics,
        previous_metrics,
    ))
}

async fn fetch_text<H: PullRequestHost>(
    host: &H,
    repo: &RepoId,
    path: &str,
    git_ref: &str,
) -> EngineResult<String> {
    let encoded = host.fetch_content(repo, path, git_ref).await?;
    decode_content(&encoded)
}

/// Decodes provider base64 (line-wrapped or not) into UTF-8 text.
pub fn decode_content(encoded: &str) -> EngineResult<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}

//! Pull request complexity reports.
//!
//! On every triggering pull request event the crate:
//!   * compares the PR's base and head commits on the hosting platform
//!   * fetches each changed source file at both revisions
//!   * scores both sides with an external complexity oracle
//!   * renders a Markdown table of before/after deltas
//!   * posts it as a single PR comment (or nothing when no file was analyzed)
//!
//! Each event is an independent, complete run: nothing is cached between
//! events and any failure aborts the run before a comment is posted.

pub mod analysis;
pub mod errors;
pub mod events;
pub mod git_providers;
pub mod oracle;

#[cfg(test)]
pub(crate) mod testing;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    analysis::{
        pipeline::{RevisionRefs, analyze},
        report,
    },
    errors::EngineResult,
    git_providers::{PullRequestEvent, PullRequestHost},
    oracle::ComplexityOracle,
};

/// How a completed event run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// A report was posted.
    Commented {
        changed_files: usize,
        analyzed_files: usize,
    },
    /// Nothing analyzable changed; no comment was posted.
    NothingToReport { changed_files: usize },
}

/// Runs the full complexity report for a single pull request event.
///
/// Start → compare commits → analyze changed files → render → post.
pub async fn run_complexity_report<H, O>(
    host: &H,
    oracle: &O,
    event: &PullRequestEvent,
) -> EngineResult<RunOutcome>
where
    H: PullRequestHost,
    O: ComplexityOracle,
{
    info!(
        repo = %event.id.repo,
        pr = event.id.number,
        base = %event.base.sha,
        head = %event.head.sha,
        "complexity report started"
    );

    let comparison = host
        .compare_commits(&event.id.repo, &event.base.sha, &event.head.sha)
        .await?;
    let changed_files = comparison.files.len();
    debug!(files = changed_files, "comparison fetched");

    let refs = RevisionRefs {
        base: event.base.content_ref(),
        head: event.head.content_ref(),
    };
    let results = analyze(host, oracle, &event.id.repo, &comparison.files, refs).await?;

    let Some(report) = report::render_results(&results) else {
        info!(
            repo = %event.id.repo,
            pr = event.id.number,
            files = changed_files,
            "no analyzable files, skipping comment"
        );
        return Ok(RunOutcome::NothingToReport { changed_files });
    };

    host.post_comment(&event.id, &report.body).await?;

    info!(
        repo = %event.id.repo,
        pr = event.id.number,
        analyzed = report.analyzed_files,
        "complexity report posted"
    );

    Ok(RunOutcome::Commented {
        changed_files,
        analyzed_files: report.analyzed_files,
    })
}

use complexity_engine::{
    events::PrAction,
    git_providers::{PullRequestEvent, PullRequestId, RepoId, Revision},
};
use serde::Deserialize;

use crate::error_handler::{AppError, AppResult};

/// `pull_request` webhook body (subset).
#[derive(Debug, Deserialize)]
pub struct PullRequestWebhook {
    pub action: String,
    pub pull_request: PullRequestPayload,
    pub repository: RepositoryPayload,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestPayload {
    pub number: u64,
    pub base: Revision,
    pub head: Revision,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryPayload {
    /// "owner/repo".
    pub full_name: String,
}

/// A webhook delivery classified by its `X-GitHub-Event` header.
#[derive(Debug)]
pub enum Delivery {
    Ping,
    /// Any event kind other than `pull_request`.
    Unhandled(String),
    PullRequest {
        action: PrAction,
        event: PullRequestEvent,
    },
}

/// Classifies a delivery and, for pull requests, validates the payload.
pub fn parse_delivery(event_kind: Option<&str>, body: &[u8]) -> AppResult<Delivery> {
    let kind = event_kind
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::BadRequest("missing X-GitHub-Event header".into()))?;

    match kind {
        "ping" => Ok(Delivery::Ping),
        "pull_request" => {
            let hook: PullRequestWebhook = serde_json::from_slice(body)
                .map_err(|e| AppError::BadRequest(format!("invalid pull_request payload: {e}")))?;

            let repo = RepoId::parse(&hook.repository.full_name).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "invalid repository '{}', expected 'owner/repo'",
                    hook.repository.full_name
                ))
            })?;

            Ok(Delivery::PullRequest {
                action: PrAction::parse(&hook.action),
                event: PullRequestEvent {
                    id: PullRequestId {
                        repo,
                        number: hook.pull_request.number,
                    },
                    base: hook.pull_request.base,
                    head: hook.pull_request.head,
                },
            })
        }
        other => Ok(Delivery::Unhandled(other.to_string())),
    }
}

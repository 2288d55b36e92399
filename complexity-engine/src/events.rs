//! Pull request event routing.
//!
//! The set of actions that trigger a report is an explicit table built once at
//! process start and handed to the HTTP layer. Actions without an entry are
//! acknowledged and ignored.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::{
    RunOutcome,
    errors::EngineResult,
    git_providers::{PullRequestEvent, PullRequestHost},
    oracle::ComplexityOracle,
    run_complexity_report,
};

/// `action` field of a `pull_request` webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrAction {
    Opened,
    Synchronize,
    Reopened,
    Edited,
    Other,
}

impl PrAction {
    pub fn parse(action: &str) -> Self {
        match action {
            "opened" => PrAction::Opened,
            "synchronize" => PrAction::Synchronize,
            "reopened" => PrAction::Reopened,
            "edited" => PrAction::Edited,
            _ => PrAction::Other,
        }
    }
}

/// What to run for a registered action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandler {
    ComplexityReport,
}

impl EventHandler {
    async fn run<H, O>(self, host: &H, oracle: &O, event: &PullRequestEvent) -> EngineResult<RunOutcome>
    where
        H: PullRequestHost,
        O: ComplexityOracle,
    {
        match self {
            EventHandler::ComplexityReport => run_complexity_report(host, oracle, event).await,
        }
    }
}

/// Result of dispatching one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Dispatch {
    /// No handler is registered for the action.
    Ignored { action: PrAction },
    Handled(RunOutcome),
}

/// Action → handler table.
#[derive(Debug, Clone, Default)]
pub struct EventHandlers {
    routes: HashMap<PrAction, EventHandler>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, action: PrAction, handler: EventHandler) -> Self {
        self.routes.insert(action, handler);
        self
    }

    /// `opened`, `synchronize` and `reopened` run the complexity report.
    pub fn production() -> Self {
        Self::new()
            .register(PrAction::Opened, EventHandler::ComplexityReport)
            .register(PrAction::Synchronize, EventHandler::ComplexityReport)
            .register(PrAction::Reopened, EventHandler::ComplexityReport)
    }

    /// Adds the manual `edited` trigger used when debugging a deployment.
    pub fn with_edited_trigger(self) -> Self {
        self.register(PrAction::Edited, EventHandler::ComplexityReport)
    }

    pub fn handler_for(&self, action: PrAction) -> Option<EventHandler> {
        self.routes.get(&action).copied()
    }

    pub async fn dispatch<H, O>(
        &self,
        host: &H,
        oracle: &O,
        action: PrAction,
        event: &PullRequestEvent,
    ) -> EngineResult<Dispatch>
    where
        H: PullRequestHost,
        O: ComplexityOracle,
    {
        let Some(handler) = self.handler_for(action) else {
            debug!(?action, "no handler registered, ignoring event");
            return Ok(Dispatch::Ignored { action });
        };

        debug!(?action, ?handler, "dispatching event");
        let outcome = handler.run(host, oracle, event).await?;
        Ok(Dispatch::Handled(outcome))
    }
}

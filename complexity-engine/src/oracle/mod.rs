//! Complexity oracle seam.
//!
//! The scoring algorithm lives outside this crate. Anything that turns source
//! text plus a few language flags into `ComplexityMetrics` can be plugged in:
//! a local command, a remote service, or an in-process function in tests.
//! Concrete adapters are selected at runtime through `ComplexityOracleClient`
//! (enum dispatch, no trait objects).

pub mod command;
pub mod http;

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::OracleError;

/// Metrics returned by the oracle for one file at one revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityMetrics {
    /// Total line count of the file.
    #[serde(alias = "total_lines")]
    pub total_lines: u64,
    /// Number of imported dependencies.
    #[serde(default, alias = "dependency_count", alias = "numDependencies")]
    pub dependency_count: u64,
    /// Raw score in `[0, 100]`; higher means simpler code.
    #[serde(alias = "codehawkScore")]
    pub score: f64,
    /// Lines of code without blanks/comments, when the oracle reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<u64>,
}

/// Per-call parameters handed to the oracle next to the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleRequest {
    pub extension: String,
    pub is_typescript: bool,
    /// Flow-typed syntax support; always off.
    pub enable_flow: bool,
}

impl OracleRequest {
    pub fn new(extension: impl Into<String>, is_typescript: bool) -> Self {
        Self {
            extension: extension.into(),
            is_typescript,
            enable_flow: false,
        }
    }
}

/// A complexity scorer for source text.
pub trait ComplexityOracle: Send + Sync {
    fn score(
        &self,
        text: &str,
        request: &OracleRequest,
    ) -> impl Future<Output = Result<ComplexityMetrics, OracleError>> + Send;
}

/// Which oracle adapter to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleKind {
    Command,
    Http,
}

impl OracleKind {
    /// Parses `command` / `http` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "command" | "cmd" => Some(OracleKind::Command),
            "http" | "https" => Some(OracleKind::Http),
            _ => None,
        }
    }
}

/// Runtime configuration for the oracle adapter.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub kind: OracleKind,
    /// Command line for `Command`, endpoint URL for `Http`.
    pub target: String,
}

/// Concrete oracle with enum dispatch.
#[derive(Debug, Clone)]
pub enum ComplexityOracleClient {
    Command(command::CommandOracle),
    Http(http::HttpOracle),
}

impl ComplexityOracleClient {
    pub fn from_config(cfg: OracleConfig) -> Result<Self, OracleError> {
        debug!(kind = ?cfg.kind, target = %cfg.target, "initializing complexity oracle");

        match cfg.kind {
            OracleKind::Command => Ok(Self::Command(command::CommandOracle::parse(&cfg.target)?)),
            OracleKind::Http => Ok(Self::Http(http::HttpOracle::new(cfg.target)?)),
        }
    }
}

impl ComplexityOracle for ComplexityOracleClient {
    async fn score(
        &self,
        text: &str,
        request: &OracleRequest,
    ) -> Result<ComplexityMetrics, OracleError> {
        match self {
            Self::Command(o) => o.score(text, request).await,
            Self::Http(o) => o.score(text, request).await,
        }
    }
}

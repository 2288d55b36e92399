use complexity_engine::{
    events::EventHandlers,
    git_providers::{ProviderConfig, github::GitHubClient},
    oracle::{ComplexityOracleClient, OracleConfig, OracleKind},
};
use thiserror::Error;
use tracing::info;

use crate::error_handler::AppResult;

/// Configuration problems detected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address, e.g. "0.0.0.0:3000".
    pub api_address: String,
    /// API base for GitHub, e.g. "https://api.github.com".
    pub github_api_base: String,
    /// Token for GitHub API (PAT or app installation token).
    pub github_token: String,
    /// How and where the complexity oracle is reached.
    pub oracle: OracleConfig,
    /// Registers the manual `edited` trigger; off in normal operation.
    pub enable_edited_trigger: bool,
}

impl AppConfig {
    /// Load settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let oracle_kind = match lookup("COMPLEXITY_ORACLE_KIND") {
            None => OracleKind::Command,
            Some(raw) => OracleKind::parse(&raw).ok_or(ConfigError::Invalid {
                key: "COMPLEXITY_ORACLE_KIND",
                value: raw,
            })?,
        };

        let enable_edited_trigger = match lookup("ENABLE_EDITED_TRIGGER") {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                key: "ENABLE_EDITED_TRIGGER",
                value: raw,
            })?,
        };

        Ok(Self {
            api_address: required("API_ADDRESS")?,
            github_api_base: lookup("GITHUB_API_BASE")
                .unwrap_or_else(|| "https://api.github.com".into()),
            github_token: required("GITHUB_TOKEN")?,
            oracle: OracleConfig {
                kind: oracle_kind,
                target: required("COMPLEXITY_ORACLE")?,
            },
            enable_edited_trigger,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub github: GitHubClient,
    pub oracle: ComplexityOracleClient,
    /// Pull request action → handler table, built once at startup.
    pub handlers: EventHandlers,
}

impl AppState {
    pub fn build(config: &AppConfig) -> AppResult<Self> {
        let github = GitHubClient::from_config(ProviderConfig {
            base_api: config.github_api_base.clone(),
            token: config.github_token.clone(),
        })?;
        let oracle = ComplexityOracleClient::from_config(config.oracle.clone())?;

        let mut handlers = EventHandlers::production();
        if config.enable_edited_trigger {
            info!("manual `edited` trigger enabled");
            handlers = handlers.with_edited_trigger();
        }

        Ok(Self {
            github,
            oracle,
            handlers,
        })
    }
}

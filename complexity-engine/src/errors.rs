//! Crate-wide error hierarchy for complexity-engine.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type EngineResult<T> = Result<T, EngineError>;

/// Root error type for the complexity-engine crate.
///
/// Every variant aborts the current event run: no comment is posted when a
/// run ends with an error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Hosting provider (GitHub) related failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Fetched file content could not be turned into text.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The complexity oracle failed on a supported file.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Provider-specific error used inside the provider layer.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited {
        /// Optional `Retry-After` hint in seconds when available.
        retry_after_secs: Option<u64>,
    },

    /// Gateway / server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (non-2xx) not covered by specific variants.
    #[error("http status error: status {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without HTTP status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected/invalid shape of provider response.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Errors raised while decoding provider file content.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The provider returned content with an encoding other than base64.
    #[error("unsupported content encoding '{encoding}' for {path}")]
    UnsupportedEncoding { path: String, encoding: String },

    /// Content was not valid base64.
    #[error("invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes were not valid UTF-8.
    #[error("content is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors raised by complexity oracle adapters.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The oracle process could not be started or talked to.
    #[error("failed to run oracle command: {0}")]
    Spawn(#[from] std::io::Error),

    /// The oracle process exited unsuccessfully.
    #[error("oracle exited with status {status}: {stderr}")]
    ExitStatus { status: String, stderr: String },

    /// The oracle answered with something that is not a metrics document.
    #[error("malformed oracle output: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Remote oracle endpoint failure.
    #[error("remote oracle error: {0}")]
    Remote(String),

    /// Oracle is not configured (empty command line or URL).
    #[error("oracle is not configured")]
    NotConfigured,
}

// ===== Conversions for `?` ergonomics at the crate root =====

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::Provider(ProviderError::from(e))
    }
}

impl From<base64::DecodeError> for EngineError {
    fn from(e: base64::DecodeError) -> Self {
        EngineError::Decode(DecodeError::Base64(e))
    }
}

impl From<std::string::FromUtf8Error> for EngineError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        EngineError::Decode(DecodeError::Utf8(e))
    }
}

// ===== Mapping from reqwest::Error into ProviderError =====

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return ProviderError::Timeout;
        }

        if let Some(status) = e.status() {
            return ProviderError::from_status(status.as_u16());
        }

        if e.is_decode() {
            return ProviderError::InvalidResponse(e.to_string());
        }

        ProviderError::Network(e.to_string())
    }
}

impl ProviderError {
    /// Maps a non-2xx HTTP status code onto a provider error.
    pub fn from_status(code: u16) -> Self {
        match code {
            401 => ProviderError::Unauthorized,
            403 => ProviderError::Forbidden,
            404 => ProviderError::NotFound,
            429 => ProviderError::RateLimited {
                retry_after_secs: None,
            },
            500..=599 => ProviderError::Server(code),
            _ => ProviderError::HttpStatus(code),
        }
    }
}

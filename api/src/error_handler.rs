use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use complexity_engine::errors::{EngineError, OracleError, ProviderError};
use thiserror::Error;

use crate::shared::{app_state::ConfigError, http::response_envelope::ApiResponse};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    // --- Report pipeline ---
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("report task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<OracleError> for AppError {
    fn from(err: OracleError) -> Self {
        AppError::Engine(EngineError::Oracle(err))
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Engine(EngineError::Provider(_) | EngineError::Decode(_)) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Engine(EngineError::Oracle(_)) | AppError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // startup-only
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Engine(EngineError::Provider(ProviderError::RateLimited { .. })) => {
                "PROVIDER_RATE_LIMITED"
            }
            AppError::Engine(EngineError::Provider(_)) => "PROVIDER_ERROR",
            AppError::Engine(EngineError::Decode(_)) => "CONTENT_DECODE_FAILED",
            AppError::Engine(EngineError::Oracle(_)) => "ORACLE_FAILED",
            AppError::Task(_) => "REPORT_TASK_FAILED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiResponse::<()>::error(self.error_code(), self.to_string())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

//! Oracle adapter backed by a remote scoring service.

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::errors::OracleError;
use crate::oracle::{ComplexityMetrics, ComplexityOracle, OracleRequest};

/// POSTs source text to a scoring endpoint and reads metrics back.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    http: Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    text: &'a str,
    #[serde(flatten)]
    request: &'a OracleRequest,
}

impl HttpOracle {
    pub fn new(endpoint: String) -> Result<Self, OracleError> {
        let endpoint = endpoint.trim().to_string();
        if endpoint.is_empty() {
            return Err(OracleError::NotConfigured);
        }

        let http = Client::builder()
            .user_agent("pr-complexity/0.1")
            .build()
            .map_err(remote)?;

        Ok(Self { http, endpoint })
    }
}

impl ComplexityOracle for HttpOracle {
    async fn score(
        &self,
        text: &str,
        request: &OracleRequest,
    ) -> Result<ComplexityMetrics, OracleError> {
        debug!(endpoint = %self.endpoint, ext = %request.extension, "calling remote oracle");

        let metrics = self
            .http
            .post(&self.endpoint)
            .json(&ScoreRequest { text, request })
            .send()
            .await
            .map_err(remote)?
            .error_for_status()
            .map_err(remote)?
            .json::<ComplexityMetrics>()
            .await
            .map_err(remote)?;

        Ok(metrics)
    }
}

fn remote(e: reqwest::Error) -> OracleError {
    OracleError::Remote(e.to_string())
}

use complexity_engine::events::Dispatch;
use serde::Serialize;

/// Response body returned to the webhook sender.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Human-readable message describing what happened.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Dispatch>,
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Forwarded upstream as the user turn's content, unchanged.
    pub message: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: Box<str>,
}

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Response parsing failed: {0}")]
    ParseFailed(#[from] serde_json::Error),

    #[error("Error response from API ({status}): {message}")]
    ErrorResponse { status: StatusCode, message: Box<str> },

    #[error("API response contained no choices")]
    MissingChoice,
}

#[derive(Debug, Serialize)]
pub struct OpenAIRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [OpenAIMessage<'a>],
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct OpenAIMessage<'a> {
    pub role: &'static str,
    pub content: OpenAIContent<'a>,
}

/// Message content as sent upstream. Caller-supplied content is forwarded as
/// whatever JSON value it arrived as.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OpenAIContent<'a> {
    Text(&'a str),
    Json(&'a Value),
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Box<str>,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    error: OpenAIErrorDetail,
}

/// OpenAI-compatible servers disagree on whether `error` is a bare string or an
/// object with a `message` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OpenAIErrorDetail {
    Text(Box<str>),
    Object { message: Box<str> },
}

impl OpenAIErrorDetail {
    fn into_message(self) -> Box<str> {
        match self {
            Self::Text(message) | Self::Object { message } => message,
        }
    }
}

pub async fn openai_request(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    request: &OpenAIRequest<'_>,
) -> Result<Box<str>, ApiError> {
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .json(request)
        .send()
        .await?;

    let status = response.status();
    let response_text = response.text().await?;
    parse_completion(status, &response_text)
}

/// Pulls the first choice's content out of a chat-completions reply.
fn parse_completion(status: StatusCode, response_text: &str) -> Result<Box<str>, ApiError> {
    // Some providers report failures with a 200 and an error body, so look for
    // the error shape before trusting the status.
    let error_message = serde_json::from_str::<OpenAIError>(response_text)
        .ok()
        .map(|error| error.error.into_message());

    if !status.is_success() || error_message.is_some() {
        let message = error_message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown status")
                .into()
        });
        tracing::warn!("Upstream API returned {status}: {message}");
        return Err(ApiError::ErrorResponse { status, message });
    }

    let response: OpenAIResponse = serde_json::from_str(response_text)?;
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(ApiError::MissingChoice)
}

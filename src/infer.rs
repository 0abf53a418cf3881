mod error;
pub use error::InferError;
pub mod openai;
use openai::{OpenAIContent, OpenAIMessage, OpenAIRequest};
use serde_json::Value;

use crate::config::Config;

#[derive(Debug, Clone, Copy)]
pub enum MessageRole {
    System,
    User,
}

impl MessageRole {
    pub fn into_role_str(self) -> &'static str {
        match self {
            Self::System => openai::ROLE_SYSTEM,
            Self::User => openai::ROLE_USER,
        }
    }
}

/// Upstream chat-completions client. Cheap to share: the inner
/// `reqwest::Client` pools connections and every other field is read-only.
pub struct Client {
    http: reqwest::Client,
    url: Box<str>,
    api_key: Option<Box<str>>,
    model: Box<str>,
    system_prompt: Box<str>,
    temperature: f32,
    max_tokens: u32,
}

impl Client {
    pub fn new(config: &Config) -> Result<Self, InferError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(InferError::ClientBuild)?;

        Ok(Self {
            http,
            url: config.infer_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The fixed system prompt followed by `message` as the user turn.
    pub fn messages<'a>(&'a self, message: &'a Value) -> [OpenAIMessage<'a>; 2] {
        [
            OpenAIMessage {
                role: MessageRole::System.into_role_str(),
                content: OpenAIContent::Text(&self.system_prompt),
            },
            OpenAIMessage {
                role: MessageRole::User.into_role_str(),
                content: OpenAIContent::Json(message),
            },
        ]
    }

    /// Sends one chat-completion request and returns the first choice's
    /// content untouched. Never retries.
    pub async fn complete(&self, message: &Value) -> Result<Box<str>, InferError> {
        let api_key = self.api_key.as_deref().ok_or(InferError::MissingApiKey)?;
        let messages = self.messages(message);
        let request = OpenAIRequest {
            model: &self.model,
            messages: &messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(model = %self.model, url = %self.url, "Sending chat completion");
        Ok(openai::openai_request(&self.http, &self.url, api_key, &request).await?)
    }
}

use thiserror::Error;

use super::openai::ApiError;

#[derive(Error, Debug)]
pub enum InferError {
    #[error("LLM API error: {0}")]
    ApiError(#[from] ApiError),

    #[error("OPENROUTER_API_KEY is not set")]
    MissingApiKey,

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

use axum::{http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::infer::InferError;

pub const MESSAGE_REQUIRED: &str = "Message required";

/// Everything a handler can fail with. Callers only ever see two statuses:
/// 400 for a bad request and 500 for anything that went wrong past
/// validation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    BadRequest(Box<str>),
    #[error(transparent)]
    Infer(#[from] InferError),
}

impl Error {
    pub fn message_required() -> Self {
        Error::BadRequest(MESSAGE_REQUIRED.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Infer(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Serialize, Deserialize)]
pub struct HttpErrorBody {
    pub error: Box<str>,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Service error: {}", self);
        }
        let body = HttpErrorBody {
            error: self.to_string().into(),
        };
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(error: Error) -> (StatusCode, HttpErrorBody) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn bad_request_is_400_with_message() {
        let (status, body) = render(Error::message_required()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(&*body.error, "Message required");
    }

    #[tokio::test]
    async fn infer_errors_are_500_with_description() {
        let (status, body) = render(InferError::MissingApiKey.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(&*body.error, "OPENROUTER_API_KEY is not set");
    }
}

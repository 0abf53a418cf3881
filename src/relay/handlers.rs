use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequest, Request, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Map, Value, json};
use tower_http::cors::{Any, CorsLayer};

use super::AppState;
use super::dto::{ChatRequest, ChatResponse};
use crate::service;

pub fn build_router(state: Arc<AppState>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    Router::new()
        .route("/health", get(health_check))
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    request: ChatRequest,
) -> service::Result<Json<ChatResponse>> {
    tracing::debug!(message = %request.message, "Relaying chat message");
    let response = state.client.complete(&request.message).await?;
    tracing::debug!(len = response.len(), "Upstream replied");
    Ok(Json(ChatResponse { response }))
}

/// Reads the body as JSON and takes its `message` value, of any type. A body
/// that is not a JSON object with that key is a bad request.
impl<S> FromRequest<S> for ChatRequest
where
    S: Send + Sync,
{
    type Rejection = service::Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|_| service::Error::message_required())?;

        serde_json::from_slice::<Map<String, Value>>(&body)
            .ok()
            .and_then(|mut fields| fields.remove("message"))
            .map(|message| ChatRequest { message })
            .ok_or_else(service::Error::message_required)
    }
}

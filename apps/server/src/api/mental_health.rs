use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;

use healthpal_core::{
    mental_health::{ChatSummary, ChatTranscript, MessageView, NewChat, NewMessage},
    users::Identity,
};

use crate::{auth::require_identity, error::ApiResult, main_lib::AppState};

#[derive(Serialize)]
struct ChatStartedResponse {
    message: &'static str,
    chat: ChatSummary,
}

#[derive(Serialize)]
struct MessageSentResponse {
    message: &'static str,
    chat_message: MessageView,
}

/// A missing body starts a chat without a topic.
async fn start_chat(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewChat>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ChatStartedResponse>)> {
    let new_chat = match payload {
        Ok(Json(new_chat)) => new_chat,
        Err(JsonRejection::MissingJsonContentType(_)) => NewChat::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    let chat = state.chat_service.start_chat(&identity, new_chat).await?;
    Ok((
        StatusCode::CREATED,
        Json(ChatStartedResponse {
            message: "Chat started",
            chat,
        }),
    ))
}

async fn transcript(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<ChatTranscript>> {
    let transcript = state.chat_service.transcript(&identity, &id)?;
    Ok(Json(transcript))
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    payload: Result<Json<NewMessage>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageSentResponse>)> {
    let Json(new_message) = payload?;
    let chat_message = state
        .chat_service
        .send_message(&identity, &id, new_message)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageSentResponse {
            message: "Message sent",
            chat_message,
        }),
    ))
}

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/mental-health/chat", post(start_chat))
        .route("/mental-health/chat/{id}", get(transcript))
        .route("/mental-health/chat/{id}/message", post(send_message))
        .route_layer(middleware::from_fn_with_state(state, require_identity))
}

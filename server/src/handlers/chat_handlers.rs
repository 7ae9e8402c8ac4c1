use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    Extension,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::models::session::ChatSession;
use crate::models::user::User;
use crate::state::AppState;
use page_extractor::ExtractionResult;

const NO_PAGE_MESSAGE: &str = "No webpage information available. Please analyze a webpage first.";

#[derive(Deserialize)]
pub struct StartPayload {
    #[serde(default)]
    pub url: String,
}

/// Extracts the page and makes it the subject of the caller's chat.
pub async fn start(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<StartPayload>, JsonRejection>,
) -> Result<Json<ChatSession>, (StatusCode, Json<Value>)> {
    let url = payload.map(|Json(p)| p.url).unwrap_or_default();
    let url = url.trim();
    if url.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "URL is required" })),
        ));
    }

    let webpage_info = state.extractor.extract(url).await;
    if webpage_info.is_success() {
        info!(user = %user.username, %url, words = webpage_info.word_count, "started chat");
    } else {
        warn!(user = %user.username, %url, "started chat on a page that could not be read");
    }

    let session = ChatSession {
        url: url.to_string(),
        webpage_info,
    };
    state.sessions.insert(user.id, session.clone());
    Ok(Json(session))
}

#[derive(Serialize)]
pub struct ChatView {
    pub url: String,
    pub webpage_info: ExtractionResult,
    pub username: String,
}

pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ChatView>, (StatusCode, Json<Value>)> {
    let session = state
        .sessions
        .get(&user.id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| (StatusCode::NOT_FOUND, Json(json!({ "message": NO_PAGE_MESSAGE }))))?;

    Ok(Json(ChatView {
        url: session.url,
        webpage_info: session.webpage_info,
        username: user.username,
    }))
}

#[derive(Deserialize)]
pub struct MessagePayload {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
    pub error: bool,
}

impl ChatReply {
    fn ok(reply: String) -> Json<Self> {
        Json(Self { reply, error: false })
    }

    fn failed(reply: &str) -> Json<Self> {
        Json(Self {
            reply: reply.to_string(),
            error: true,
        })
    }
}

/// Always answers 200; failures are reported in the `error` flag.
pub async fn reply(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<MessagePayload>, JsonRejection>,
) -> Json<ChatReply> {
    let Ok(Json(payload)) = payload else {
        return ChatReply::failed("Invalid request format.");
    };

    let message = payload.message.trim();
    if message.is_empty() {
        return ChatReply::failed("Please enter a message.");
    }

    // Clone out so the map shard is not locked across the API call.
    let Some(webpage_info) = state
        .sessions
        .get(&user.id)
        .map(|entry| entry.webpage_info.clone())
    else {
        return ChatReply::failed(NO_PAGE_MESSAGE);
    };

    match state.assistant.reply(&webpage_info, message).await {
        Ok(text) => ChatReply::ok(text),
        Err(err) => {
            warn!(user = %user.username, error = %err, "assistant reply failed");
            ChatReply::failed(err.user_message())
        }
    }
}

/// Forgets the current page but keeps the login.
pub async fn new_chat(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Json<Value> {
    state.sessions.remove(&user.id);
    Json(json!({ "message": "chat cleared" }))
}

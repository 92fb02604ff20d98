// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST handlers for chats, messages, inboxes and the health probe.
//!
//! Handlers stay thin: decode the request, call one chat component, encode
//! the result. Domain failures become the status codes in [`error_response`]
//! and every non-2xx body is the `{"error": ...}` envelope.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use partyline_core::error::ChatError;
use partyline_core::types::{ChatId, PostId, UserId};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::server::GatewayState;

/// Body of `POST /api/chats`.
#[derive(Debug, Deserialize)]
pub struct OpenChatRequest {
    /// The post the requester wants to talk about.
    pub post_id: String,
    /// The user opening the chat.
    pub requester_id: String,
}

/// Body of `POST /api/chats/{chat_id}/messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// The participant writing the message.
    pub sender_id: String,
    /// The message text.
    pub text: String,
}

/// Envelope for every non-2xx response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Maps a [`ChatError`] onto its status code and the error envelope.
fn error_response(err: ChatError) -> Response {
    let status = match &err {
        ChatError::NotFound { .. } => StatusCode::NOT_FOUND,
        ChatError::Forbidden(_) => StatusCode::FORBIDDEN,
        ChatError::InvalidArgument(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ChatError::InvalidOperation(_) => StatusCode::CONFLICT,
        ChatError::Storage { .. } => StatusCode::SERVICE_UNAVAILABLE,
        ChatError::Config(_) | ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(error = %err, "request failed");
    } else {
        debug!(error = %err, "request rejected");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// `POST /api/chats`: find or create the chat between the requester and the
/// author of the given post, and return it hydrated.
pub async fn post_open_chat(
    State(state): State<GatewayState>,
    Json(body): Json<OpenChatRequest>,
) -> Response {
    let post_id = PostId(body.post_id);
    let requester_id = UserId(body.requester_id);
    match state.directory.open_or_create(&post_id, &requester_id).await {
        Ok(chat) => (StatusCode::OK, Json(chat)).into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /api/chats/{chat_id}/messages`: append one message and fan it out to
/// subscribers. Returns the stored message.
pub async fn post_send_message(
    State(state): State<GatewayState>,
    Path(chat_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Response {
    let chat_id = ChatId(chat_id);
    let sender_id = UserId(body.sender_id);
    match state
        .fanout
        .send_message(&chat_id, &sender_id, &body.text)
        .await
    {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /api/chats/user/{user_id}`: the user's inbox, most recently active
/// chat first.
pub async fn get_user_inbox(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Response {
    match state.inbox.build_inbox(&UserId(user_id)).await {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /health`: liveness probe with the crate version and process uptime.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse, response::Response};
use tracing::error;

use super::AppState;
use crate::core::dispatcher::ChatError;

#[derive(serde::Deserialize)]
pub struct ChatRequest {
    message: String,
}

/// One chat turn: interpret, dispatch, template. Disambiguation outcomes are
/// the caller's problem (400); provider and store failures are ours (500,
/// generic body, detail only in the log).
pub async fn chat_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Response {
    let command = match state.interpreter.interpret(&payload.message).await {
        Ok(command) => command,
        Err(e) => {
            error!("completion provider failure: {e:#}");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "The assistant is unavailable right now.",
            );
        }
    };

    match state.dispatcher.dispatch(command).await {
        Ok(res) => Json(res).into_response(),
        Err(e @ (ChatError::TodoNotFound | ChatError::AmbiguousTarget)) => {
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(ChatError::Store(e)) => {
            error!("todo store failure: {e}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong executing that action.",
            )
        }
    }
}

/// Full list for table clients rendering below the chat.
pub async fn list_todos_endpoint(State(state): State<AppState>) -> Response {
    match state.store.get_all().await {
        Ok(todos) => Json(serde_json::json!({ "todos": todos })).into_response(),
        Err(e) => {
            error!("todo store failure: {e}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not load todos.",
            )
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

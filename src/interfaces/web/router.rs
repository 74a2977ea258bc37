use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use super::AppState;
use super::handlers;

pub(crate) fn build_api_router(state: AppState) -> Router {
    // Any interactive client may satisfy the HTTP contract, so CORS stays
    // permissive.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(handlers::chat_endpoint))
        .route("/api/todos", get(handlers::list_todos_endpoint))
        .layer(cors)
        .with_state(state)
}

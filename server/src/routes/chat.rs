use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::handlers::auth_handlers::me;
use crate::handlers::chat_handlers::{chat, new_chat, reply, start};
use crate::middleware::auth_middleware::auth_middleware;
use crate::state::AppState;

/// Routes that need a logged-in user.
pub fn chat_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/start", post(start))
        .route("/chat", get(chat).post(reply))
        .route("/new-chat", post(new_chat))
        .layer(from_fn_with_state(state, auth_middleware))
}

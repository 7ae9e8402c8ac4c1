pub mod auth;
pub mod chat;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::service_handler::{analyze, health};
use crate::state::AppState;
use auth::auth_routes;
use chat::chat_routes;

pub fn create_app(state: AppState, client_url: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(client_url)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::COOKIE])
        .allow_credentials(true);

    let api = chat_routes(state.clone()).route("/analyze", post(analyze));

    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes())
        .nest("/api", api)
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

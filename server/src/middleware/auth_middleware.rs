use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::errors::ErrorKind;
use tower_cookies::Cookies;
use tracing::debug;

use crate::handlers::jwt::TOKEN_COOKIE;
use crate::models::user::User;
use crate::state::AppState;

/// Resolves the session cookie to a [`User`] and stores it in the request
/// extensions. Requires `CookieManagerLayer` further out.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let cookies = match req.extensions().get::<Cookies>() {
        Some(c) => c.clone(),
        None => return (StatusCode::UNAUTHORIZED, "Cookie manager missing").into_response(),
    };

    let token = match cookies.get(TOKEN_COOKIE) {
        Some(c) => c.value().to_string(),
        None => return (StatusCode::UNAUTHORIZED, "Session token not found").into_response(),
    };

    let data = match state.jwt.verify_token(&token) {
        Ok(d) => d,
        Err(e) => {
            debug!(error = %e, "rejected session token");
            let msg = match *e.kind() {
                ErrorKind::ExpiredSignature => "Session expired. Please log in again.",
                _ => "Invalid session token",
            };
            return (StatusCode::UNAUTHORIZED, msg).into_response();
        }
    };

    let user = match sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE id = ?")
        .bind(&data.claims.sub)
        .fetch_optional(&state.pool)
        .await
    {
        Ok(Some(u)) => u,
        Ok(None) | Err(_) => return (StatusCode::UNAUTHORIZED, "User not found").into_response(),
    };

    req.extensions_mut().insert(user);
    next.run(req).await
}

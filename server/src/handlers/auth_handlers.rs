use axum::{
    extract::{Json, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::task;
use tower_cookies::Cookies;
use tracing::{error, info};
use uuid::Uuid;

use super::jwt::{expired_cookie, session_cookie, TOKEN_COOKIE};
use crate::models::user::{User, UserCredentials};
use crate::state::AppState;

const BCRYPT_COST: u32 = 10;
const MIN_USERNAME_CHARS: usize = 3;
const MIN_PASSWORD_CHARS: usize = 6;

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "message": message })))
}

#[derive(Deserialize)]
pub struct CredentialsPayload {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn validate_registration(payload: &CredentialsPayload) -> Result<(), &'static str> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err("Username and password are required!");
    }
    if payload.username.chars().count() < MIN_USERNAME_CHARS {
        return Err("Username must be at least 3 characters long!");
    }
    if payload.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err("Password must be at least 6 characters long!");
    }
    Ok(())
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<StatusCode, ApiError> {
    validate_registration(&payload).map_err(|msg| api_error(StatusCode::BAD_REQUEST, msg))?;

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(&payload.username)
        .fetch_one(&state.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "user lookup failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Registration failed. Please try again.")
        })?;
    if existing > 0 {
        return Err(api_error(StatusCode::BAD_REQUEST, "Username already exists!"));
    }

    let password = payload.password.clone();
    let password_hash = task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| e.to_string())
        .and_then(|hashed| hashed.map_err(|e| e.to_string()))
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Registration failed. Please try again.")
        })?;

    sqlx::query("INSERT INTO users (id, username, password_hash) VALUES (?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(&payload.username)
        .bind(password_hash)
        .execute(&state.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "user insert failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Registration failed. Please try again.")
        })?;

    info!(username = %payload.username, "registered user");
    Ok(StatusCode::CREATED)
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Response, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Username and password are required!"));
    }
    let invalid = || api_error(StatusCode::UNAUTHORIZED, "Invalid username or password.");

    let user = sqlx::query_as::<_, UserCredentials>(
        "SELECT id, username, password_hash FROM users WHERE username = ?",
    )
    .bind(&payload.username)
    .fetch_optional(&state.pool)
    .await
    .map_err(|e| {
        error!(error = %e, "user lookup failed");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Login failed. Please try again.")
    })?
    .ok_or_else(invalid)?;

    let password = payload.password.clone();
    let hash = user.password_hash.clone();
    let verified = task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| {
            error!(error = %e, "password check failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Login failed. Please try again.")
        })?
        .unwrap_or(false);
    if !verified {
        return Err(invalid());
    }

    let token = state.jwt.generate_token(&user.id).map_err(|e| {
        error!(error = %e, "token signing failed");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Login failed. Please try again.")
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(&token).parse().map_err(|_| {
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Login failed. Please try again.")
        })?,
    );

    info!(username = %user.username, "user logged in");
    let body = Json(json!({ "message": "Login successful" }));
    Ok((headers, body).into_response())
}

#[derive(serde::Serialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
}

pub async fn me(Extension(user): Extension<User>) -> Json<Profile> {
    Json(Profile {
        id: user.id,
        username: user.username,
    })
}

/// Clears the cookie and, while the token is still valid, the chat session.
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Response {
    if let Some(cookie) = cookies.get(TOKEN_COOKIE) {
        if let Ok(data) = state.jwt.verify_token(cookie.value()) {
            state.sessions.remove(&data.claims.sub);
        }
    }

    let mut headers = HeaderMap::new();
    if let Ok(value) = expired_cookie().parse() {
        headers.insert(header::SET_COOKIE, value);
    }

    let body = Json(json!({ "message": "logged out successfully" }));
    (headers, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(username: &str, password: &str) -> CredentialsPayload {
        CredentialsPayload {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn registration_rules() {
        assert_eq!(
            validate_registration(&payload("", "secret1")),
            Err("Username and password are required!")
        );
        assert_eq!(
            validate_registration(&payload("ab", "secret1")),
            Err("Username must be at least 3 characters long!")
        );
        assert_eq!(
            validate_registration(&payload("abc", "12345")),
            Err("Password must be at least 6 characters long!")
        );
        assert_eq!(validate_registration(&payload("abc", "123456")), Ok(()));
    }
}

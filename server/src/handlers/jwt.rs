use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

pub const TOKEN_COOKIE: &str = "pagechat_token";
pub const TOKEN_TTL_SECS: i64 = 86_400;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Signing keys derived from the configured secret.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn generate_token(&self, user_id: &str) -> jsonwebtoken::errors::Result<String> {
        let exp = (Utc::now() + Duration::seconds(TOKEN_TTL_SECS)).timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            exp,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    pub fn verify_token(&self, token: &str) -> jsonwebtoken::errors::Result<TokenData<Claims>> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
    }
}

pub fn session_cookie(token: &str) -> String {
    format!("{TOKEN_COOKIE}={token}; HttpOnly; Path=/; Max-Age={TOKEN_TTL_SECS}")
}

pub fn expired_cookie() -> String {
    format!("{TOKEN_COOKIE}=; HttpOnly; Path=/; Max-Age=0")
}

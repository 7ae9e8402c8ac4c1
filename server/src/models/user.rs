use serde::{Deserialize, Serialize};

/// The authenticated caller, inserted into request extensions by the auth
/// middleware.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

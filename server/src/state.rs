use dashmap::DashMap;
use page_extractor::assistant::ReplyGenerator;
use page_extractor::Extractor;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::handlers::jwt::JwtKeys;
use crate::models::session::ChatSession;

// user id -> page under discussion
pub type SessionStore = Arc<DashMap<String, ChatSession>>;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub sessions: SessionStore,
    pub extractor: Arc<Extractor>,
    pub assistant: Arc<dyn ReplyGenerator>,
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        extractor: Extractor,
        assistant: Arc<dyn ReplyGenerator>,
        jwt: JwtKeys,
    ) -> Self {
        AppState {
            pool,
            sessions: Arc::new(DashMap::new()),
            extractor: Arc::new(extractor),
            assistant,
            jwt: Arc::new(jwt),
        }
    }
}

//! JSON backend: accounts, per-user chat sessions about one extracted
//! webpage, and the public analyze endpoint.

pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

pub use routes::create_app;
pub use state::AppState;

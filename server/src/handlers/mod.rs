pub mod auth_handlers;
pub mod chat_handlers;
pub mod jwt;
pub mod service_handler;

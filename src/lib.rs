pub mod analytics;
pub mod api_router;
pub mod auth;
pub mod config;
pub mod escalation;
pub mod events;
pub mod guides;
pub mod security;
pub mod session;
pub mod shared;
pub mod store;

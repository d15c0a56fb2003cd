//! API layer - HTTP handlers and middleware
//!
//! Handlers are thin: they extract the acting staff member and the
//! validated payload, then call a service through [`AppState`].

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;

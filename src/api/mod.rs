//! API layer - the JSON HTTP surface
//!
//! Public feed and auth routes, session-only routes (messages, profile,
//! submission) and the admin console, plus the session middleware and
//! the validating JSON extractor they share.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;

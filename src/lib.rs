//! Blog API - a moderated blog with categories, direct messages, and an
//! admin console, served as a JSON HTTP API.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, posts and their moderation states, categories, messages
//! - **services**: Application use cases and business logic
//! - **infra**: Database, migrations, repositories, Unit of Work
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Bootstrap an administrator
//! cargo run -- create-admin --email root@example.com --password 'change-me-now'
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, PostStatus, User, UserRole};
pub use errors::{AppError, AppResult};

//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and repositories to fulfil the
//! application's use cases. Each is a trait with one Unit-of-Work-backed
//! implementation, so handlers depend on abstractions only.

mod admin_service;
mod auth_service;
mod category_service;
pub mod container;
mod message_service;
mod post_service;
mod user_service;

#[cfg(test)]
mod test_support;

// Service Container
pub use container::{parallel, ServiceContainer, Services};

// Service traits and implementations
pub use admin_service::{AdminManager, AdminService, DashboardStats, PostCounts, ResetSummary};
pub use auth_service::{normalize_email, AuthService, Authenticator, Claims, TokenResponse};
pub use category_service::{CategoryManager, CategoryService};
pub use message_service::{MessageManager, MessageService};
pub use post_service::{PostManager, PostService, Viewer};
pub use user_service::{AdminProvisioning, UserManager, UserService};

//! HTTP request handlers.

pub mod admin_handler;
pub mod auth_handler;
pub mod category_handler;
pub mod message_handler;
pub mod post_handler;
pub mod user_handler;

pub use admin_handler::admin_routes;
pub use auth_handler::auth_routes;
pub use category_handler::category_routes;
pub use message_handler::message_routes;
pub use post_handler::post_routes;
pub use user_handler::user_routes;

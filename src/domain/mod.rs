//! Domain layer - Core business entities and rules
//!
//! Users and roles, posts and their moderation state machine,
//! categories, and direct messages with conversation aggregation.

pub mod category;
pub mod message;
pub mod password;
pub mod post;
pub mod user;

pub use category::{
    normalize_category_name, Category, CategoryResponse, CategoryUsage, CategoryUsageResponse,
};
pub use message::{
    latest_per_counterpart, Conversation, ConversationResponse, Message, MessageResponse,
};
pub use password::Password;
pub use post::{NewPost, Post, PostResponse, PostStatus, PostView};
pub use user::{ProfileResponse, ProfileUpdate, User, UserResponse, UserRole};

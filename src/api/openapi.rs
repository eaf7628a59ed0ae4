//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, auth_handler, category_handler, message_handler, post_handler, user_handler,
};
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{
    CategoryResponse, CategoryUsageResponse, ConversationResponse, MessageResponse,
    PostResponse, PostStatus, ProfileResponse, UserResponse, UserRole,
};
use crate::services::{DashboardStats, PostCounts, ResetSummary, TokenResponse};
use crate::types::{PaginatedPosts, PaginationMeta};

/// OpenAPI documentation for the blog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog API",
        version = "0.1.0",
        description = "Moderated blog with categories, direct messages, and an admin console",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        auth_handler::me,
        // Post endpoints
        post_handler::list_posts,
        post_handler::get_post,
        post_handler::create_post,
        post_handler::my_posts,
        // Category endpoints
        category_handler::list_categories,
        // User endpoints
        user_handler::get_profile,
        user_handler::user_posts,
        user_handler::update_me,
        // Message endpoints
        message_handler::list_conversations,
        message_handler::get_thread,
        message_handler::send_message,
        // Admin endpoints
        admin_handler::stats,
        admin_handler::list_users,
        admin_handler::change_role,
        admin_handler::delete_user,
        admin_handler::list_posts,
        admin_handler::approve_post,
        admin_handler::reject_post,
        admin_handler::delete_post,
        admin_handler::list_categories,
        admin_handler::create_category,
        admin_handler::rename_category,
        admin_handler::delete_category,
        admin_handler::reset_data,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            ProfileResponse,
            PostStatus,
            PostResponse,
            CategoryResponse,
            CategoryUsageResponse,
            MessageResponse,
            ConversationResponse,
            PaginatedPosts,
            PaginationMeta,
            // Service types
            TokenResponse,
            DashboardStats,
            PostCounts,
            ResetSummary,
            // Request types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            post_handler::CreatePostRequest,
            user_handler::UpdateProfileRequest,
            message_handler::SendMessageRequest,
            admin_handler::CategoryRequest,
            admin_handler::ChangeRoleRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, and sessions"),
        (name = "Posts", description = "Published posts and submission"),
        (name = "Categories", description = "Post categories"),
        (name = "Users", description = "Public profiles and profile editing"),
        (name = "Messages", description = "Direct messages between users"),
        (name = "Admin", description = "Moderation and management, ADMIN role only")
    )
)]
pub struct ApiDoc;

/// Security schemes: bearer header or session cookie
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token obtained from /auth/login"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
            );
        }
    }
}

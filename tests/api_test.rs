//! Integration tests for API endpoints.
//!
//! The router is driven end to end with in-memory service fakes, so no
//! database is needed. Two sessions exist: `admin-token` and `user-token`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use blog_api::api::{create_router, AppState};
use blog_api::domain::{
    Category, CategoryUsage, Conversation, Message, NewPost, Post, PostStatus, PostView,
    ProfileUpdate, User, UserRole,
};
use blog_api::errors::{AppError, AppResult};
use blog_api::infra::Database;
use blog_api::services::{
    AdminProvisioning, AdminService, AuthService, CategoryService, Claims, DashboardStats,
    MessageService, PostCounts, PostService, ResetSummary, ServiceContainer, TokenResponse,
    UserService, Viewer,
};
use blog_api::types::{Paginated, PaginationParams};

const ADMIN_ID: Uuid = Uuid::from_u128(1);
const USER_ID: Uuid = Uuid::from_u128(2);
const PENDING_POST_ID: Uuid = Uuid::from_u128(10);
const APPROVED_POST_ID: Uuid = Uuid::from_u128(11);

fn account(id: Uuid) -> Option<User> {
    let (name, email, role) = if id == ADMIN_ID {
        ("Grace", "grace@example.com", UserRole::Admin)
    } else if id == USER_ID {
        ("Ada", "ada@example.com", UserRole::User)
    } else {
        return None;
    };
    let mut user = User::new(id, name.into(), email.into(), "hashed".into());
    user.role = role;
    Some(user)
}

fn stored_post(id: Uuid) -> Option<PostView> {
    let status = if id == PENDING_POST_ID {
        PostStatus::Pending
    } else if id == APPROVED_POST_ID {
        PostStatus::Approved
    } else {
        return None;
    };
    Some(PostView {
        post: Post {
            id,
            title: "Notes on the Analytical Engine".into(),
            content: "It weaves algebraic patterns.".into(),
            image_url: None,
            status,
            author_id: USER_ID,
            category_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
        author_name: "Ada".into(),
        category_name: None,
    })
}

// =============================================================================
// Service fakes
// =============================================================================

struct FakeAuth;

#[async_trait]
impl AuthService for FakeAuth {
    async fn register(&self, name: String, email: String, _password: String) -> AppResult<User> {
        if email == "taken@example.com" {
            return Err(AppError::conflict("User"));
        }
        Ok(User::new(Uuid::new_v4(), name, email, "hashed".into()))
    }

    async fn login(&self, _email: String, password: String) -> AppResult<TokenResponse> {
        if password != "correct-horse" {
            return Err(AppError::InvalidCredentials);
        }
        Ok(TokenResponse {
            access_token: "user-token".into(),
            token_type: "Bearer".into(),
            expires_in: 3600,
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let sub = match token {
            "admin-token" => ADMIN_ID,
            "user-token" => USER_ID,
            _ => return Err(AppError::Unauthorized),
        };
        let user = account(sub).ok_or(AppError::Unauthorized)?;
        Ok(Claims {
            sub,
            email: user.email,
            role: user.role.into(),
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        })
    }
}

struct FakeUsers;

#[async_trait]
impl UserService for FakeUsers {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        account(id).ok_or(AppError::NotFound)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileUpdate) -> AppResult<User> {
        let mut user = self.get_user(id).await?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        user.bio = changes.bio;
        Ok(user)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok([ADMIN_ID, USER_ID].into_iter().filter_map(account).collect())
    }

    async fn change_role(&self, actor_id: Uuid, target_id: Uuid, role: UserRole) -> AppResult<User> {
        if actor_id == target_id {
            return Err(AppError::validation("You cannot change your own role"));
        }
        let mut user = self.get_user(target_id).await?;
        user.role = role;
        Ok(user)
    }

    async fn delete_user(&self, actor_id: Uuid, target_id: Uuid) -> AppResult<()> {
        if actor_id == target_id {
            return Err(AppError::validation("You cannot delete your own account"));
        }
        self.get_user(target_id).await.map(|_| ())
    }

    async fn promote_or_create_admin(
        &self,
        _name: String,
        _email: String,
        _password: String,
    ) -> AppResult<(User, AdminProvisioning)> {
        Err(AppError::internal("not served over HTTP"))
    }
}

struct FakePosts;

#[async_trait]
impl PostService for FakePosts {
    async fn submit(&self, author_id: Uuid, post: NewPost) -> AppResult<PostView> {
        Ok(PostView {
            post: Post {
                id: Uuid::new_v4(),
                title: post.title,
                content: post.content,
                image_url: post.image_url,
                status: PostStatus::Pending,
                author_id,
                category_id: post.category_id,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            author_name: "Ada".into(),
            category_name: None,
        })
    }

    async fn get_visible(&self, id: Uuid, viewer: Viewer) -> AppResult<PostView> {
        stored_post(id)
            .filter(|view| view.post.is_visible_to(viewer.id, viewer.is_admin))
            .ok_or(AppError::NotFound)
    }

    async fn list_published(
        &self,
        _category_id: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<Paginated<PostView>> {
        let data: Vec<PostView> = stored_post(APPROVED_POST_ID).into_iter().collect();
        let total = data.len() as u64;
        Ok(Paginated::new(data, params, total))
    }

    async fn list_by_author(&self, author_id: Uuid, viewer_id: Option<Uuid>) -> AppResult<Vec<PostView>> {
        Ok([PENDING_POST_ID, APPROVED_POST_ID]
            .into_iter()
            .filter_map(stored_post)
            .filter(|view| view.post.author_id == author_id)
            .filter(|view| viewer_id == Some(author_id) || view.post.is_published())
            .collect())
    }

    async fn list_for_moderation(
        &self,
        status: PostStatus,
        params: PaginationParams,
    ) -> AppResult<Paginated<PostView>> {
        let data: Vec<PostView> = [PENDING_POST_ID, APPROVED_POST_ID]
            .into_iter()
            .filter_map(stored_post)
            .filter(|view| view.post.status == status)
            .collect();
        let total = data.len() as u64;
        Ok(Paginated::new(data, params, total))
    }

    async fn approve(&self, _moderator_id: Uuid, id: Uuid) -> AppResult<PostView> {
        let mut view = stored_post(id).ok_or(AppError::NotFound)?;
        view.post.status = view.post.status.transition_to(PostStatus::Approved)?;
        Ok(view)
    }

    async fn reject(&self, _moderator_id: Uuid, id: Uuid) -> AppResult<PostView> {
        let mut view = stored_post(id).ok_or(AppError::NotFound)?;
        view.post.status = view.post.status.transition_to(PostStatus::Rejected)?;
        Ok(view)
    }

    async fn delete(&self, _moderator_id: Uuid, id: Uuid) -> AppResult<()> {
        stored_post(id).map(|_| ()).ok_or(AppError::NotFound)
    }
}

struct FakeCategories;

fn category(name: &str) -> Category {
    Category {
        id: Uuid::new_v4(),
        name: name.into(),
        created_at: Utc::now(),
    }
}

#[async_trait]
impl CategoryService for FakeCategories {
    async fn list(&self) -> AppResult<Vec<Category>> {
        Ok(vec![category("Engineering"), category("Travel")])
    }

    async fn list_with_usage(&self) -> AppResult<Vec<CategoryUsage>> {
        Ok(vec![CategoryUsage {
            category: category("Engineering"),
            post_count: 3,
        }])
    }

    async fn create(&self, name: String) -> AppResult<Category> {
        Ok(category(&name))
    }

    async fn rename(&self, id: Uuid, name: String) -> AppResult<Category> {
        Ok(Category {
            id,
            ..category(&name)
        })
    }

    async fn delete(&self, _id: Uuid) -> AppResult<()> {
        Err(AppError::invalid_state("Category is still in use"))
    }
}

struct FakeMessages;

#[async_trait]
impl MessageService for FakeMessages {
    async fn send(&self, sender_id: Uuid, recipient_id: Uuid, content: String) -> AppResult<Message> {
        Ok(Message {
            id: Uuid::new_v4(),
            content,
            sender_id,
            recipient_id,
            created_at: Utc::now(),
        })
    }

    async fn conversations(&self, _user_id: Uuid) -> AppResult<Vec<Conversation>> {
        Ok(vec![])
    }

    async fn thread(&self, _user_id: Uuid, _other_id: Uuid) -> AppResult<Vec<Message>> {
        Ok(vec![])
    }
}

struct FakeAdmin;

#[async_trait]
impl AdminService for FakeAdmin {
    async fn stats(&self) -> AppResult<DashboardStats> {
        Ok(DashboardStats {
            users: 2,
            categories: 2,
            messages: 0,
            posts: PostCounts {
                pending: 1,
                approved: 1,
                rejected: 0,
                total: 2,
            },
        })
    }

    async fn reset_data(&self, _admin_id: Uuid) -> AppResult<ResetSummary> {
        Ok(ResetSummary::default())
    }
}

struct FakeServices;

impl ServiceContainer for FakeServices {
    fn auth(&self) -> Arc<dyn AuthService> {
        Arc::new(FakeAuth)
    }

    fn users(&self) -> Arc<dyn UserService> {
        Arc::new(FakeUsers)
    }

    fn posts(&self) -> Arc<dyn PostService> {
        Arc::new(FakePosts)
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        Arc::new(FakeCategories)
    }

    fn messages(&self) -> Arc<dyn MessageService> {
        Arc::new(FakeMessages)
    }

    fn admin(&self) -> Arc<dyn AdminService> {
        Arc::new(FakeAdmin)
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn app() -> Router {
    let connection = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let database = Arc::new(Database::from_connection(connection));
    create_router(AppState::new(&FakeServices, database))
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn test_root_endpoint_returns_welcome_message() {
    let response = app()
        .oneshot(request(Method::GET, "/", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Welcome to the blog API");
}

#[tokio::test]
async fn test_published_feed_is_public() {
    let (status, body) = send(request(Method::GET, "/posts", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["status"], "APPROVED");
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn test_categories_are_public() {
    let (status, body) = send(request(Method::GET, "/categories", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_register_returns_created_user() {
    let payload = json!({ "name": "Ada", "email": "ada@example.com", "password": "correct-horse" });
    let (status, body) = send(request(Method::POST, "/auth/register", None, Some(payload))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["role"], "USER");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let payload = json!({ "name": "Ada", "email": "taken@example.com", "password": "correct-horse" });
    let (status, body) = send(request(Method::POST, "/auth/register", None, Some(payload))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_short_password_is_rejected() {
    let payload = json!({ "name": "Ada", "email": "ada@example.com", "password": "short" });
    let (status, body) = send(request(Method::POST, "/auth/register", None, Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let payload = json!({ "email": "ada@example.com", "password": "correct-horse" });
    let response = app()
        .oneshot(request(Method::POST, "/auth/login", None, Some(payload)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session=user-token"));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let payload = json!({ "email": "ada@example.com", "password": "wrong-horse" });
    let (status, body) = send(request(Method::POST, "/auth/login", None, Some(payload))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/logout")
        .header(header::COOKIE, "session=user-token")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("session=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_me_requires_session() {
    let (status, body) = send(request(Method::GET, "/auth/me", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_me_with_bearer_token() {
    let (status, body) = send(request(Method::GET, "/auth/me", Some("user-token"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ada");
}

#[tokio::test]
async fn test_me_with_session_cookie() {
    let request = Request::builder()
        .uri("/auth/me")
        .header(header::COOKIE, "session=admin-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "ADMIN");
}

#[tokio::test]
async fn test_unknown_token_is_anonymous() {
    let (status, _) = send(request(Method::GET, "/auth/me", Some("forged"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Public routes keep working with a stale token
    let (status, _) = send(request(Method::GET, "/posts", Some("forged"), None)).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Posts
// =============================================================================

#[tokio::test]
async fn test_pending_post_hidden_from_anonymous() {
    let uri = format!("/posts/{PENDING_POST_ID}");
    let (status, _) = send(request(Method::GET, &uri, None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pending_post_visible_to_author() {
    let uri = format!("/posts/{PENDING_POST_ID}");
    let (status, body) = send(request(Method::GET, &uri, Some("user-token"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PENDING");
}

#[tokio::test]
async fn test_create_post_requires_session() {
    let payload = json!({ "title": "Hello", "content": "World" });
    let (status, _) = send(request(Method::POST, "/posts", None, Some(payload))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_post_starts_pending() {
    let payload = json!({ "title": "Hello", "content": "World" });
    let (status, body) = send(request(Method::POST, "/posts", Some("user-token"), Some(payload))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["author_id"], USER_ID.to_string());
}

#[tokio::test]
async fn test_author_posts_hide_pending_from_others() {
    let uri = format!("/users/{USER_ID}/posts");

    let (_, body) = send(request(Method::GET, &uri, None, None)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send(request(Method::GET, &uri, Some("user-token"), None)).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_my_posts_include_pending() {
    let (status, body) = send(request(Method::GET, "/posts/mine", Some("user-token"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send(request(Method::GET, "/posts/mine", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_own_profile() {
    let payload = json!({ "name": "Ada King", "bio": "Mathematician" });
    let (status, body) = send(request(Method::PUT, "/users/me", Some("user-token"), Some(payload.clone()))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], USER_ID.to_string());
    assert_eq!(body["name"], "Ada King");
    assert_eq!(body["bio"], "Mathematician");

    let (status, _) = send(request(Method::PUT, "/users/me", None, Some(payload))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Messages
// =============================================================================

#[tokio::test]
async fn test_messages_require_session() {
    let (status, _) = send(request(Method::GET, "/messages", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_send_message() {
    let payload = json!({ "recipient_id": ADMIN_ID, "content": "Hi Grace" });
    let (status, body) = send(request(Method::POST, "/messages", Some("user-token"), Some(payload))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sender_id"], USER_ID.to_string());
    assert_eq!(body["content"], "Hi Grace");
}

#[tokio::test]
async fn test_list_conversations() {
    let (status, body) = send(request(Method::GET, "/messages", Some("user-token"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_thread_with_user() {
    let uri = format!("/messages/{ADMIN_ID}");
    let (status, body) = send(request(Method::GET, &uri, Some("user-token"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());

    let (status, _) = send(request(Method::GET, &uri, None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Admin console
// =============================================================================

#[tokio::test]
async fn test_admin_requires_admin_role() {
    let (status, _) = send(request(Method::GET, "/admin/stats", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(request(Method::GET, "/admin/stats", Some("user-token"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_admin_stats() {
    let (status, body) = send(request(Method::GET, "/admin/stats", Some("admin-token"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], 2);
    assert_eq!(body["posts"]["pending"], 1);
}

#[tokio::test]
async fn test_admin_cannot_change_own_role() {
    let uri = format!("/admin/users/{ADMIN_ID}/role");
    let payload = json!({ "role": "USER" });
    let (status, body) = send(request(Method::PUT, &uri, Some("admin-token"), Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_admin_promotes_user() {
    let uri = format!("/admin/users/{USER_ID}/role");
    let payload = json!({ "role": "ADMIN" });
    let (status, body) = send(request(Method::PUT, &uri, Some("admin-token"), Some(payload))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "ADMIN");
}

#[tokio::test]
async fn test_unknown_role_is_rejected() {
    let uri = format!("/admin/users/{USER_ID}/role");
    let payload = json!({ "role": "SUPERUSER" });
    let (status, _) = send(request(Method::PUT, &uri, Some("admin-token"), Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_category_name_with_symbols_is_rejected() {
    let payload = json!({ "name": "<script>" });
    let (status, body) = send(request(Method::POST, "/admin/categories", Some("admin-token"), Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_category() {
    let payload = json!({ "name": "Science & Tech" });
    let (status, body) = send(request(Method::POST, "/admin/categories", Some("admin-token"), Some(payload))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Science & Tech");
}

#[tokio::test]
async fn test_delete_category_in_use_conflicts() {
    let uri = format!("/admin/categories/{}", Uuid::new_v4());
    let (status, body) = send(request(Method::DELETE, &uri, Some("admin-token"), None)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_moderation_queue_defaults_to_pending() {
    let (status, body) = send(request(Method::GET, "/admin/posts", Some("admin-token"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["status"], "PENDING");
}

#[tokio::test]
async fn test_approve_pending_post() {
    let uri = format!("/admin/posts/{PENDING_POST_ID}/approve");
    let (status, body) = send(request(Method::POST, &uri, Some("admin-token"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "APPROVED");
}

#[tokio::test]
async fn test_approve_already_moderated_post_conflicts() {
    let uri = format!("/admin/posts/{APPROVED_POST_ID}/approve");
    let (status, body) = send(request(Method::POST, &uri, Some("admin-token"), None)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_reject_pending_post() {
    let uri = format!("/admin/posts/{PENDING_POST_ID}/reject");
    let (status, body) = send(request(Method::POST, &uri, Some("admin-token"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "REJECTED");
}

#[tokio::test]
async fn test_reject_published_post_conflicts() {
    let uri = format!("/admin/posts/{APPROVED_POST_ID}/reject");
    let (status, body) = send(request(Method::POST, &uri, Some("admin-token"), None)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_admin_deletes_user() {
    let uri = format!("/admin/users/{USER_ID}");
    let (status, _) = send(request(Method::DELETE, &uri, Some("admin-token"), None)).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let uri = format!("/admin/users/{ADMIN_ID}");
    let (status, body) = send(request(Method::DELETE, &uri, Some("admin-token"), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_rename_category() {
    let id = Uuid::new_v4();
    let uri = format!("/admin/categories/{id}");
    let payload = json!({ "name": "Science" });
    let (status, body) = send(request(Method::PUT, &uri, Some("admin-token"), Some(payload))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["name"], "Science");
}

#[tokio::test]
async fn test_reset_data() {
    let (status, body) = send(request(Method::POST, "/admin/reset", Some("admin-token"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages_deleted"], 0);
    assert_eq!(body["users_deleted"], 0);

    let (status, _) = send(request(Method::POST, "/admin/reset", Some("user-token"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

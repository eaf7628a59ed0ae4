//! Post domain entity and the moderation state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{STATUS_APPROVED, STATUS_PENDING, STATUS_REJECTED};
use crate::errors::{AppError, AppResult};

/// Moderation status of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostStatus {
    /// Awaiting moderation
    Pending,
    /// Publicly visible
    Approved,
    /// Hidden, visible to its author only
    Rejected,
}

impl PostStatus {
    pub const ALL: [PostStatus; 3] = [PostStatus::Pending, PostStatus::Approved, PostStatus::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Pending => STATUS_PENDING,
            PostStatus::Approved => STATUS_APPROVED,
            PostStatus::Rejected => STATUS_REJECTED,
        }
    }

    /// Validate a moderation decision.
    ///
    /// Only a pending post can be decided, and only to approved or rejected.
    pub fn transition_to(self, target: PostStatus) -> AppResult<PostStatus> {
        match (self, target) {
            (PostStatus::Pending, PostStatus::Approved | PostStatus::Rejected) => Ok(target),
            (PostStatus::Pending, PostStatus::Pending) => Err(AppError::invalid_state(
                "Post is already pending moderation",
            )),
            (current, _) => Err(AppError::invalid_state(format!(
                "Post has already been moderated ({})",
                current.as_str()
            ))),
        }
    }
}

impl From<&str> for PostStatus {
    fn from(s: &str) -> Self {
        match s {
            STATUS_APPROVED => PostStatus::Approved,
            STATUS_REJECTED => PostStatus::Rejected,
            _ => PostStatus::Pending,
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub status: PostStatus,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Approved
    }

    /// Approved posts are public; anything else is limited to its
    /// author and to admins.
    pub fn is_visible_to(&self, viewer_id: Option<Uuid>, viewer_is_admin: bool) -> bool {
        self.is_published() || viewer_is_admin || viewer_id == Some(self.author_id)
    }
}

/// Submission data for a new post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Post joined with the names needed to display it
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    pub author_name: String,
    pub category_name: Option<String>,
}

/// Post as returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostResponse {
    pub id: Uuid,
    #[schema(example = "Notes on the Analytical Engine")]
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub status: PostStatus,
    pub author_id: Uuid,
    #[schema(example = "Ada Lovelace")]
    pub author_name: String,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PostView> for PostResponse {
    fn from(view: PostView) -> Self {
        let PostView {
            post,
            author_name,
            category_name,
        } = view;
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            image_url: post.image_url,
            status: post.status,
            author_id: post.author_id,
            author_name,
            category_id: post.category_id,
            category_name,
            created_at: post.created_at,
        }
    }
}

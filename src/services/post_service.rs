//! Post service - submission, visibility, and moderation.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewPost, PostStatus, PostView};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Who is looking at a post, as far as visibility is concerned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewer {
    pub id: Option<Uuid>,
    pub is_admin: bool,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(id: Uuid, is_admin: bool) -> Self {
        Self {
            id: Some(id),
            is_admin,
        }
    }
}

#[async_trait]
pub trait PostService: Send + Sync {
    /// Submit a post for moderation; it starts out PENDING
    async fn submit(&self, author_id: Uuid, post: NewPost) -> AppResult<PostView>;

    /// Fetch a post if `viewer` may see it; hidden posts read as missing
    async fn get_visible(&self, id: Uuid, viewer: Viewer) -> AppResult<PostView>;

    /// Approved posts, newest first
    async fn list_published(
        &self,
        category_id: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<Paginated<PostView>>;

    /// An author's posts; every status for the author, approved only for others
    async fn list_by_author(&self, author_id: Uuid, viewer_id: Option<Uuid>)
        -> AppResult<Vec<PostView>>;

    /// Admin queue filtered by status
    async fn list_for_moderation(
        &self,
        status: PostStatus,
        params: PaginationParams,
    ) -> AppResult<Paginated<PostView>>;

    async fn approve(&self, moderator_id: Uuid, id: Uuid) -> AppResult<PostView>;

    async fn reject(&self, moderator_id: Uuid, id: Uuid) -> AppResult<PostView>;

    async fn delete(&self, moderator_id: Uuid, id: Uuid) -> AppResult<()>;
}

pub struct PostManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PostManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn moderate(&self, moderator_id: Uuid, id: Uuid, target: PostStatus) -> AppResult<PostView> {
        let current = self.uow.posts().find_by_id(id).await?.ok_or_not_found()?;
        let next = current.post.status.transition_to(target)?;

        let updated = self
            .uow
            .posts()
            .update_status(id, current.post.status, next)
            .await?;
        tracing::info!(%moderator_id, post_id = %id, status = %next, "Post moderated");
        Ok(updated)
    }
}

fn required(value: String, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl<U: UnitOfWork> PostService for PostManager<U> {
    async fn submit(&self, author_id: Uuid, post: NewPost) -> AppResult<PostView> {
        let post = NewPost {
            title: required(post.title, "Title")?,
            content: required(post.content, "Content")?,
            image_url: post
                .image_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            category_id: post.category_id,
        };

        if let Some(category_id) = post.category_id {
            if self.uow.categories().find_by_id(category_id).await?.is_none() {
                return Err(AppError::validation("Unknown category"));
            }
        }

        let created = self.uow.posts().create(author_id, post).await?;
        tracing::info!(post_id = %created.id, %author_id, "Post submitted for moderation");

        self.uow.posts().find_by_id(created.id).await?.ok_or_not_found()
    }

    async fn get_visible(&self, id: Uuid, viewer: Viewer) -> AppResult<PostView> {
        let view = self.uow.posts().find_by_id(id).await?.ok_or_not_found()?;

        if !view.post.is_visible_to(viewer.id, viewer.is_admin) {
            return Err(AppError::NotFound);
        }
        Ok(view)
    }

    async fn list_published(
        &self,
        category_id: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<Paginated<PostView>> {
        let (rows, total) = self
            .uow
            .posts()
            .list_by_status(PostStatus::Approved, category_id, params)
            .await?;
        Ok(Paginated::new(rows, params, total))
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        viewer_id: Option<Uuid>,
    ) -> AppResult<Vec<PostView>> {
        if self.uow.users().find_by_id(author_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        let status = if viewer_id == Some(author_id) {
            None
        } else {
            Some(PostStatus::Approved)
        };
        self.uow.posts().list_by_author(author_id, status).await
    }

    async fn list_for_moderation(
        &self,
        status: PostStatus,
        params: PaginationParams,
    ) -> AppResult<Paginated<PostView>> {
        let (rows, total) = self.uow.posts().list_by_status(status, None, params).await?;
        Ok(Paginated::new(rows, params, total))
    }

    async fn approve(&self, moderator_id: Uuid, id: Uuid) -> AppResult<PostView> {
        self.moderate(moderator_id, id, PostStatus::Approved).await
    }

    async fn reject(&self, moderator_id: Uuid, id: Uuid) -> AppResult<PostView> {
        self.moderate(moderator_id, id, PostStatus::Rejected).await
    }

    async fn delete(&self, moderator_id: Uuid, id: Uuid) -> AppResult<()> {
        self.uow.posts().delete(id).await?;
        tracing::info!(%moderator_id, post_id = %id, "Post deleted");
        Ok(())
    }
}

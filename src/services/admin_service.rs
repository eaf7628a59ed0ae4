//! Admin service - dashboard figures and the bulk data reset.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::container::parallel;
use crate::domain::{PostStatus, UserRole};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Post totals per moderation status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PostCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub total: u64,
}

/// Admin dashboard figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub users: u64,
    pub categories: u64,
    pub messages: u64,
    pub posts: PostCounts,
}

/// Rows removed by a data reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ResetSummary {
    pub messages_deleted: u64,
    pub posts_deleted: u64,
    pub categories_deleted: u64,
    pub users_deleted: u64,
}

#[async_trait]
pub trait AdminService: Send + Sync {
    async fn stats(&self) -> AppResult<DashboardStats>;

    /// Remove all content and every non-admin account in one transaction
    async fn reset_data(&self, admin_id: Uuid) -> AppResult<ResetSummary>;
}

pub struct AdminManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AdminManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AdminService for AdminManager<U> {
    async fn stats(&self) -> AppResult<DashboardStats> {
        let users = self.uow.users();
        let categories = self.uow.categories();
        let messages = self.uow.messages();
        let posts = self.uow.posts();

        let (users, categories, messages, by_status) = parallel::join4(
            users.count(),
            categories.count(),
            messages.count(),
            posts.count_by_status(),
        )
        .await?;

        let count_of = |status: PostStatus| by_status.get(&status).copied().unwrap_or(0);
        let posts = PostCounts {
            pending: count_of(PostStatus::Pending),
            approved: count_of(PostStatus::Approved),
            rejected: count_of(PostStatus::Rejected),
            total: by_status.values().sum(),
        };

        Ok(DashboardStats {
            users,
            categories,
            messages,
            posts,
        })
    }

    async fn reset_data(&self, admin_id: Uuid) -> AppResult<ResetSummary> {
        let summary = with_transaction!(self.uow, |ctx| {
            let content = ctx.content();
            let messages_deleted = content.delete_all_messages().await?;
            let posts_deleted = content.delete_all_posts().await?;
            let categories_deleted = content.delete_all_categories().await?;
            let users_deleted = ctx.users().delete_all_except_role(UserRole::Admin).await?;

            Ok(ResetSummary {
                messages_deleted,
                posts_deleted,
                categories_deleted,
                users_deleted,
            })
        })?;

        tracing::warn!(
            %admin_id,
            messages = summary.messages_deleted,
            posts = summary.posts_deleted,
            categories = summary.categories_deleted,
            users = summary.users_deleted,
            "Application data reset"
        );
        Ok(summary)
    }
}

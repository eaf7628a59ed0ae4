//! Post repository implementation.
//!
//! Reads return `PostView`s: the post joined with its author's name and,
//! when filed, its category's name.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::category::{self, Entity as CategoryEntity};
use super::entities::post::{self, ActiveModel, Entity as PostEntity};
use super::entities::user::{self, Entity as UserEntity};
use crate::domain::{NewPost, Post, PostStatus, PostView};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post in PENDING status
    async fn create(&self, author_id: Uuid, post: NewPost) -> AppResult<Post>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PostView>>;

    /// One page of posts with `status`, newest first, optionally in one category.
    /// Returns the page and the total number of matching posts.
    async fn list_by_status(
        &self,
        status: PostStatus,
        category_id: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<(Vec<PostView>, u64)>;

    /// Posts by one author, newest first; `status` narrows the result
    async fn list_by_author(
        &self,
        author_id: Uuid,
        status: Option<PostStatus>,
    ) -> AppResult<Vec<PostView>>;

    /// Move a post from `from` to `to` and return the updated view.
    /// Fails with `InvalidState` when the stored status is no longer `from`.
    async fn update_status(&self, id: Uuid, from: PostStatus, to: PostStatus)
        -> AppResult<PostView>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Number of posts per status; statuses without posts are absent
    async fn count_by_status(&self) -> AppResult<HashMap<PostStatus, u64>>;

    /// Number of posts filed under one category
    async fn count_by_category(&self, category_id: Uuid) -> AppResult<u64>;

    /// Number of posts per category; unused categories are absent
    async fn counts_per_category(&self) -> AppResult<HashMap<Uuid, u64>>;
}

/// Foreign key from posts to categories, as named by the migration
const CATEGORY_FK: &str = "fk_posts_category";

/// Map an insert failure. A dangling category or author reference means
/// the row was deleted after the caller checked it.
fn create_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => dangling_reference(&detail),
        _ => AppError::from(err),
    }
}

fn dangling_reference(detail: &str) -> AppError {
    if detail.contains(CATEGORY_FK) {
        AppError::validation("Unknown category")
    } else {
        // The author's account is gone, so the session no longer resolves
        AppError::Unauthorized
    }
}

pub struct PostStore {
    db: DatabaseConnection,
}

impl PostStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach category names to posts already joined with their authors.
    async fn attach_category_names(
        &self,
        rows: Vec<(post::Model, Option<user::Model>)>,
    ) -> AppResult<Vec<PostView>> {
        let mut category_ids: Vec<Uuid> = rows.iter().filter_map(|(p, _)| p.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let category_names: HashMap<Uuid, String> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            CategoryEntity::find()
                .filter(category::Column::Id.is_in(category_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|(model, author)| {
                let category_name = model
                    .category_id
                    .and_then(|id| category_names.get(&id).cloned());
                PostView {
                    post: Post::from(model),
                    author_name: author.map(|a| a.name).unwrap_or_default(),
                    category_name,
                }
            })
            .collect())
    }
}

#[async_trait]
impl PostRepository for PostStore {
    async fn create(&self, author_id: Uuid, post: NewPost) -> AppResult<Post> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(post.title),
            content: Set(post.content),
            image_url: Set(post.image_url),
            status: Set(PostStatus::Pending.to_string()),
            author_id: Set(author_id),
            category_id: Set(post.category_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(create_error)?;
        Ok(Post::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PostView>> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await?;

        match row {
            Some(row) => Ok(self.attach_category_names(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_by_status(
        &self,
        status: PostStatus,
        category_id: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<(Vec<PostView>, u64)> {
        let mut query = PostEntity::find().filter(post::Column::Status.eq(status.as_str()));
        if let Some(category_id) = category_id {
            query = query.filter(post::Column::CategoryId.eq(category_id));
        }

        let paginator = query
            .order_by_desc(post::Column::CreatedAt)
            .find_also_related(UserEntity)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(params.page_index()).await?;

        Ok((self.attach_category_names(rows).await?, total))
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        status: Option<PostStatus>,
    ) -> AppResult<Vec<PostView>> {
        let mut query = PostEntity::find().filter(post::Column::AuthorId.eq(author_id));
        if let Some(status) = status {
            query = query.filter(post::Column::Status.eq(status.as_str()));
        }

        let rows = query
            .order_by_desc(post::Column::CreatedAt)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await?;

        self.attach_category_names(rows).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: PostStatus,
        to: PostStatus,
    ) -> AppResult<PostView> {
        // Compare-and-set: only one concurrent moderation of a post can win
        let result = PostEntity::update_many()
            .col_expr(post::Column::Status, Expr::value(to.as_str()))
            .col_expr(post::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            let current = PostEntity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(AppError::NotFound)?;
            return Err(AppError::invalid_state(format!(
                "Post has already been moderated ({})",
                current.status
            )));
        }

        self.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = PostEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn count_by_status(&self) -> AppResult<HashMap<PostStatus, u64>> {
        let rows: Vec<(String, i64)> = PostEntity::find()
            .select_only()
            .column(post::Column::Status)
            .column_as(Expr::col(post::Column::Id).count(), "count")
            .group_by(post::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(status, count)| (PostStatus::from(status.as_str()), count.max(0) as u64))
            .collect())
    }

    async fn count_by_category(&self, category_id: Uuid) -> AppResult<u64> {
        Ok(PostEntity::find()
            .filter(post::Column::CategoryId.eq(category_id))
            .count(&self.db)
            .await?)
    }

    async fn counts_per_category(&self) -> AppResult<HashMap<Uuid, u64>> {
        let rows: Vec<(Uuid, i64)> = PostEntity::find()
            .select_only()
            .column(post::Column::CategoryId)
            .column_as(Expr::col(post::Column::Id).count(), "count")
            .filter(post::Column::CategoryId.is_not_null())
            .group_by(post::Column::CategoryId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (id, count.max(0) as u64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(status: PostStatus) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id: Uuid::new_v4(),
            title: "Hello".into(),
            content: "World".into(),
            image_url: None,
            status: status.to_string(),
            author_id: Uuid::new_v4(),
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_update_status_after_concurrent_moderation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([vec![model(PostStatus::Approved)]])
            .into_connection();

        let result = PostStore::new(db)
            .update_status(Uuid::new_v4(), PostStatus::Pending, PostStatus::Rejected)
            .await;

        match result {
            Err(AppError::InvalidState(message)) => assert!(message.contains("APPROVED")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_status_guards_on_expected_status() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        let store = PostStore::new(db);

        let result = store
            .update_status(Uuid::new_v4(), PostStatus::Pending, PostStatus::Approved)
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));

        let log = store.db.into_transaction_log();
        let update = &log[0].statements()[0].sql;
        assert!(update.starts_with(r#"UPDATE "posts""#));
        assert!(update.contains(r#"AND "posts"."status" = "#));
    }

    #[test]
    fn test_dangling_category_is_a_validation_error() {
        let err = dangling_reference(
            r#"insert or update on table "posts" violates foreign key constraint "fk_posts_category""#,
        );
        assert!(matches!(err, AppError::Validation(ref m) if m == "Unknown category"));
    }

    #[test]
    fn test_dangling_author_is_unauthorized() {
        let err = dangling_reference(
            r#"insert or update on table "posts" violates foreign key constraint "fk_posts_author""#,
        );
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_delete_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = PostStore::new(db).delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_existing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        tokio_test::assert_ok!(PostStore::new(db).delete(Uuid::new_v4()).await);
    }
}

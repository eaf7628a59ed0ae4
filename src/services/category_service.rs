//! Category service - the shared tag list posts are filed under.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::container::parallel;
use crate::domain::{normalize_category_name, Category, CategoryUsage};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CategoryService: Send + Sync {
    /// All categories, sorted by name
    async fn list(&self) -> AppResult<Vec<Category>>;

    /// All categories with the number of posts filed under each
    async fn list_with_usage(&self) -> AppResult<Vec<CategoryUsage>>;

    async fn create(&self, name: String) -> AppResult<Category>;

    async fn rename(&self, id: Uuid, name: String) -> AppResult<Category>;

    /// Refused while any post still references the category
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct CategoryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CategoryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Normalize a requested name and make sure no other category holds it
    async fn claim_name(&self, raw: &str, renaming: Option<Uuid>) -> AppResult<String> {
        let name = normalize_category_name(raw);
        if name.is_empty() {
            return Err(AppError::validation("Category name is required"));
        }

        match self.uow.categories().find_by_name(&name).await? {
            Some(existing) if Some(existing.id) != renaming => Err(AppError::conflict("Category")),
            _ => Ok(name),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> CategoryService for CategoryManager<U> {
    async fn list(&self) -> AppResult<Vec<Category>> {
        self.uow.categories().list().await
    }

    async fn list_with_usage(&self) -> AppResult<Vec<CategoryUsage>> {
        let categories = self.uow.categories();
        let posts = self.uow.posts();
        let (categories, mut counts) =
            parallel::join2(categories.list(), posts.counts_per_category()).await?;

        Ok(categories
            .into_iter()
            .map(|category| {
                let post_count = counts.remove(&category.id).unwrap_or(0);
                CategoryUsage {
                    category,
                    post_count,
                }
            })
            .collect())
    }

    async fn create(&self, name: String) -> AppResult<Category> {
        let name = self.claim_name(&name, None).await?;
        let category = self.uow.categories().create(name).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    async fn rename(&self, id: Uuid, name: String) -> AppResult<Category> {
        self.uow.categories().find_by_id(id).await?.ok_or_not_found()?;
        let name = self.claim_name(&name, Some(id)).await?;
        self.uow.categories().rename(id, name).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.uow.categories().find_by_id(id).await?.ok_or_not_found()?;

        let in_use = self.uow.posts().count_by_category(id).await?;
        if in_use > 0 {
            return Err(AppError::invalid_state(format!(
                "Category still has {in_use} post(s) filed under it"
            )));
        }

        self.uow.categories().delete(id).await?;
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::TestRepos;
    use chrono::Utc;
    use std::collections::HashMap;

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_name() {
        let mut repos = TestRepos::default();
        repos.categories.expect_find_by_name().returning(|_| Ok(None));
        repos
            .categories
            .expect_create()
            .withf(|name| name == "Rust tips")
            .returning(|name| Ok(category(&name)));

        let service = CategoryManager::new(repos.into_uow());
        let created = service.create("  Rust   tips ".into()).await.unwrap();

        assert_eq!(created.name, "Rust tips");
    }

    #[tokio::test]
    async fn test_create_duplicate_name() {
        let mut repos = TestRepos::default();
        repos
            .categories
            .expect_find_by_name()
            .returning(|_| Ok(Some(category("Engineering"))));
        repos.categories.expect_create().never();

        let service = CategoryManager::new(repos.into_uow());
        let result = service.create("engineering".into()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_rename_to_own_name_with_new_case() {
        let existing = category("engineering");
        let id = existing.id;

        let mut repos = TestRepos::default();
        let found = existing.clone();
        repos
            .categories
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        repos
            .categories
            .expect_find_by_name()
            .returning(move |_| Ok(Some(existing.clone())));
        repos
            .categories
            .expect_rename()
            .returning(|id, name| Ok(Category { id, ..category(&name) }));

        let service = CategoryManager::new(repos.into_uow());
        let renamed = service.rename(id, "Engineering".into()).await.unwrap();

        assert_eq!(renamed.name, "Engineering");
    }

    #[tokio::test]
    async fn test_delete_in_use_category() {
        let mut repos = TestRepos::default();
        repos
            .categories
            .expect_find_by_id()
            .returning(|_| Ok(Some(category("Engineering"))));
        repos.posts.expect_count_by_category().returning(|_| Ok(2));
        repos.categories.expect_delete().never();

        let service = CategoryManager::new(repos.into_uow());
        let result = service.delete(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_delete_unused_category() {
        let mut repos = TestRepos::default();
        repos
            .categories
            .expect_find_by_id()
            .returning(|_| Ok(Some(category("Engineering"))));
        repos.posts.expect_count_by_category().returning(|_| Ok(0));
        repos.categories.expect_delete().times(1).returning(|_| Ok(()));

        let service = CategoryManager::new(repos.into_uow());
        assert!(service.delete(Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_with_usage_defaults_to_zero() {
        let used = category("Engineering");
        let unused = category("Travel");
        let used_id = used.id;

        let mut repos = TestRepos::default();
        repos
            .categories
            .expect_list()
            .returning(move || Ok(vec![used.clone(), unused.clone()]));
        repos
            .posts
            .expect_counts_per_category()
            .returning(move || Ok(HashMap::from([(used_id, 3)])));

        let service = CategoryManager::new(repos.into_uow());
        let usage = service.list_with_usage().await.unwrap();

        assert_eq!(usage[0].post_count, 3);
        assert!(usage[0].is_in_use());
        assert_eq!(usage[1].post_count, 0);
    }
}

//! Category repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use sea_orm::sea_query::{Expr, Func};
use uuid::Uuid;

use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use crate::domain::Category;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name
    async fn list(&self) -> AppResult<Vec<Category>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    /// Case-insensitive lookup by name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    /// Insert a category; a duplicate name is a conflict
    async fn create(&self, name: String) -> AppResult<Category>;

    async fn rename(&self, id: Uuid, name: String) -> AppResult<Category>;

    /// Delete a category; refused while posts reference it
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn count(&self) -> AppResult<u64>;
}

pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn list(&self) -> AppResult<Vec<Category>> {
        let models = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Category::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find()
            .filter(Expr::expr(Func::lower(Expr::col(category::Column::Name))).eq(name.to_lowercase()))
            .one(&self.db)
            .await?;

        Ok(result.map(Category::from))
    }

    async fn create(&self, name: String) -> AppResult<Category> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "Category"))?;
        Ok(Category::from(model))
    }

    async fn rename(&self, id: Uuid, name: String) -> AppResult<Category> {
        let model = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        active.name = Set(name);

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "Category"))?;
        Ok(Category::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = CategoryEntity::delete_many()
            .filter(category::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    AppError::invalid_state("Category still has posts and cannot be deleted")
                }
                _ => AppError::from(e),
            })?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(CategoryEntity::find().count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(name: &str) -> category::Model {
        category::Model {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_maps_models() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("Engineering"), model("Travel")]])
            .into_connection();

        let names: Vec<String> = CategoryStore::new(db)
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Engineering", "Travel"]);
    }

    #[tokio::test]
    async fn test_find_by_name_miss() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();

        let found = CategoryStore::new(db).find_by_name("Nope").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_category() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = CategoryStore::new(db).delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
}

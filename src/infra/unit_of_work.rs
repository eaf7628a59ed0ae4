//! Unit of Work pattern implementation.
//!
//! Centralizes access to every repository and runs multi-step writes
//! inside one database transaction, committed on success and rolled back
//! on error.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, IsolationLevel,
    QueryFilter, TransactionTrait,
};

use super::repositories::entities::{category, message, post, user};
use super::repositories::{
    CategoryRepository, CategoryStore, MessageRepository, MessageStore, PostRepository, PostStore,
    UserRepository, UserStore,
};
use crate::domain::UserRole;
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transactional closures
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction method;
/// tests implement it by hand around mock repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn posts(&self) -> Arc<dyn PostRepository>;

    fn categories(&self) -> Arc<dyn CategoryRepository>;

    fn messages(&self) -> Arc<dyn MessageRepository>;

    /// Execute a closure within a ReadCommitted transaction.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }

    pub fn content(&self) -> TxContentRepository<'_> {
        TxContentRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    post_repo: Arc<PostStore>,
    category_repo: Arc<CategoryStore>,
    message_repo: Arc<MessageStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            post_repo: Arc::new(PostStore::new(db.clone())),
            category_repo: Arc::new(CategoryStore::new(db.clone())),
            message_repo: Arc::new(MessageStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn posts(&self) -> Arc<dyn PostRepository> {
        self.post_repo.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    fn messages(&self) -> Arc<dyn MessageRepository> {
        self.message_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await?;

        let outcome = f(TransactionContext::new(&txn)).await;

        match outcome {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-bound user operations
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxUserRepository<'_> {
    /// Delete every account that does not hold `keep`; returns rows removed
    pub async fn delete_all_except_role(&self, keep: UserRole) -> AppResult<u64> {
        let result = user::Entity::delete_many()
            .filter(user::Column::Role.ne(keep.as_str()))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected)
    }
}

/// Transaction-bound bulk operations on posts, categories, and messages
pub struct TxContentRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxContentRepository<'_> {
    pub async fn delete_all_messages(&self) -> AppResult<u64> {
        let result = message::Entity::delete_many().exec(self.txn).await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_all_posts(&self) -> AppResult<u64> {
        let result = post::Entity::delete_many().exec(self.txn).await?;
        Ok(result.rows_affected)
    }

    /// Posts must be gone first; the category foreign key restricts deletes
    pub async fn delete_all_categories(&self) -> AppResult<u64> {
        let result = category::Entity::delete_many().exec(self.txn).await?;
        Ok(result.rows_affected)
    }
}

/// Run a block inside `UnitOfWork::transaction` without spelling out the
/// boxed future.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}

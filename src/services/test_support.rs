//! Mock-backed UnitOfWork for service unit tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::TxFuture;
use crate::infra::{
    CategoryRepository, MessageRepository, MockCategoryRepository, MockMessageRepository,
    MockPostRepository, MockUserRepository, PostRepository, TransactionContext, UnitOfWork,
    UserRepository,
};

/// Mock repositories, configured before being frozen into a UnitOfWork
#[derive(Default)]
pub struct TestRepos {
    pub users: MockUserRepository,
    pub posts: MockPostRepository,
    pub categories: MockCategoryRepository,
    pub messages: MockMessageRepository,
}

impl TestRepos {
    pub fn into_uow(self) -> Arc<TestUnitOfWork> {
        Arc::new(TestUnitOfWork {
            users: Arc::new(self.users),
            posts: Arc::new(self.posts),
            categories: Arc::new(self.categories),
            messages: Arc::new(self.messages),
        })
    }
}

pub struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    posts: Arc<MockPostRepository>,
    categories: Arc<MockCategoryRepository>,
    messages: Arc<MockMessageRepository>,
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn posts(&self) -> Arc<dyn PostRepository> {
        self.posts.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn messages(&self) -> Arc<dyn MessageRepository> {
        self.messages.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("transactions need a database connection"))
    }
}

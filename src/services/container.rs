//! Service Container - Centralized service access with parallel execution support.
//!
//! Wires every service onto one shared Unit of Work and exposes them as
//! trait objects. The `parallel` helpers run independent queries
//! concurrently on the tokio runtime.

use std::future::Future;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AdminManager, AdminService, AuthService, Authenticator, CategoryManager, CategoryService,
    MessageManager, MessageService, PostManager, PostService, UserManager, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn posts(&self) -> Arc<dyn PostService>;

    fn categories(&self) -> Arc<dyn CategoryService>;

    fn messages(&self) -> Arc<dyn MessageService>;

    fn admin(&self) -> Arc<dyn AdminService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    post_service: Arc<dyn PostService>,
    category_service: Arc<dyn CategoryService>,
    message_service: Arc<dyn MessageService>,
    admin_service: Arc<dyn AdminService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            post_service: Arc::new(PostManager::new(uow.clone())),
            category_service: Arc::new(CategoryManager::new(uow.clone())),
            message_service: Arc::new(MessageManager::new(uow.clone())),
            admin_service: Arc::new(AdminManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn posts(&self) -> Arc<dyn PostService> {
        self.post_service.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    fn messages(&self) -> Arc<dyn MessageService> {
        self.message_service.clone()
    }

    fn admin(&self) -> Arc<dyn AdminService> {
        self.admin_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// If either operation fails, the error is returned immediately.
    ///
    /// # Example
    /// ```ignore
    /// let (sent, received) = parallel::join2(
    ///     messages.list_sent(user_id),
    ///     messages.list_received(user_id),
    /// ).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    /// Execute four independent async operations in parallel.
    pub async fn join4<F1, F2, F3, F4, T1, T2, T3, T4>(
        f1: F1,
        f2: F2,
        f3: F3,
        f4: F4,
    ) -> AppResult<(T1, T2, T3, T4)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
        F4: Future<Output = AppResult<T4>>,
    {
        try_join!(f1, f2, f3, f4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<i32> {
            Ok(2)
        }

        let (a, b) = assert_ok!(parallel::join2(op1(), op2()).await);
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[tokio::test]
    async fn test_parallel_join4_propagates_error() {
        async fn ok(n: u64) -> AppResult<u64> {
            Ok(n)
        }
        async fn fail() -> AppResult<u64> {
            Err(AppError::NotFound)
        }

        let err = assert_err!(parallel::join4(ok(1), ok(2), fail(), ok(4)).await);
        assert!(matches!(err, AppError::NotFound));
    }
}

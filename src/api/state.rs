//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AdminService, AuthService, CategoryService, MessageService, PostService, ServiceContainer,
    Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub post_service: Arc<dyn PostService>,
    pub category_service: Arc<dyn CategoryService>,
    pub message_service: Arc<dyn MessageService>,
    pub admin_service: Arc<dyn AdminService>,
    /// Database connection, used by the health check
    pub database: Arc<Database>,
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
}

impl AppState {
    /// Create application state from a connected database and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let cookie_secure = config.cookie_secure;
        let container = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            post_service: container.posts(),
            category_service: container.categories(),
            message_service: container.messages(),
            admin_service: container.admin(),
            database,
            cookie_secure,
        }
    }

    /// Create application state from any service container, e.g. test doubles.
    pub fn new(services: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            post_service: services.posts(),
            category_service: services.categories(),
            message_service: services.messages(),
            admin_service: services.admin(),
            database,
            cookie_secure: false,
        }
    }
}

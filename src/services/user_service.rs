//! User service - profiles, account administration, and admin bootstrap.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::auth_service::normalize_email;
use crate::domain::{Password, ProfileUpdate, User, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Outcome of `promote_or_create_admin`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminProvisioning {
    Created,
    Promoted,
    AlreadyAdmin,
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Edit the caller's own name and bio
    async fn update_profile(&self, id: Uuid, changes: ProfileUpdate) -> AppResult<User>;

    /// All accounts, oldest first
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Change another user's role; an admin cannot change their own
    async fn change_role(&self, actor_id: Uuid, target_id: Uuid, role: UserRole)
        -> AppResult<User>;

    /// Delete another user together with their posts and messages
    async fn delete_user(&self, actor_id: Uuid, target_id: Uuid) -> AppResult<()>;

    /// Create an ADMIN account, or promote the existing account with that email
    async fn promote_or_create_admin(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<(User, AdminProvisioning)>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn clean_profile_update(changes: ProfileUpdate) -> AppResult<ProfileUpdate> {
    let name = match changes.name {
        Some(name) => {
            let trimmed = name.trim().to_string();
            if trimmed.is_empty() {
                return Err(AppError::validation("Name cannot be blank"));
            }
            Some(trimmed)
        }
        None => None,
    };
    let bio = changes.bio.map(|bio| bio.trim().to_string());

    let cleaned = ProfileUpdate { name, bio };
    if cleaned.is_empty() {
        return Err(AppError::validation("Nothing to update"));
    }
    Ok(cleaned)
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileUpdate) -> AppResult<User> {
        let changes = clean_profile_update(changes)?;
        self.uow.users().update_profile(id, changes).await
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn change_role(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        role: UserRole,
    ) -> AppResult<User> {
        if actor_id == target_id {
            return Err(AppError::validation("You cannot change your own role"));
        }

        let user = self.uow.users().update_role(target_id, role).await?;
        tracing::info!(%actor_id, %target_id, role = %role, "User role changed");
        Ok(user)
    }

    async fn delete_user(&self, actor_id: Uuid, target_id: Uuid) -> AppResult<()> {
        if actor_id == target_id {
            return Err(AppError::validation("You cannot delete your own account"));
        }

        self.uow.users().delete(target_id).await?;
        tracing::info!(%actor_id, %target_id, "User deleted");
        Ok(())
    }

    async fn promote_or_create_admin(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<(User, AdminProvisioning)> {
        let email = normalize_email(&email);
        let users = self.uow.users();

        if let Some(existing) = users.find_by_email(&email).await? {
            if existing.is_admin() {
                return Ok((existing, AdminProvisioning::AlreadyAdmin));
            }
            let promoted = users.update_role(existing.id, UserRole::Admin).await?;
            tracing::info!(user_id = %promoted.id, "Existing user promoted to admin");
            return Ok((promoted, AdminProvisioning::Promoted));
        }

        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        let password_hash = Password::new(&password)?.into_string();
        let user = users
            .create(name, email, password_hash, UserRole::Admin)
            .await?;
        tracing::info!(user_id = %user.id, "Admin account created");
        Ok((user, AdminProvisioning::Created))
    }
}

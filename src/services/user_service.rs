//! User service.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::is_valid_role;
use crate::domain::User;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    async fn list_users(&self, params: &PaginationParams) -> AppResult<(Vec<User>, u64)>;

    async fn update_user(
        &self,
        id: Uuid,
        name: Option<String>,
        role: Option<String>,
    ) -> AppResult<User>;

    /// Soft delete (sets deleted_at)
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    /// Restore a soft-deleted user
    async fn restore_user(&self, id: Uuid) -> AppResult<User>;
}

/// Concrete implementation of UserService.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_users(&self, params: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        self.uow.users().list(params).await
    }

    async fn update_user(
        &self,
        id: Uuid,
        name: Option<String>,
        role: Option<String>,
    ) -> AppResult<User> {
        if let Some(role) = &role {
            if !is_valid_role(role) {
                return Err(AppError::validation(format!("Unknown role: {}", role)));
            }
        }
        if let Some(name) = &name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Name cannot be empty"));
            }
        }

        self.uow.users().update(id, name, role).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.uow.users().soft_delete(id).await
    }

    async fn restore_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().restore(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::MockUserRepository;
    use crate::services::test_support::StubUnitOfWork;
    use chrono::Utc;

    fn test_user(id: Uuid) -> User {
        let now = Utc::now();
        User {
            id,
            email: "client@example.com".to_string(),
            password_hash: "hashed".to_string(),
            name: "Client".to_string(),
            role: UserRole::Client,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn service_with(users: MockUserRepository) -> UserManager<StubUnitOfWork> {
        UserManager::new(Arc::new(StubUnitOfWork {
            users: Some(Arc::new(users)),
            ..Default::default()
        }))
    }

    #[tokio::test]
    async fn get_user_found() {
        let id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id))));

        let result = service_with(users).get_user(id).await.unwrap();
        assert_eq!(result.id, id);
    }

    #[tokio::test]
    async fn get_user_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let result = service_with(users).get_user(Uuid::new_v4()).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn update_rejects_unknown_role() {
        let users = MockUserRepository::new();
        let result = service_with(users)
            .update_user(Uuid::new_v4(), None, Some("superuser".to_string()))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    }

    #[tokio::test]
    async fn update_accepts_designer_role() {
        let mut users = MockUserRepository::new();
        users
            .expect_update()
            .returning(|id, _, _| Ok(test_user(id)));

        let result = service_with(users)
            .update_user(Uuid::new_v4(), None, Some("designer".to_string()))
            .await;

        assert!(result.is_ok());
    }
}

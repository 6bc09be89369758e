//! User service - profile lookup and self-service updates.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{ProfileUpdate, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// Every account, admins included
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Change name, email or address of the caller's own account
    async fn update_profile(&self, id: i32, update: ProfileUpdate) -> AppResult<User>;
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

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User")
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn update_profile(&self, id: i32, update: ProfileUpdate) -> AppResult<User> {
        if update.is_empty() {
            return Err(AppError::validation("Nothing to update"));
        }

        if let Some(email) = update.email.as_deref() {
            if let Some(existing) = self.uow.users().find_by_email(email).await? {
                if existing.id != id {
                    return Err(AppError::conflict("email"));
                }
            }
        }

        let user = self.uow.users().update_profile(id, update).await?;
        tracing::info!("User {} updated their profile", user.id);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::infra::{MockUnitOfWork, MockUserRepository, UserRepository};
    use chrono::Utc;

    fn user(id: i32, email: &str) -> User {
        User {
            id,
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: None,
            address: None,
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(users: MockUserRepository) -> UserManager<MockUnitOfWork> {
        let users: Arc<dyn UserRepository> = Arc::new(users);
        let mut uow = MockUnitOfWork::new();
        uow.expect_users().returning(move || users.clone());
        UserManager::new(Arc::new(uow))
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        match service(users).get_user(3).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "User not found"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_profile_rejects_email_of_another_user() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|email| Ok(Some(user(2, email))));
        users.expect_update_profile().never();

        let update = ProfileUpdate {
            email: Some("taken@example.com".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            service(users).update_profile(1, update).await,
            Err(AppError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_own_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|email| Ok(Some(user(1, email))));
        users.expect_update_profile().returning(|id, update| {
            let mut updated = user(id, update.email.as_deref().unwrap_or_default());
            updated.address = update.address;
            Ok(updated)
        });

        let update = ProfileUpdate {
            email: Some("me@example.com".to_string()),
            address: Some("42 Main St".to_string()),
            ..Default::default()
        };

        let updated = service(users).update_profile(1, update).await.unwrap();
        assert_eq!(updated.address.as_deref(), Some("42 Main St"));
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected() {
        let users = MockUserRepository::new();

        assert!(matches!(
            service(users)
                .update_profile(1, ProfileUpdate::default())
                .await,
            Err(AppError::Validation { .. })
        ));
    }
}

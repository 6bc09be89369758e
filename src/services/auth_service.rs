//! Authentication service - registration, login and token issuance.
//!
//! Access tokens are short-lived and carry the role. Refresh tokens are
//! signed with a separate secret and only carry the user id, so every
//! refresh re-reads the account.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::domain::{NewUser, Password, Role, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Access token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i32,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Refresh token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshClaims {
    pub user_id: i32,
    pub iat: i64,
    pub exp: i64,
}

/// Input for account registration
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Authenticated user with a fresh token pair
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a USER account and sign it in
    async fn register(&self, registration: Registration) -> AppResult<AuthSession>;

    /// Check credentials and issue a token pair
    async fn login(&self, email: String, password: String) -> AppResult<AuthSession>;

    /// Exchange a refresh token for a new access token
    async fn refresh(&self, refresh_token: &str) -> AppResult<String>;

    /// Verify an access token and extract its claims
    fn verify_access_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    fn issue_access_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user.id,
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.config.access_token_minutes)).timestamp(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.access_secret_bytes()),
        )?)
    }

    fn issue_refresh_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = RefreshClaims {
            user_id: user.id,
            iat: now.timestamp(),
            exp: (now + Duration::days(self.config.refresh_token_days)).timestamp(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.refresh_secret_bytes()),
        )?)
    }

    fn session(&self, user: User) -> AppResult<AuthSession> {
        Ok(AuthSession {
            access_token: self.issue_access_token(&user)?,
            refresh_token: self.issue_refresh_token(&user)?,
            user,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<AuthSession> {
        if self
            .uow
            .users()
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("email"));
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                email: registration.email,
                password_hash,
                name: registration.name,
                address: registration.address,
                role: Role::User,
            })
            .await?;

        tracing::info!("User {} registered", user.id);
        self.session(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthSession> {
        let user = self.uow.users().find_by_email(&email).await?;

        // Verify even for unknown emails so both paths cost the same.
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.as_str()),
            None => Password::dummy(),
        };
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => {
                tracing::info!("User {} logged in", user.id);
                self.session(user)
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<String> {
        let claims = decode::<RefreshClaims>(
            refresh_token,
            &DecodingKey::from_secret(self.config.refresh_secret_bytes()),
            &Validation::default(),
        )?
        .claims;

        let user = self
            .uow
            .users()
            .find_by_id(claims.user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        self.issue_access_token(&user)
    }

    fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.access_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockUnitOfWork, MockUserRepository, UserRepository};

    const ACCESS: &str = "access-secret-that-is-at-least-32-chars";
    const REFRESH: &str = "refresh-secret-that-is-at-least-32-chars";

    fn stored_user(password: &str) -> User {
        User {
            id: 11,
            email: "ada@example.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            name: None,
            address: None,
            role: Role::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(users: MockUserRepository) -> Authenticator<MockUnitOfWork> {
        let users: Arc<dyn UserRepository> = Arc::new(users);
        let mut uow = MockUnitOfWork::new();
        uow.expect_users().returning(move || users.clone());

        Authenticator::new(Arc::new(uow), Config::new(ACCESS, REFRESH).unwrap())
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user("password123"))));
        users.expect_create().never();

        let result = service(users)
            .register(Registration {
                email: "ada@example.com".to_string(),
                password: "password123".to_string(),
                name: None,
                address: None,
            })
            .await;

        match result {
            Err(AppError::Conflict { field }) => assert_eq!(field, "email"),
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_always_creates_plain_users() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|new_user| new_user.role == Role::User && new_user.password_hash != "password123")
            .returning(|new_user| {
                Ok(User {
                    id: 1,
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    name: new_user.name,
                    address: new_user.address,
                    role: new_user.role,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let auth = service(users);
        let session = auth
            .register(Registration {
                email: "new@example.com".to_string(),
                password: "password123".to_string(),
                name: Some("New".to_string()),
                address: None,
            })
            .await
            .unwrap();

        let claims = auth.verify_access_token(&session.access_token).unwrap();
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_look_alike() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|email| match email {
                "ada@example.com" => Ok(Some(stored_user("password123"))),
                _ => Ok(None),
            });

        let auth = service(users);

        let wrong = auth
            .login("ada@example.com".to_string(), "nope-nope".to_string())
            .await;
        let unknown = auth
            .login("ghost@example.com".to_string(), "password123".to_string())
            .await;

        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_refresh_issues_access_token_with_current_role() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user("password123"))));
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_user("password123"))));

        let auth = service(users);
        let session = auth
            .login("ada@example.com".to_string(), "password123".to_string())
            .await
            .unwrap();

        let access = auth.refresh(&session.refresh_token).await.unwrap();
        let claims = auth.verify_access_token(&access).unwrap();
        assert_eq!(claims.user_id, 11);
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_tokens_are_not_interchangeable() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user("password123"))));

        let auth = service(users);
        let session = auth
            .login("ada@example.com".to_string(), "password123".to_string())
            .await
            .unwrap();

        assert!(auth.verify_access_token(&session.refresh_token).is_err());
        assert!(auth.refresh(&session.access_token).await.is_err());
        assert!(auth.verify_access_token("garbage").is_err());
    }
}

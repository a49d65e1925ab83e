//! Authentication service.
//!
//! Issues JWTs backed by a server-side session record so logout can
//! invalidate a token before it expires.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{SessionStore, UnitOfWork};

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    /// Session id; the token is only honored while its session record exists
    pub jti: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new client account
    async fn register(&self, email: String, password: String, name: String) -> AppResult<User>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify a token and require its session to still be live
    async fn authenticate(&self, token: &str) -> AppResult<Claims>;

    /// Revoke the token's session
    async fn logout(&self, claims: &Claims) -> AppResult<()>;
}

/// Generate JWT token for a user
fn generate_token(user: &User, config: &Config) -> AppResult<(TokenResponse, Uuid)> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);
    let jti = Uuid::new_v4();

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        jti,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok((
        TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
        },
        jti,
    ))
}

/// Verify JWT signature and expiry, extract claims
fn verify_token(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    sessions: Arc<dyn SessionStore>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, sessions: Arc<dyn SessionStore>, config: Config) -> Self {
        Self {
            uow,
            sessions,
            config,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, email: String, password: String, name: String) -> AppResult<User> {
        // Soft-deleted accounts keep their email reserved
        if self
            .uow
            .users()
            .find_by_email_with_deleted(&email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.uow
            .users()
            .create(email, password_hash, name, UserRole::Client)
            .await
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user_result = self.uow.users().find_by_email(&email).await?;

        // Run password verification even when the user does not exist so
        // response timing cannot enumerate valid emails.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let user = user_result.as_ref().expect("user_exists checked above");
        let (token, jti) = generate_token(user, &self.config)?;

        self.sessions
            .put(&jti.to_string(), user.id, token.expires_in as u64)
            .await?;

        Ok(token)
    }

    async fn authenticate(&self, token: &str) -> AppResult<Claims> {
        let claims = verify_token(token, &self.config)?;

        if !self.sessions.contains(&claims.jti.to_string()).await? {
            return Err(AppError::Unauthorized);
        }

        Ok(claims)
    }

    async fn logout(&self, claims: &Claims) -> AppResult<()> {
        self.sessions.revoke(&claims.jti.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockSessionStore;
    use crate::services::test_support::StubUnitOfWork;
    use crate::infra::MockUserRepository;

    fn config() -> Config {
        std::env::set_var("JWT_SECRET", "test-secret-key-for-testing-only-32chars");
        Config::from_env()
    }

    fn test_user(password: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "client@example.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            name: "Client".to_string(),
            role: UserRole::Client,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email_with_deleted()
            .returning(|_| Ok(Some(test_user("password123"))));

        let uow = StubUnitOfWork {
            users: Some(Arc::new(users)),
            ..Default::default()
        };
        let service = Authenticator::new(
            Arc::new(uow),
            Arc::new(MockSessionStore::new()),
            config(),
        );

        let result = service
            .register(
                "client@example.com".to_string(),
                "password123".to_string(),
                "Client".to_string(),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn login_issues_token_and_session() {
        let user = test_user("password123");
        let returned = user.clone();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(returned.clone())));

        let mut sessions = MockSessionStore::new();
        sessions.expect_put().times(1).returning(|_, _, _| Ok(()));

        let uow = StubUnitOfWork {
            users: Some(Arc::new(users)),
            ..Default::default()
        };
        let service = Authenticator::new(Arc::new(uow), Arc::new(sessions), config());

        let token = service
            .login(user.email.clone(), "password123".to_string())
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert!(!token.access_token.is_empty());
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let user = test_user("password123");

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let uow = StubUnitOfWork {
            users: Some(Arc::new(users)),
            ..Default::default()
        };
        let service = Authenticator::new(
            Arc::new(uow),
            Arc::new(MockSessionStore::new()),
            config(),
        );

        let result = service
            .login("client@example.com".to_string(), "not-the-password".to_string())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn authenticate_rejects_revoked_session() {
        let user = test_user("password123");
        let cfg = config();
        let (token, _jti) = generate_token(&user, &cfg).unwrap();

        let mut sessions = MockSessionStore::new();
        sessions.expect_contains().returning(|_| Ok(false));

        let uow = StubUnitOfWork::default();
        let service = Authenticator::new(Arc::new(uow), Arc::new(sessions), cfg);

        let result = service.authenticate(&token.access_token).await;
        assert!(matches!(result.unwrap_err(), AppError::Unauthorized));
    }

    #[tokio::test]
    async fn authenticate_accepts_live_session() {
        let user = test_user("password123");
        let cfg = config();
        let (token, jti) = generate_token(&user, &cfg).unwrap();

        let mut sessions = MockSessionStore::new();
        sessions.expect_contains().returning(|_| Ok(true));

        let uow = StubUnitOfWork::default();
        let service = Authenticator::new(Arc::new(uow), Arc::new(sessions), cfg);

        let claims = service.authenticate(&token.access_token).await.unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.jti, jti);
    }
}

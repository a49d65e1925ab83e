//! Integration tests for the API building blocks.
//!
//! These tests exercise the service traits with hand-rolled mocks and
//! the shared response/error types, without requiring a database,
//! Redis, or object storage.

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::Utc;
use uuid::Uuid;

use studio_portal::domain::{User, UserRole};
use studio_portal::errors::{AppError, AppResult};
use studio_portal::services::{AuthService, Claims, TokenResponse};

// =============================================================================
// Mock Services for Testing
// =============================================================================

/// Mock auth service with an in-memory session set
struct MockAuthService {
    live_jti: Uuid,
}

impl MockAuthService {
    fn new() -> Self {
        Self {
            live_jti: Uuid::new_v4(),
        }
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn register(&self, email: String, _password: String, name: String) -> AppResult<User> {
        Ok(User {
            id: Uuid::new_v4(),
            email,
            password_hash: "hashed".to_string(),
            name,
            role: UserRole::Client,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        })
    }

    async fn login(&self, _email: String, _password: String) -> AppResult<TokenResponse> {
        Ok(TokenResponse {
            access_token: "mock-token".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 86400,
        })
    }

    async fn authenticate(&self, token: &str) -> AppResult<Claims> {
        if token == "valid-test-token" {
            Ok(Claims {
                sub: Uuid::new_v4(),
                email: "client@example.com".to_string(),
                role: "client".to_string(),
                jti: self.live_jti,
                exp: Utc::now().timestamp() + 3600,
                iat: Utc::now().timestamp(),
            })
        } else {
            Err(AppError::Unauthorized)
        }
    }

    async fn logout(&self, claims: &Claims) -> AppResult<()> {
        if claims.jti == self.live_jti {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

// =============================================================================
// Response Type Tests
// =============================================================================

#[tokio::test]
async fn test_api_response_structure() {
    use studio_portal::types::ApiResponse;

    let response: ApiResponse<String> = ApiResponse::success("test data".to_string());
    assert!(response.success);
    assert_eq!(response.data.unwrap(), "test data");
    assert!(response.message.is_none());
}

#[tokio::test]
async fn test_api_response_with_message() {
    use studio_portal::types::ApiResponse;

    let response: ApiResponse<i32> = ApiResponse::with_message(42, "Operation completed");
    assert!(response.success);
    assert_eq!(response.data.unwrap(), 42);
    assert_eq!(response.message.unwrap(), "Operation completed");
}

#[tokio::test]
async fn test_paginated_response_meta() {
    use studio_portal::types::{Paginated, PaginationParams};

    let params = PaginationParams {
        page: 2,
        per_page: 10,
    };
    let paged = Paginated::new(vec!["a", "b"], &params, 25);

    assert_eq!(paged.meta.page, 2);
    assert_eq!(paged.meta.total, 25);
    assert_eq!(paged.meta.total_pages, 3);
}

// =============================================================================
// Domain Model Tests
// =============================================================================

#[tokio::test]
async fn test_user_role_round_trip() {
    assert_eq!(UserRole::Client.to_string(), "client");
    assert_eq!(UserRole::Designer.to_string(), "designer");
    assert_eq!(UserRole::Admin.to_string(), "admin");

    assert_eq!(UserRole::from("admin"), UserRole::Admin);
    // Unknown values fall back to the least-privileged role
    assert_eq!(UserRole::from("invalid"), UserRole::Client);
}

#[tokio::test]
async fn test_actor_permissions() {
    let admin = studio_portal::Actor {
        id: Uuid::new_v4(),
        role: UserRole::Admin,
    };
    let client = studio_portal::Actor {
        id: Uuid::new_v4(),
        role: UserRole::Client,
    };

    assert!(admin.is_admin());
    assert!(!client.is_admin());
    assert!(!client.is_designer());
}

// =============================================================================
// Error Type Tests
// =============================================================================

#[tokio::test]
async fn test_app_error_status_codes() {
    use axum::response::IntoResponse;

    assert_eq!(
        AppError::NotFound.into_response().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        AppError::Unauthorized.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::Forbidden.into_response().status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        AppError::conflict("Voucher").into_response().status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        AppError::invalid_state("already submitted")
            .into_response()
            .status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        AppError::unprocessable("no tier").into_response().status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        AppError::storage("s3 down").into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

// =============================================================================
// Password Hashing Tests
// =============================================================================

#[tokio::test]
async fn test_password_hashing() {
    use studio_portal::Password;

    let plain_password = "secure_password_123";
    let password = Password::new(plain_password).expect("Hashing should succeed");
    let hash = password.into_string();

    assert_ne!(hash.as_str(), plain_password);

    let stored = Password::from_hash(hash);
    assert!(stored.verify(plain_password));
    assert!(!stored.verify("wrong_password"));
}

// =============================================================================
// Mock Service Tests
// =============================================================================

#[tokio::test]
async fn test_mock_auth_register_defaults_to_client() {
    let service = MockAuthService::new();
    let user = service
        .register(
            "new@example.com".to_string(),
            "password123".to_string(),
            "New Client".to_string(),
        )
        .await
        .unwrap();

    assert_eq!(user.email, "new@example.com");
    assert_eq!(user.role, UserRole::Client);
}

#[tokio::test]
async fn test_mock_auth_token_flow() {
    let service = MockAuthService::new();

    let token = service
        .login("client@example.com".to_string(), "password123".to_string())
        .await
        .unwrap();
    assert_eq!(token.token_type, "Bearer");

    let claims = service.authenticate("valid-test-token").await.unwrap();
    assert_eq!(claims.role, "client");

    // Logout succeeds for the live session, then an unknown jti fails
    service.logout(&claims).await.unwrap();

    let stale = Claims {
        jti: Uuid::new_v4(),
        ..claims
    };
    assert!(service.logout(&stale).await.is_err());
}

#[tokio::test]
async fn test_mock_auth_rejects_bad_token() {
    let service = MockAuthService::new();
    let result = service.authenticate("garbage").await;
    assert!(matches!(result.unwrap_err(), AppError::Unauthorized));
}

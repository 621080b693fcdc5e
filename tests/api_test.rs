//! Integration tests for the API surface.
//!
//! These tests use a hand-written mock service to exercise transport
//! types, error mapping, and serialization without requiring a database
//! connection.

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use user_registry::domain::{CreateUser, PasswordPolicyError, UpdateUser, User, UserResponse};
use user_registry::errors::{AppError, AppResult};
use user_registry::services::UserService;

// =============================================================================
// Mock Service for Testing
// =============================================================================

/// Mock user service that returns predefined responses
struct MockUserService;

fn sample_user(id: Uuid, email: &str, name: &str) -> User {
    User {
        id,
        email: email.to_string(),
        password_hash: "hashed".to_string(),
        name: name.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

#[async_trait]
impl UserService for MockUserService {
    async fn create_user(&self, input: CreateUser) -> AppResult<User> {
        if input.email == "taken@example.com" {
            return Err(AppError::conflict("Email"));
        }
        Ok(sample_user(Uuid::new_v4(), &input.email, &input.name))
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        Ok(sample_user(id, "test@example.com", "Test User"))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        if email == "nobody@example.com" {
            return Ok(None);
        }
        Ok(Some(sample_user(Uuid::new_v4(), email, "Test User")))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(vec![
            sample_user(Uuid::new_v4(), "user1@example.com", "User One"),
            sample_user(Uuid::new_v4(), "user2@example.com", "User Two"),
        ])
    }

    async fn update_user(&self, id: Uuid, changes: UpdateUser) -> AppResult<User> {
        let mut user = sample_user(id, "test@example.com", "Test User");
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        Ok(user)
    }

    async fn delete_user(&self, _id: Uuid) -> AppResult<()> {
        Ok(())
    }
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[tokio::test]
async fn test_app_error_status_codes() {
    use axum::response::IntoResponse;

    let response = AppError::NotFound.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = AppError::conflict("Email").into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = AppError::Password(PasswordPolicyError::Empty).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = AppError::Password(PasswordPolicyError::TooShort(8)).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = AppError::validation("bad payload").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = AppError::internal("boom").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_password_policy_sub_reasons_stay_distinguishable() {
    let empty = AppError::Password(PasswordPolicyError::Empty);
    let short = AppError::Password(PasswordPolicyError::TooShort(8));

    assert_ne!(empty.to_string(), short.to_string());
    assert!(empty.to_string().contains("empty"));
    assert!(short.to_string().contains("at least 8"));
}

// =============================================================================
// Serialization Tests
// =============================================================================

#[tokio::test]
async fn test_user_serialization_hides_password_hash() {
    let user = sample_user(Uuid::new_v4(), "test@example.com", "Test User");
    let value = serde_json::to_value(&user).unwrap();

    assert!(value.get("password_hash").is_none());
    assert_eq!(value["email"], "test@example.com");
}

#[tokio::test]
async fn test_user_response_omits_deleted_at_for_active_users() {
    let user = sample_user(Uuid::new_v4(), "test@example.com", "Test User");
    let response = UserResponse::from(user);
    let value = serde_json::to_value(&response).unwrap();

    assert!(value.get("deleted_at").is_none());
    assert!(value.get("password_hash").is_none());
}

// =============================================================================
// Request Validation Tests
// =============================================================================

#[tokio::test]
async fn test_create_request_rejects_invalid_email() {
    use user_registry::api::handlers::user_handler::CreateUserRequest;

    let request = CreateUserRequest {
        name: "Juan".to_string(),
        email: "not-an-email".to_string(),
        password: "passwordSeguro".to_string(),
    };

    assert!(request.validate().is_err());
}

#[tokio::test]
async fn test_create_request_rejects_short_password() {
    use user_registry::api::handlers::user_handler::CreateUserRequest;

    let request = CreateUserRequest {
        name: "Juan".to_string(),
        email: "juan@example.com".to_string(),
        password: "short".to_string(),
    };

    assert!(request.validate().is_err());
}

#[tokio::test]
async fn test_create_request_accepts_valid_payload() {
    use user_registry::api::handlers::user_handler::CreateUserRequest;

    let request = CreateUserRequest {
        name: "Juan".to_string(),
        email: "juan@example.com".to_string(),
        password: "passwordSeguro".to_string(),
    };

    assert!(request.validate().is_ok());
}

#[tokio::test]
async fn test_update_request_allows_omitted_fields() {
    use user_registry::api::handlers::user_handler::UpdateUserRequest;

    // Missing fields deserialize to None, not empty strings
    let request: UpdateUserRequest = serde_json::from_str("{}").unwrap();
    assert!(request.name.is_none());
    assert!(request.email.is_none());
    assert!(request.password.is_none());
    assert!(request.validate().is_ok());

    let update = UpdateUser::from(request);
    assert!(update.name.is_none());
}

#[tokio::test]
async fn test_update_request_keeps_explicit_empty_password() {
    use user_registry::api::handlers::user_handler::UpdateUserRequest;

    // An explicitly empty password must reach the service for rejection,
    // not be conflated with an omitted field
    let request: UpdateUserRequest = serde_json::from_str(r#"{"password": ""}"#).unwrap();
    assert_eq!(request.password.as_deref(), Some(""));
}

// =============================================================================
// Domain Model Tests
// =============================================================================

#[tokio::test]
async fn test_user_active_state() {
    let mut user = sample_user(Uuid::new_v4(), "test@example.com", "Test User");
    assert!(user.is_active());
    assert!(!user.is_deleted());

    user.deleted_at = Some(Utc::now());
    assert!(!user.is_active());
    assert!(user.is_deleted());
}

// =============================================================================
// Mock Service Tests
// =============================================================================

#[tokio::test]
async fn test_mock_service_create() {
    let service = MockUserService;
    let user = service
        .create_user(CreateUser {
            name: "New User".to_string(),
            email: "new@example.com".to_string(),
            password: "passwordSeguro".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.email, "new@example.com");
    assert_eq!(user.name, "New User");
}

#[tokio::test]
async fn test_mock_service_create_conflict() {
    let service = MockUserService;
    let result = service
        .create_user(CreateUser {
            name: "New User".to_string(),
            email: "taken@example.com".to_string(),
            password: "passwordSeguro".to_string(),
        })
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_mock_service_find_by_email_absent() {
    let service = MockUserService;
    let result = service
        .find_user_by_email("nobody@example.com")
        .await
        .unwrap();

    assert!(result.is_none());
}

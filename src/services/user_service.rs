//! User service - Owns the user lifecycle rules.
//!
//! All reads are active-only; soft-deleted users are invisible here and
//! are never mutated again.
//!
//! Email uniqueness is enforced in two layers: the pre-checks in this
//! service give a fast `Conflict` in the common case, but the lookup and
//! the subsequent write are separate store round-trips, so two calls
//! racing on the same email can both pass the check. The partial unique
//! index on active emails is the backstop; the loser of such a race gets
//! the store's constraint error instead of `Conflict`.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::password::validate_password;
use crate::domain::{CreateUser, PasswordHasher, UpdateUser, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;

/// User lifecycle service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a new user from plaintext credentials
    async fn create_user(&self, input: CreateUser) -> AppResult<User>;

    /// Get active user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Look up an active user by email; absence is a normal outcome,
    /// not an error
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all active users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Apply a partial update to an active user
    async fn update_user(&self, id: Uuid, changes: UpdateUser) -> AppResult<User>;

    /// Soft delete user (sets deleted_at timestamp)
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository and hasher.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, input: CreateUser) -> AppResult<User> {
        // Uniqueness pre-check against active users only; a deleted
        // user's email may be registered again. On conflict nothing else
        // runs, in particular no hashing.
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        // Policy before hashing; a rejected password never reaches the
        // hasher.
        validate_password(&input.password)?;
        let password_hash = self.hasher.hash(&input.password).await?;

        self.repo
            .insert(input.email, password_hash, input.name)
            .await
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.find_by_email(email).await
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list().await
    }

    async fn update_user(&self, id: Uuid, changes: UpdateUser) -> AppResult<User> {
        // Check order is observable: existence, then email uniqueness,
        // then password policy, then a single write. Any failure aborts
        // with no partial application.
        let current = self.repo.find_by_id(id).await?.ok_or_not_found()?;

        if let Some(email) = &changes.email {
            // Changing to the current email is not a conflict, and the
            // id comparison also covers stores whose email comparison is
            // looser than string equality.
            if *email != current.email {
                if let Some(holder) = self.repo.find_by_email(email).await? {
                    if holder.id != id {
                        return Err(AppError::conflict("Email"));
                    }
                }
            }
        }

        let password_hash = match &changes.password {
            Some(plain_text) => {
                validate_password(plain_text)?;
                Some(self.hasher.hash(plain_text).await?)
            }
            None => None,
        };

        self.repo
            .update(id, changes.name, changes.email, password_hash)
            .await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let affected = self.repo.soft_delete(id).await?;
        if affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

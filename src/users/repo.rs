use async_trait::async_trait;
use uuid::Uuid;

use crate::users::repo_types::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence port for users. Implementations must enforce email
/// uniqueness atomically on both `create` and `save`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by (normalized) email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Insert a new user and return the stored record.
    async fn create(&self, user: NewUser) -> StoreResult<User>;

    /// Write back every mutable field of `user`, returning the persisted record.
    async fn save(&self, user: &User) -> StoreResult<User>;
}

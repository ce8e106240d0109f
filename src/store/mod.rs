//! Persistence seams for users and tasks.
//!
//! Services only talk to the [`CredentialStore`] and [`TaskStore`] traits.
//! [`memory`] backs development and tests; [`postgres`] backs production.
//! Each call is atomic on its own; nothing spans both stores.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::task::{Task, TaskPatch, TaskQuery};
use crate::models::user::{NewUser, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The write would give two users the same email.
    #[error("email already exists")]
    DuplicateEmail,
    #[error("record not found")]
    NotFound,
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// User records with email uniqueness enforced at write time.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Fails with `DuplicateEmail` if the email is already registered.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Persists every mutable field of `user` and bumps `updated_at`.
    /// Fails with `DuplicateEmail` if another user already has the email,
    /// and `NotFound` if the user is gone.
    async fn save(&self, user: &User) -> Result<User, StoreError>;
}

/// Task records, each scoped to one owner.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks owned by `owner_id` that match `query`, oldest first.
    async fn find_by_owner(&self, owner_id: Uuid, query: &TaskQuery)
        -> Result<Vec<Task>, StoreError>;

    async fn find_by_id(&self, task_id: Uuid) -> Result<Option<Task>, StoreError>;

    async fn create(&self, task: Task) -> Result<Task, StoreError>;

    /// Applies the present fields of `patch`, bumps `updated_at`.
    /// Last write wins; there is no version check.
    async fn update(&self, task_id: Uuid, patch: &TaskPatch) -> Result<Task, StoreError>;

    /// Fails with `NotFound` if nothing was deleted.
    async fn delete(&self, task_id: Uuid) -> Result<(), StoreError>;
}

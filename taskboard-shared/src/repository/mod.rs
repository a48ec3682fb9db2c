/// Store abstractions for users and tasks
///
/// Handlers talk to [`UserRepository`] and [`TaskRepository`] trait objects so
/// the same code runs against PostgreSQL in production and the in-memory
/// store in tests.
///
/// # Uniqueness
///
/// Every implementation must reject a second user with the same username at
/// write time (`RepositoryError::DuplicateUsername`), independently of any
/// pre-check done by callers. Likewise, deleting a user that still has tasks
/// must fail with `RepositoryError::UserHasTasks`. Records that break the
/// `users` schema (see [`crate::models::user::MAX_USERNAME_LEN`]) fail with
/// `RepositoryError::InvalidUser`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    task::{CreateTask, Task},
    user::{CreateUser, UpdateUser, User},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{PgTaskRepository, PgUserRepository};

/// Errors returned by store implementations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Another user already has this username
    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),

    /// The user is still referenced by at least one task
    #[error("User {0} has assigned tasks")]
    UserHasTasks(Uuid),

    /// The record breaks a schema constraint (username too long, no roles)
    #[error("Invalid user data: {0}")]
    InvalidUser(String),

    /// A referenced user does not exist
    #[error("User {0} not found")]
    UserNotFound(Uuid),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// User store
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns every user in creation order
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    /// Exact, case-sensitive username lookup
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    async fn create(&self, data: CreateUser) -> Result<User, RepositoryError>;

    /// Overwrites a user's mutable fields
    ///
    /// Returns `None` if the user does not exist.
    async fn update(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, RepositoryError>;

    /// Removes a user and returns the removed record
    ///
    /// Returns `None` if the user does not exist.
    async fn delete(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    /// Checks that the store is reachable
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Task store, as far as the users service needs it
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Creates a task; fails with `UserNotFound` if the user does not exist
    async fn create(&self, data: CreateTask) -> Result<Task, RepositoryError>;

    /// Whether any task references `user_id`
    async fn exists_for_user(&self, user_id: Uuid) -> Result<bool, RepositoryError>;
}

//! In-memory user and task store
//!
//! Users and tasks share one lock so that uniqueness checks, task guards, and
//! the writes they protect happen atomically.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RepositoryError, TaskRepository, UserRepository};
use crate::models::{
    task::{CreateTask, Task},
    user::{CreateUser, UpdateUser, User, MAX_USERNAME_LEN},
};

/// Applies the constraints the `users` table enforces in PostgreSQL
fn check_user_fields(username: &str, roles: &[String]) -> Result<(), RepositoryError> {
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(RepositoryError::InvalidUser(format!(
            "username longer than {} characters",
            MAX_USERNAME_LEN
        )));
    }
    if roles.is_empty() {
        return Err(RepositoryError::InvalidUser("roles must not be empty".to_string()));
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Collections {
    /// Kept in insertion order
    users: Vec<User>,
    tasks: Vec<Task>,
}

/// In-memory implementation of [`UserRepository`] and [`TaskRepository`]
///
/// Cloning is cheap and clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks
    pub async fn task_count(&self) -> usize {
        self.inner.read().await.tasks.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, data: CreateUser) -> Result<User, RepositoryError> {
        check_user_fields(&data.username, &data.roles)?;
        let mut inner = self.inner.write().await;

        if inner.users.iter().any(|u| u.username == data.username) {
            return Err(RepositoryError::DuplicateUsername(data.username));
        }

        let user = User::from_create(data);
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, RepositoryError> {
        check_user_fields(&data.username, &data.roles)?;
        let mut inner = self.inner.write().await;

        if inner
            .users
            .iter()
            .any(|u| u.id != id && u.username == data.username)
        {
            return Err(RepositoryError::DuplicateUsername(data.username));
        }

        match inner.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.apply(data);
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let mut inner = self.inner.write().await;

        if inner.tasks.iter().any(|t| t.user_id == id) {
            return Err(RepositoryError::UserHasTasks(id));
        }

        let position = inner.users.iter().position(|u| u.id == id);
        Ok(position.map(|index| inner.users.remove(index)))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn create(&self, data: CreateTask) -> Result<Task, RepositoryError> {
        let mut inner = self.inner.write().await;

        if !inner.users.iter().any(|u| u.id == data.user_id) {
            return Err(RepositoryError::UserNotFound(data.user_id));
        }

        let task = Task::from_create(data);
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn exists_for_user(&self, user_id: Uuid) -> Result<bool, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.iter().any(|t| t.user_id == user_id))
    }
}

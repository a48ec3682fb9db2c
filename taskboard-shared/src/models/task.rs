/// Task model
///
/// Tasks belong to the task-board side of the system. The users service only
/// cares whether any task still references a user, which blocks deleting
/// that user.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     title VARCHAR(255) NOT NULL,
///     text TEXT NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task assigned to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,

    /// Assigned user
    pub user_id: Uuid,

    pub title: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
}

impl Task {
    /// Builds a fresh, not yet completed task
    pub fn from_create(data: CreateTask) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            title: data.title,
            text: data.text,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_create() {
        let user_id = Uuid::new_v4();
        let task = Task::from_create(CreateTask {
            user_id,
            title: "Fix printer".to_string(),
            text: "Second floor".to_string(),
        });

        assert_eq!(task.user_id, user_id);
        assert!(!task.completed);
    }
}

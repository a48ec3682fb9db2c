/// PostgreSQL-backed stores
///
/// Username uniqueness is guaranteed by the `users.username` UNIQUE
/// constraint and task references by the `tasks.user_id` foreign key
/// (`ON DELETE RESTRICT`). Constraint violations are translated into the
/// matching [`RepositoryError`] variants.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskboard_shared::repository::{PgUserRepository, UserRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let users = PgUserRepository::new(pool);
///
/// for user in users.list().await? {
///     println!("{}", user.username);
/// }
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RepositoryError, TaskRepository, UserRepository};
use crate::db::pool::health_check;
use crate::models::{
    task::{CreateTask, Task},
    user::{CreateUser, UpdateUser, User},
};

const USER_COLUMNS: &str = "id, username, password_hash, roles, active, created_at, updated_at";

/// SQLSTATE for a value too long for its column
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// Maps a failed user write to a repository error
fn user_write_error(err: sqlx::Error, username: &str) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepositoryError::DuplicateUsername(username.to_string());
        }
        if db_err.is_check_violation()
            || db_err.code().as_deref() == Some(STRING_DATA_RIGHT_TRUNCATION)
        {
            return RepositoryError::InvalidUser(db_err.message().to_string());
        }
    }
    RepositoryError::Database(err)
}

/// User store backed by the `users` table
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, data: CreateUser) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, password_hash, roles)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&data.username)
        .bind(&data.password_hash)
        .bind(&data.roles)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| user_write_error(e, &data.username))
    }

    async fn update(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = $2,
                roles = $3,
                active = $4,
                password_hash = COALESCE($5, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&data.username)
        .bind(&data.roles)
        .bind(data.active)
        .bind(&data.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| user_write_error(e, &data.username))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                RepositoryError::UserHasTasks(id)
            }
            other => RepositoryError::Database(other),
        })
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        health_check(&self.pool).await?;
        Ok(())
    }
}

/// Task store backed by the `tasks` table
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, data: CreateTask) -> Result<Task, RepositoryError> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, text)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, text, completed, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(&data.title)
        .bind(&data.text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                RepositoryError::UserNotFound(data.user_id)
            }
            other => RepositoryError::Database(other),
        })
    }

    async fn exists_for_user(&self, user_id: Uuid) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tasks WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

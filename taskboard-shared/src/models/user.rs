/// User model
///
/// A user is an authenticated principal with a unique username, an Argon2id
/// password hash, and an ordered list of roles.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     roles TEXT[] NOT NULL CHECK (cardinality(roles) > 0),
///     active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Password exposure
///
/// `User` deliberately does not implement `Serialize`. Anything leaving the
/// process goes through [`UserView`], which has no password field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted username, matching `users.username VARCHAR(255)`
pub const MAX_USERNAME_LEN: usize = 255;

/// Stored user record
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4), immutable
    pub id: Uuid,

    /// Username, unique across all users (case-sensitive)
    pub username: String,

    /// Argon2id password hash in PHC string format
    pub password_hash: String,

    /// Ordered, non-empty list of role identifiers
    pub roles: Vec<String>,

    /// Whether the account may log in
    pub active: bool,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last modified
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
///
/// The password must already be hashed. New users start active.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

/// Input for updating a user
///
/// `username`, `roles`, and `active` always overwrite the stored values.
/// `password_hash` replaces the stored hash only when present.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub password_hash: Option<String>,
}

impl User {
    /// Builds a fresh record from creation input, stamping id and timestamps
    ///
    /// Used by stores that do not generate ids themselves.
    pub fn from_create(data: CreateUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: data.username,
            password_hash: data.password_hash,
            roles: data.roles,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an update in place and bumps `updated_at`
    pub fn apply(&mut self, data: UpdateUser) {
        self.username = data.username;
        self.roles = data.roles;
        self.active = data.active;
        if let Some(hash) = data.password_hash {
            self.password_hash = hash;
        }
        self.updated_at = Utc::now();
    }
}

/// Public projection of a user
///
/// This is the only shape in which user records are returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            roles: user.roles,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::from_create(CreateUser {
            username: "alice".to_string(),
            password_hash: "$argon2id$old".to_string(),
            roles: vec!["Employee".to_string()],
        })
    }

    #[test]
    fn test_from_create_defaults_active() {
        let user = sample();
        assert!(user.active);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_apply_keeps_id_and_password_when_absent() {
        let mut user = sample();
        let id = user.id;

        user.apply(UpdateUser {
            username: "alice2".to_string(),
            roles: vec!["Manager".to_string(), "Admin".to_string()],
            active: false,
            password_hash: None,
        });

        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice2");
        assert_eq!(user.roles, vec!["Manager", "Admin"]);
        assert!(!user.active);
        assert_eq!(user.password_hash, "$argon2id$old");
    }

    #[test]
    fn test_apply_replaces_password_when_present() {
        let mut user = sample();
        user.apply(UpdateUser {
            username: "alice".to_string(),
            roles: vec!["Employee".to_string()],
            active: true,
            password_hash: Some("$argon2id$new".to_string()),
        });
        assert_eq!(user.password_hash, "$argon2id$new");
    }

    #[test]
    fn test_view_has_no_password() {
        let user = sample();
        let json = serde_json::to_value(UserView::from(user.clone())).unwrap();

        assert_eq!(json["_id"], user.id.to_string());
        assert_eq!(json["username"], "alice");
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("createdAt").is_some());
    }
}

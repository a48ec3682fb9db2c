/// First-run setup
///
/// Every `/users` route needs an Admin or Manager token and tokens come
/// from existing accounts, so an empty store needs one account created out
/// of band. The server does that at startup from `ADMIN_USERNAME` /
/// `ADMIN_PASSWORD`.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::AppState, bootstrap::ensure_initial_admin, config::InitialAdminConfig};
///
/// # async fn example(state: AppState) -> anyhow::Result<()> {
/// let admin = InitialAdminConfig {
///     username: "root".to_string(),
///     password: "change-me".to_string(),
/// };
/// ensure_initial_admin(&state, &admin).await?;
/// # Ok(())
/// # }
/// ```

use crate::{app::AppState, config::InitialAdminConfig};
use taskboard_shared::{
    models::user::{CreateUser, User},
    repository::RepositoryError,
};

/// Role given to the initial admin
pub const INITIAL_ADMIN_ROLE: &str = "Admin";

/// Creates the initial admin if the user store is empty
///
/// Returns the created user, or `None` when the store already had users.
///
/// # Errors
///
/// Fails if the store is unreachable, hashing fails, or the store refuses
/// the record.
pub async fn ensure_initial_admin(
    state: &AppState,
    admin: &InitialAdminConfig,
) -> anyhow::Result<Option<User>> {
    if !state.users.list().await?.is_empty() {
        tracing::debug!("User store is not empty, skipping initial admin");
        return Ok(None);
    }

    let password_hash = state.hasher.hash_async(admin.password.clone()).await?;

    let created = state
        .users
        .create(CreateUser {
            username: admin.username.clone(),
            password_hash,
            roles: vec![INITIAL_ADMIN_ROLE.to_string()],
        })
        .await;

    match created {
        Ok(user) => {
            tracing::info!(user_id = %user.id, username = %user.username, "Initial admin created");
            Ok(Some(user))
        }
        // Another instance seeded it first
        Err(RepositoryError::DuplicateUsername(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

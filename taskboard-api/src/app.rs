/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::postgres(pool, config)?;
/// let app = taskboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use taskboard_shared::{
    auth::{
        middleware::authenticate,
        password::{PasswordError, PasswordHasher},
    },
    repository::{PgTaskRepository, PgUserRepository, TaskRepository, UserRepository},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; every field is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// User store
    pub users: Arc<dyn UserRepository>,

    /// Task store (used for the delete guard)
    pub tasks: Arc<dyn TaskRepository>,

    /// Password hasher configured from `config.password`
    pub hasher: PasswordHasher,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state over arbitrary stores
    ///
    /// # Errors
    ///
    /// Fails if the configured password hashing cost is invalid.
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
    ) -> Result<Self, PasswordError> {
        let hasher = PasswordHasher::new(config.password.into())?;

        Ok(Self {
            users,
            tasks,
            hasher,
            config: Arc::new(config),
        })
    }

    /// Creates state backed by PostgreSQL
    pub fn postgres(pool: PgPool, config: Config) -> Result<Self, PasswordError> {
        Self::new(
            config,
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgTaskRepository::new(pool)),
        )
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Lifetime of issued access tokens
    pub fn access_token_ttl(&self) -> Duration {
        Duration::seconds(self.config.jwt.access_ttl_secs)
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET    /health        # Health check (public)
/// ├── POST   /auth/login    # Issue access token (public)
/// └── /users                # Bearer token with Admin or Manager role
///     ├── GET               # List users
///     ├── POST              # Create user
///     ├── PATCH             # Update user
///     └── DELETE            # Delete user
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/login", post(routes::auth::login));

    let user_routes = Router::new()
        .route(
            "/users",
            get(routes::users::list_users)
                .post(routes::users::create_user)
                .patch(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// CORS: permissive with `*`, otherwise the configured origins only
fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Roles allowed to administer users
pub const USER_ADMIN_ROLES: [&str; 2] = ["Admin", "Manager"];

/// JWT authentication middleware layer
///
/// Validates the bearer token, requires one of [`USER_ADMIN_ROLES`], and
/// injects `AuthContext` into request extensions. Roles are those carried by
/// the token, i.e. as of login.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret())?;

    if !auth_context.has_any_role(&USER_ADMIN_ROLES) {
        tracing::debug!(user_id = %auth_context.user_id, roles = ?auth_context.roles, "Role check failed");
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    tracing::debug!(user_id = %auth_context.user_id, "Authenticated request");
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

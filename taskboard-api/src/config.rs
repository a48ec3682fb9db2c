/// Configuration management for the API server
///
/// Configuration comes from environment variables (a `.env` file is loaded
/// first if present).
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `PRODUCTION`: Enables HSTS (default: false)
/// - `LOG_FORMAT`: `json` for JSON logs, anything else for text (default: text)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Token signing secret, at least 32 characters (required)
/// - `JWT_ACCESS_TTL_SECS`: Access token lifetime (default: 900)
/// - `PASSWORD_MEMORY_KIB`, `PASSWORD_ITERATIONS`, `PASSWORD_PARALLELISM`:
///   Argon2id cost (defaults: 65536, 3, 4)
/// - `ADMIN_USERNAME`, `ADMIN_PASSWORD`: Initial admin created at startup
///   when the user store is empty (optional, set both or neither)
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{env, str::FromStr};
use taskboard_shared::auth::password::PasswordParams;

/// Minimum accepted length of `JWT_SECRET`
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,

    /// First account to create on an empty store
    pub bootstrap: Option<InitialAdminConfig>,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `["*"]` allows any origin
    pub cors_origins: Vec<String>,

    /// Production mode (turns on HSTS)
    pub production: bool,

    /// Emit logs as JSON
    pub json_logs: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing secret
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_ttl_secs: i64,
}

/// Argon2id cost configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl From<PasswordConfig> for PasswordParams {
    fn from(config: PasswordConfig) -> Self {
        PasswordParams {
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let params = PasswordParams::default();
        Self {
            memory_kib: params.memory_kib,
            iterations: params.iterations,
            parallelism: params.parallelism,
        }
    }
}

/// Initial admin credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialAdminConfig {
    pub username: String,
    pub password: String,
}

/// Pairs the two admin variables; exactly one of them set is an error
fn initial_admin(
    username: Option<String>,
    password: Option<String>,
) -> anyhow::Result<Option<InitialAdminConfig>> {
    let username = username.filter(|v| !v.trim().is_empty());
    let password = password.filter(|v| !v.is_empty());

    match (username, password) {
        (Some(username), Some(password)) => Ok(Some(InitialAdminConfig {
            username: username.trim().to_string(),
            password,
        })),
        (None, None) => Ok(None),
        _ => anyhow::bail!("ADMIN_USERNAME and ADMIN_PASSWORD must be set together"),
    }
}

/// Reads `key`, falling back to `default` when unset
fn var_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

/// Splits a comma-separated origin list, dropping empty entries
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_URL` or `JWT_SECRET` is missing
    /// - `JWT_SECRET` is shorter than 32 characters
    /// - A numeric or boolean variable does not parse
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = var_or("API_PORT", 8080u16)?;
        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));
        let production = var_or("PRODUCTION", false)?;
        let json_logs = env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = var_or("DATABASE_MAX_CONNECTIONS", 10u32)?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_JWT_SECRET_LEN);
        }
        let access_ttl_secs = var_or("JWT_ACCESS_TTL_SECS", 900i64)?;
        if access_ttl_secs <= 0 {
            anyhow::bail!("JWT_ACCESS_TTL_SECS must be positive");
        }

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: var_or("PASSWORD_MEMORY_KIB", defaults.memory_kib)?,
            iterations: var_or("PASSWORD_ITERATIONS", defaults.iterations)?,
            parallelism: var_or("PASSWORD_PARALLELISM", defaults.parallelism)?,
        };

        let bootstrap = initial_admin(env::var("ADMIN_USERNAME").ok(), env::var("ADMIN_PASSWORD").ok())?;

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production,
                json_logs,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                access_ttl_secs,
            },
            password,
            bootstrap,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

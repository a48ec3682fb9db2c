/// Password hashing module using Argon2id
///
/// Hashes are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`) with a
/// fresh random salt per call, so hashing the same password twice yields
/// different strings that both verify.
///
/// # Cost
///
/// Cost is configurable through [`PasswordParams`]. The defaults (64 MB,
/// 3 passes, 4 lanes) are meant for production; tests use much cheaper
/// settings.
///
/// Hashing is CPU-bound. Async callers should use [`PasswordHasher::hash_async`]
/// and [`PasswordHasher::verify_async`], which run on tokio's blocking pool.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::{PasswordHasher, PasswordParams};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = PasswordHasher::new(PasswordParams::default())?;
/// let hash = hasher.hash("super_secret_password_123")?;
///
/// assert!(hasher.verify("super_secret_password_123", &hash)?);
/// assert!(!hasher.verify("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),

    /// Invalid cost parameters
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordParams {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes
    pub iterations: u32,

    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Argon2id hasher with fixed cost parameters
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Creates a hasher, validating the cost parameters
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidParams` if Argon2 rejects the
    /// parameters (e.g. memory below 8 KiB per lane).
    pub fn new(params: PasswordParams) -> Result<Self, PasswordError> {
        let params = ParamsBuilder::new()
            .m_cost(params.memory_kib)
            .t_cost(params.iterations)
            .p_cost(params.parallelism)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self { params })
    }

    /// Hashes a password with a fresh random salt
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::HashError` if hashing fails
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored hash
    ///
    /// Cost parameters are read from the hash itself, so hashes produced with
    /// older settings keep verifying.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the password matches, `Ok(false)` if it doesn't
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn hash_async(&self, password: String) -> Result<String, PasswordError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::HashError(format!("Hashing task failed: {}", e)))?
    }

    /// [`verify`](Self::verify) on the blocking thread pool
    pub async fn verify_async(&self, password: String, hash: String) -> Result<bool, PasswordError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| PasswordError::VerifyError(format!("Verification task failed: {}", e)))?
    }
}

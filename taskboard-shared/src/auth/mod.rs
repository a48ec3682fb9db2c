/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 access token creation and validation
/// - [`middleware`]: Bearer header parsing into an [`middleware::AuthContext`]

pub mod jwt;
pub mod middleware;
pub mod password;

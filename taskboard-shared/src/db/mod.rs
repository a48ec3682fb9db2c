/// Database layer
///
/// - `pool`: PostgreSQL connection pool with a health check
/// - `migrations`: embedded schema migrations
///
/// Queries live with the PostgreSQL repositories in
/// [`crate::repository::postgres`].

pub mod migrations;
pub mod pool;

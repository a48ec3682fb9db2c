//! # Taskboard Shared Library
//!
//! Domain types, persistence, and credential handling used by the Taskboard
//! API server.
//!
//! ## Module Organization
//!
//! - `models`: User and Task records plus the public user projection
//! - `repository`: Store traits with PostgreSQL and in-memory backends
//! - `auth`: Password hashing, JWT access tokens, bearer extraction
//! - `db`: Connection pooling and schema migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod repository;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

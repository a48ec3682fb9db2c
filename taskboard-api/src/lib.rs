//! # Taskboard API Server Library
//!
//! User administration API for the taskboard service.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `bootstrap`: Initial admin on an empty store
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Response security headers
//! - `routes`: API route handlers

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;

//! # Onboard Shared Library
//!
//! Storage, domain models, authentication primitives and the path classifier
//! used by the Onboard API server.
//!
//! ## Module Organization
//!
//! - `db`: SQLite pool and embedded migrations
//! - `models`: Users, onboarding paths and checklist progress
//! - `auth`: Password hashing, session tokens, bearer authentication
//! - `classifier`: Completion providers and onboarding path classification

pub mod auth;
pub mod classifier;
pub mod db;
pub mod models;

/// Current version of the Onboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

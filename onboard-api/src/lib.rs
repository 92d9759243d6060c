//! # Onboard API Server Library
//!
//! HTTP surface of the onboarding backend: account signup and login, the
//! profile form that assigns an onboarding path, checklist progress and the
//! admin user list.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validating JSON extractor
//! - `response`: Success envelope
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;

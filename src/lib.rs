//! lms-iam - authentication and authorization for the course platform
//!
//! Sign-up and sign-in with bcrypt-hashed credentials, JWT access/refresh
//! token pairs with single-use refresh rotation, and role-based guards for
//! axum routes.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;

pub use config::Config;
pub use error::Error;

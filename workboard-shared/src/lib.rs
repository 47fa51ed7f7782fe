//! # Workboard Shared Library
//!
//! Domain types, persistence and business logic behind the Workboard API.
//!
//! ## Module Organization
//!
//! - `auth`: Tokens, passwords, Google sign-in, roles and the workspace gate
//! - `db`: Connection pool, migrations and role seeding
//! - `models`: Database models and data structures
//! - `services`: Business operations used by the HTTP handlers

pub mod auth;
pub mod db;
pub mod models;
pub mod services;

/// Current version of the Workboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

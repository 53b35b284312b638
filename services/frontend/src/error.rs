//! services/frontend/src/error.rs
//!
//! Defines the error types for the session layer and the front-end service as a whole.

use crate::config::ConfigError;
use booking_auth_core::ports::PortError;

/// Failures surfaced by `SessionService` operations that are not folded into an `AuthResult`.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A profile update was attempted while no identity is signed in.
    #[error("No authenticated user")]
    NotAuthenticated,

    #[error(transparent)]
    Port(#[from] PortError),
}

/// The primary error type for the `frontend` service.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

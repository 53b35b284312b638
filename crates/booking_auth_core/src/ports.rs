//! crates/booking_auth_core/src/ports.rs
//!
//! Defines the service contracts (traits) for authentication and profile storage.
//! These traits form the boundary of the hexagonal architecture, allowing the session
//! logic to be independent of a specific identity provider or document store.

use async_trait::async_trait;
use futures::Stream;
use std::fmt;
use std::pin::Pin;
use crate::domain::{Identity, Profile, ProfileUpdate};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// Broad classes of identity provider rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidEmail,
    WeakPassword,
    EmailAlreadyInUse,
    WrongPassword,
    UserNotFound,
    TooManyRequests,
    Other,
}

impl AuthErrorKind {
    /// Classifies a provider error code such as `auth/wrong-password`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/invalid-email" => Self::InvalidEmail,
            "auth/weak-password" => Self::WeakPassword,
            "auth/email-already-in-use" => Self::EmailAlreadyInUse,
            "auth/wrong-password" | "auth/invalid-credential" => Self::WrongPassword,
            "auth/user-not-found" => Self::UserNotFound,
            "auth/too-many-requests" => Self::TooManyRequests,
            _ => Self::Other,
        }
    }
}

/// A rejection reported by the identity provider.
///
/// `code` is the provider's own code, passed through unmodified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub code: String,
    pub message: String,
}

impl AuthError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            kind: AuthErrorKind::from_code(&code),
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Unavailable,
    PermissionDenied,
    Unknown,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unavailable => "unavailable",
            Self::PermissionDenied => "permission denied",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// A failure reading or writing profile documents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Profile store {kind}: {message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (provider, database, network).
#[derive(Debug, Clone, thiserror::Error)]
pub enum PortError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// A stream of auth-state events. `None` means nobody is signed in.
pub type AuthStateStream = Pin<Box<dyn Stream<Item = Option<Identity>> + Send>>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CredentialGateway: Send + Sync {
    /// Registers a new account. On success the new identity is signed in.
    async fn sign_up(&self, email: &str, password: &str) -> PortResult<Identity>;

    async fn sign_in(&self, email: &str, password: &str) -> PortResult<Identity>;

    async fn sign_out(&self) -> PortResult<()>;

    /// Removes an account, signing it out first if it is the current identity.
    async fn delete_identity(&self, uid: &str) -> PortResult<()>;

    /// Subscribes to identity changes.
    ///
    /// The stream yields the current identity first and then one item per change.
    /// Dropping the stream unsubscribes.
    fn subscribe_auth_state(&self) -> AuthStateStream;

    fn current_identity(&self) -> Option<Identity>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Writes a full profile record, stamping `created_at` and `updated_at` with store time.
    async fn create_profile(&self, uid: &str, email: &str, name: &str) -> PortResult<()>;

    /// Point lookup. `Ok(None)` when no document exists.
    async fn get_profile(&self, uid: &str) -> PortResult<Option<Profile>>;

    /// Merges the provided fields and refreshes `updated_at`.
    async fn update_profile(&self, uid: &str, update: &ProfileUpdate) -> PortResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_codes_are_classified_and_kept() {
        let err = AuthError::new("auth/wrong-password", "Wrong password");
        assert_eq!(err.kind, AuthErrorKind::WrongPassword);
        assert_eq!(err.code, "auth/wrong-password");
        assert_eq!(err.to_string(), "Wrong password");

        let err = AuthError::new("auth/quota-exceeded", "Quota exceeded");
        assert_eq!(err.kind, AuthErrorKind::Other);
        assert_eq!(err.code, "auth/quota-exceeded");
    }

    #[test]
    fn port_error_display() {
        let err: PortError = AuthError::new("auth/user-not-found", "No such account").into();
        assert_eq!(err.to_string(), "No such account");

        let err: PortError = StoreError::new(StoreErrorKind::PermissionDenied, "rules").into();
        assert_eq!(err.to_string(), "Profile store permission denied: rules");
    }
}

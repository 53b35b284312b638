//! crates/booking_auth_core/src/domain.rs
//!
//! Defines the pure, core data structures for authentication and profiles.
//! These structs are independent of any provider SDK, database or serialization format.

use chrono::{DateTime, Utc};

/// An account record issued by the identity provider.
///
/// This system never mutates an identity; it only receives one from a successful
/// sign-up or sign-in and forgets it on sign-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub session_token: String,
}

/// The application-owned document mirroring display data for an `Identity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A partial profile write. Only the fields that are `Some` are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

// Only used for sign-up - contains the clear-text password
#[derive(Debug, Clone)]
pub struct SignUpData {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct SignInData {
    pub email: String,
    pub password: String,
}

/// The non-throwing outcome of a sign-up or sign-in.
///
/// Callers must check `success`; a failed attempt carries a non-empty `error`
/// and never a `user`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub success: bool,
    pub user: Option<Profile>,
    pub error: Option<String>,
}

impl AuthResult {
    pub fn succeeded(user: Profile) -> Self {
        Self {
            success: true,
            user: Some(user),
            error: None,
        }
    }

    /// Builds a failed result. An empty message is replaced by `fallback`.
    pub fn failed(message: impl Into<String>, fallback: &str) -> Self {
        let message = message.into();
        let error = if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        };
        Self {
            success: false,
            user: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_result_never_has_empty_error() {
        let result = AuthResult::failed("  ", "Sign in failed");
        assert!(!result.success);
        assert!(result.user.is_none());
        assert_eq!(result.error.as_deref(), Some("Sign in failed"));

        let result = AuthResult::failed("Wrong password", "Sign in failed");
        assert_eq!(result.error.as_deref(), Some("Wrong password"));
    }
}

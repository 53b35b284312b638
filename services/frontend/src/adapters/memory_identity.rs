//! services/frontend/src/adapters/memory_identity.rs
//!
//! An in-process identity provider implementing the `CredentialGateway` port.
//! It behaves like the hosted provider from the caller's point of view: the same
//! error codes, a single current identity, and an auth-state subscription.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use booking_auth_core::domain::Identity;
use booking_auth_core::ports::{
    AuthError, AuthStateStream, CredentialGateway, PortError, PortResult,
};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::{watch, Mutex};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Tunables for credential validation and throttling.
#[derive(Clone, Debug)]
pub struct IdentitySettings {
    pub min_password_length: usize,
    pub max_failed_attempts: u32,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            min_password_length: 6,
            max_failed_attempts: 5,
        }
    }
}

struct Account {
    uid: String,
    password_hash: String,
    failed_attempts: u32,
}

pub struct MemoryIdentityProvider {
    settings: IdentitySettings,
    /// Keyed by normalized (trimmed, lowercased) email.
    accounts: Mutex<HashMap<String, Account>>,
    current: watch::Sender<Option<Identity>>,
}

impl MemoryIdentityProvider {
    pub fn new(settings: IdentitySettings) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            settings,
            accounts: Mutex::new(HashMap::new()),
            current,
        }
    }

    fn start_session(&self, uid: String, email: String) -> Identity {
        let identity = Identity {
            uid,
            email,
            session_token: Uuid::new_v4().to_string(),
        };
        self.current.send_replace(Some(identity.clone()));
        identity
    }
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new(IdentitySettings::default())
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

fn normalize_email(email: &str) -> PortResult<String> {
    let email = email.trim().to_lowercase();
    if !email_pattern().is_match(&email) {
        return Err(AuthError::new("auth/invalid-email", "The email address is badly formatted.").into());
    }
    Ok(email)
}

fn hash_password(password: &str) -> PortResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            PortError::Unexpected("Failed to hash password".to_string())
        })
}

fn verify_password(password: &str, password_hash: &str) -> PortResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        PortError::Unexpected("Authentication error".to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[async_trait]
impl CredentialGateway for MemoryIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> PortResult<Identity> {
        let email = normalize_email(email)?;
        if password.chars().count() < self.settings.min_password_length {
            return Err(AuthError::new(
                "auth/weak-password",
                format!(
                    "Password should be at least {} characters",
                    self.settings.min_password_length
                ),
            )
            .into());
        }

        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(&email) {
            return Err(AuthError::new(
                "auth/email-already-in-use",
                "The email address is already in use by another account.",
            )
            .into());
        }

        let uid = Uuid::new_v4().simple().to_string();
        accounts.insert(
            email.clone(),
            Account {
                uid: uid.clone(),
                password_hash: hash_password(password)?,
                failed_attempts: 0,
            },
        );
        drop(accounts);

        info!(uid = %uid, "Registered new identity");
        Ok(self.start_session(uid, email))
    }

    async fn sign_in(&self, email: &str, password: &str) -> PortResult<Identity> {
        let email = normalize_email(email)?;

        let mut accounts = self.accounts.lock().await;
        let account = accounts.get_mut(&email).ok_or_else(|| {
            AuthError::new(
                "auth/user-not-found",
                "There is no user record corresponding to this identifier.",
            )
        })?;

        if account.failed_attempts >= self.settings.max_failed_attempts {
            warn!(uid = %account.uid, "Sign-in throttled");
            return Err(AuthError::new(
                "auth/too-many-requests",
                "Access to this account has been temporarily disabled due to many failed login attempts.",
            )
            .into());
        }

        if !verify_password(password, &account.password_hash)? {
            account.failed_attempts += 1;
            warn!(
                uid = %account.uid,
                attempts = account.failed_attempts,
                "Rejected sign-in: wrong password"
            );
            return Err(AuthError::new(
                "auth/wrong-password",
                "The password is invalid or the user does not have a password.",
            )
            .into());
        }

        account.failed_attempts = 0;
        let uid = account.uid.clone();
        drop(accounts);

        info!(uid = %uid, "Identity signed in");
        Ok(self.start_session(uid, email))
    }

    async fn sign_out(&self) -> PortResult<()> {
        self.current.send_if_modified(|current| current.take().is_some());
        Ok(())
    }

    async fn delete_identity(&self, uid: &str) -> PortResult<()> {
        let mut accounts = self.accounts.lock().await;
        let before = accounts.len();
        accounts.retain(|_, account| account.uid != uid);
        if accounts.len() == before {
            return Err(PortError::NotFound(format!("Identity {} not found", uid)));
        }
        drop(accounts);

        self.current.send_if_modified(|current| {
            if current.as_ref().is_some_and(|identity| identity.uid == uid) {
                *current = None;
                true
            } else {
                false
            }
        });
        info!(uid = %uid, "Deleted identity");
        Ok(())
    }

    fn subscribe_auth_state(&self) -> AuthStateStream {
        let receiver = self.current.subscribe();
        Box::pin(futures::stream::unfold(
            (receiver, true),
            |(mut receiver, first)| async move {
                if !first && receiver.changed().await.is_err() {
                    return None;
                }
                let identity = receiver.borrow_and_update().clone();
                Some((identity, (receiver, false)))
            },
        ))
    }

    fn current_identity(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }
}

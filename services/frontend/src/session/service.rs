//! services/frontend/src/session/service.rs
//!
//! The orchestration unit: listens to the identity provider, mirrors the profile
//! document for whoever is signed in, and publishes the result.

use crate::config::{MissingProfilePolicy, SessionConfig};
use crate::error::SessionError;
use crate::session::guard::RouteGuard;
use crate::session::state::{SessionPublisher, SessionSnapshot};
use booking_auth_core::domain::{AuthResult, Identity, Profile, ProfileUpdate, SignInData, SignUpData};
use booking_auth_core::ports::{AuthStateStream, CredentialGateway, PortError, PortResult, ProfileStore};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

struct Inner {
    gateway: Arc<dyn CredentialGateway>,
    profiles: Arc<dyn ProfileStore>,
    state: SessionPublisher,
    config: SessionConfig,
}

/// Holds the session state for the lifetime of the front-end process.
///
/// Dropping the service stops its auth-state listener.
pub struct SessionService {
    inner: Arc<Inner>,
    shutdown: CancellationToken,
}

impl SessionService {
    /// Creates the service and registers its auth-state listener.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        gateway: Arc<dyn CredentialGateway>,
        profiles: Arc<dyn ProfileStore>,
        config: SessionConfig,
    ) -> Self {
        let inner = Arc::new(Inner {
            gateway,
            profiles,
            state: SessionPublisher::new(),
            config,
        });
        let shutdown = CancellationToken::new();

        let events = inner.gateway.subscribe_auth_state();
        tokio::spawn(listen(inner.clone(), events, shutdown.clone()));

        Self { inner, shutdown }
    }

    //=====================================================================================
    // Credential operations
    //=====================================================================================

    /// Registers an account and its profile. Never fails; check `AuthResult::success`.
    pub async fn sign_up(&self, data: &SignUpData) -> AuthResult {
        match self.try_sign_up(data).await {
            Ok(profile) => {
                info!(uid = %profile.uid, "Sign-up complete");
                AuthResult::succeeded(profile)
            }
            Err(e) => {
                warn!("Sign-up failed: {}", e);
                AuthResult::failed(e.to_string(), "Sign up failed")
            }
        }
    }

    async fn try_sign_up(&self, data: &SignUpData) -> PortResult<Profile> {
        let identity = self.inner.gateway.sign_up(&data.email, &data.password).await?;

        if let Err(e) = self
            .inner
            .profiles
            .create_profile(&identity.uid, &data.email, &data.name)
            .await
        {
            error!(uid = %identity.uid, "Profile creation failed, removing the new identity: {}", e);
            if let Err(cleanup) = self.inner.gateway.delete_identity(&identity.uid).await {
                error!(uid = %identity.uid, "Failed to remove orphaned identity: {}", cleanup);
            }
            return Err(e);
        }

        let profile = self.inner.fetch_profile(&identity.uid).await?;
        self.inner.publish_profile(profile.clone());
        Ok(profile)
    }

    /// Signs in with email and password. Never fails; check `AuthResult::success`.
    pub async fn sign_in(&self, data: &SignInData) -> AuthResult {
        match self.try_sign_in(data).await {
            Ok(profile) => {
                info!(uid = %profile.uid, "Sign-in complete");
                AuthResult::succeeded(profile)
            }
            Err(e) => {
                warn!("Sign-in failed: {}", e);
                AuthResult::failed(e.to_string(), "Sign in failed")
            }
        }
    }

    async fn try_sign_in(&self, data: &SignInData) -> PortResult<Profile> {
        let identity = self.inner.gateway.sign_in(&data.email, &data.password).await?;

        let profile = match self.inner.profiles.get_profile(&identity.uid).await? {
            Some(profile) => profile,
            None => self.reconcile_missing_profile(&identity).await?,
        };

        self.inner.publish_profile(profile.clone());
        Ok(profile)
    }

    async fn reconcile_missing_profile(&self, identity: &Identity) -> PortResult<Profile> {
        match self.inner.config.missing_profile_policy {
            MissingProfilePolicy::CreatePlaceholder => {
                warn!(uid = %identity.uid, "No profile for signed-in identity, creating a placeholder");
                self.inner
                    .profiles
                    .create_profile(&identity.uid, &identity.email, placeholder_name(&identity.email))
                    .await?;
                self.inner.fetch_profile(&identity.uid).await
            }
            MissingProfilePolicy::SignOut => {
                warn!(uid = %identity.uid, "No profile for signed-in identity, signing out");
                if let Err(e) = self.inner.gateway.sign_out().await {
                    error!(uid = %identity.uid, "Failed to sign out identity without profile: {}", e);
                }
                Err(PortError::NotFound(
                    "No profile exists for this account".to_string(),
                ))
            }
        }
    }

    /// Signs out at the provider. Failures are returned, not swallowed.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        self.inner.gateway.sign_out().await.map_err(|e| {
            error!("Sign out error: {}", e);
            e
        })?;
        self.inner.state.publish(SessionSnapshot::signed_out());
        info!("Signed out");
        Ok(())
    }

    //=====================================================================================
    // Profile operations
    //=====================================================================================

    /// Merges `update` into the signed-in user's profile and republishes it.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, SessionError> {
        let identity = self
            .inner
            .gateway
            .current_identity()
            .ok_or(SessionError::NotAuthenticated)?;

        self.inner.profiles.update_profile(&identity.uid, update).await?;
        let profile = self.inner.fetch_profile(&identity.uid).await?;
        self.inner.publish_profile(profile.clone());
        Ok(profile)
    }

    //=====================================================================================
    // Published state
    //=====================================================================================

    pub fn current_user(&self) -> Option<Profile> {
        self.inner.state.snapshot().current_user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.snapshot().is_authenticated()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.state.subscribe()
    }

    /// A guard redirecting to the configured sign-in route.
    pub fn route_guard(&self) -> RouteGuard {
        RouteGuard::new(self.subscribe(), self.inner.config.sign_in_route.clone())
    }
}

impl Drop for SessionService {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl Inner {
    async fn fetch_profile(&self, uid: &str) -> PortResult<Profile> {
        self.profiles
            .get_profile(uid)
            .await?
            .ok_or_else(|| PortError::NotFound(format!("Profile {} not found", uid)))
    }

    /// Publishes `profile` as the current user if its identity is still the provider's current one.
    fn publish_profile(&self, profile: Profile) {
        let uid = profile.uid.clone();
        let published = self.state.publish_when(SessionSnapshot::signed_in(profile), || {
            self.gateway
                .current_identity()
                .is_some_and(|identity| identity.uid == uid)
        });
        if !published {
            debug!(uid = %uid, "Identity changed before publish, skipping");
        }
    }
}

/// Display name for a profile created without one: the email's local part.
fn placeholder_name(email: &str) -> &str {
    email
        .split('@')
        .next()
        .filter(|local| !local.is_empty())
        .unwrap_or(email)
}

//=========================================================================================
// Auth-state listener
//=========================================================================================

async fn listen(inner: Arc<Inner>, mut events: AuthStateStream, shutdown: CancellationToken) {
    debug!("Auth-state listener started");
    loop {
        let event = tokio::select! {
            _ = shutdown.cancelled() => break,
            event = events.next() => event,
        };

        match event {
            Some(Some(identity)) => {
                if inner
                    .gateway
                    .current_identity()
                    .is_some_and(|current| current.uid == identity.uid)
                {
                    let generation = inner.state.advance();
                    tokio::spawn(fetch_and_publish(inner.clone(), identity, generation));
                } else {
                    debug!(uid = %identity.uid, "Skipping superseded sign-in event");
                }
            }
            Some(None) => {
                // A late event must not undo a sign-in that happened since.
                if inner.gateway.current_identity().is_none() {
                    inner.state.publish(SessionSnapshot::signed_out());
                }
            }
            None => {
                warn!("Auth-state stream ended");
                break;
            }
        }
    }
    debug!("Auth-state listener stopped");
}

async fn fetch_and_publish(inner: Arc<Inner>, identity: Identity, generation: u64) {
    let snapshot = match inner.profiles.get_profile(&identity.uid).await {
        Ok(Some(profile)) => SessionSnapshot::signed_in(profile),
        Ok(None) => {
            warn!(uid = %identity.uid, "Identity has no profile document, treating as signed out");
            SessionSnapshot::signed_out()
        }
        Err(e) => {
            error!(uid = %identity.uid, "Failed to fetch profile after auth-state change: {}", e);
            return;
        }
    };

    if !inner.state.publish_if_current(generation, snapshot) {
        debug!(uid = %identity.uid, generation, "Dropped stale profile fetch");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_name_uses_local_part() {
        assert_eq!(placeholder_name("alice@x.com"), "alice");
        assert_eq!(placeholder_name("@x.com"), "@x.com");
    }
}

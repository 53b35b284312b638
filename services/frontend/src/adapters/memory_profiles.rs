//! services/frontend/src/adapters/memory_profiles.rs
//!
//! An in-process document store implementing the `ProfileStore` port.

use async_trait::async_trait;
use booking_auth_core::domain::{Profile, ProfileUpdate};
use booking_auth_core::ports::{PortError, PortResult, ProfileStore};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryProfileStore {
    documents: RwLock<HashMap<String, Profile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a document behind the session layer's back, the way an
    /// administrator might in the hosted console.
    pub async fn remove_profile(&self, uid: &str) -> Option<Profile> {
        self.documents.write().await.remove(uid)
    }
}

/// Store time, forced strictly past `previous` so successive writes are ordered.
fn store_time(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(previous) if now <= previous => previous + Duration::microseconds(1),
        _ => now,
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn create_profile(&self, uid: &str, email: &str, name: &str) -> PortResult<()> {
        let mut documents = self.documents.write().await;
        let previous = documents.get(uid).and_then(|p| p.updated_at);
        let now = store_time(previous);
        documents.insert(
            uid.to_string(),
            Profile {
                uid: uid.to_string(),
                email: email.to_string(),
                name: name.to_string(),
                photo_url: None,
                created_at: now,
                updated_at: Some(now),
            },
        );
        Ok(())
    }

    async fn get_profile(&self, uid: &str) -> PortResult<Option<Profile>> {
        Ok(self.documents.read().await.get(uid).cloned())
    }

    async fn update_profile(&self, uid: &str, update: &ProfileUpdate) -> PortResult<()> {
        let mut documents = self.documents.write().await;
        let profile = documents
            .get_mut(uid)
            .ok_or_else(|| PortError::NotFound(format!("Profile {} not found", uid)))?;

        if let Some(name) = &update.name {
            profile.name = name.clone();
        }
        if let Some(photo_url) = &update.photo_url {
            profile.photo_url = Some(photo_url.clone());
        }
        profile.updated_at = Some(store_time(profile.updated_at));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_get() {
        let store = MemoryProfileStore::new();
        assert!(store.get_profile("u1").await.unwrap().is_none());

        store.create_profile("u1", "a@x.com", "Alice").await.unwrap();
        let profile = store.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.uid, "u1");
        assert_eq!(profile.email, "a@x.com");
        assert_eq!(profile.name, "Alice");
        assert!(profile.photo_url.is_none());
        assert_eq!(profile.updated_at, Some(profile.created_at));
    }

    #[tokio::test]
    async fn update_merges_only_provided_fields() {
        let store = MemoryProfileStore::new();
        store.create_profile("u1", "a@x.com", "Alice").await.unwrap();

        let update = ProfileUpdate {
            photo_url: Some("https://x/y.jpg".to_string()),
            ..Default::default()
        };
        store.update_profile("u1", &update).await.unwrap();

        let profile = store.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.name, "Alice");
        assert_eq!(profile.photo_url.as_deref(), Some("https://x/y.jpg"));
    }

    #[tokio::test]
    async fn empty_update_only_touches_timestamp() {
        let store = MemoryProfileStore::new();
        store.create_profile("u1", "a@x.com", "Alice").await.unwrap();
        let before = store.get_profile("u1").await.unwrap().unwrap();

        store.update_profile("u1", &ProfileUpdate::default()).await.unwrap();
        let after = store.get_profile("u1").await.unwrap().unwrap();

        assert_eq!(after.name, before.name);
        assert_eq!(after.photo_url, before.photo_url);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn update_missing_document() {
        let store = MemoryProfileStore::new();
        let result = store.update_profile("ghost", &ProfileUpdate::default()).await;
        assert!(matches!(result, Err(PortError::NotFound(_))));
    }
}

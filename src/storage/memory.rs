//! In-memory session storage for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::SessionStorage;
use crate::error::Result;
use crate::models::session::Session;

/// In-memory session storage, primarily for testing.
pub struct MemorySessionStorage {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStorage {
    /// Create a new empty in-memory storage.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemorySessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self, profile: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(profile).cloned())
    }

    async fn save(&self, profile: &str, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(profile.to_string(), session.clone());
        Ok(())
    }

    async fn remove(&self, profile: &str) -> Result<()> {
        self.sessions.write().await.remove(profile);
        Ok(())
    }

    async fn exists(&self, profile: &str) -> Result<bool> {
        Ok(self.sessions.read().await.contains_key(profile))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::cookies::CookieJar;
    use crate::models::location::Location;
    use crate::models::session::{AccessToken, Credentials};
    use chrono::Utc;

    fn session() -> Session {
        Session {
            credentials: Credentials::new("user", "pass"),
            access_token: AccessToken {
                kind: "Bearer".into(),
                token: "ACCESS".into(),
                id_token: "ID".into(),
                expires_at: Utc::now(),
            },
            entitlements_token: "ENT".into(),
            cookies: CookieJar::default(),
            location: Location::europe(),
            user_id: uuid::Uuid::new_v4(),
            has_expired: false,
        }
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemorySessionStorage::new();

        assert!(storage.load("main").await.unwrap().is_none());
        assert!(!storage.exists("main").await.unwrap());

        let session = session();
        storage.save("main", &session).await.unwrap();

        assert!(storage.exists("main").await.unwrap());
        let loaded = storage.load("main").await.unwrap().unwrap();
        assert_eq!(loaded.user_id, session.user_id);

        storage.remove("main").await.unwrap();
        assert!(!storage.exists("main").await.unwrap());
    }
}

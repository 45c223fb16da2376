//! Storage backends for persisting sessions between runs.
//!
//! The library never persists a session on its own; callers pick a backend
//! (or implement their own) and decide when to save. Provided:
//! - [`FileSessionStorage`] - JSON file with 0600 permissions
//! - [`MemorySessionStorage`] - In-memory (testing)

mod file;
mod memory;

use async_trait::async_trait;

pub use file::FileSessionStorage;
pub use memory::MemorySessionStorage;

use crate::error::Result;
use crate::models::session::Session;

/// Trait for session storage backends.
///
/// All operations take a `profile` parameter so one backend can hold several
/// accounts' sessions.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Load the stored session for a profile.
    async fn load(&self, profile: &str) -> Result<Option<Session>>;

    /// Save the session for a profile.
    async fn save(&self, profile: &str, session: &Session) -> Result<()>;

    /// Remove the stored session for a profile.
    async fn remove(&self, profile: &str) -> Result<()>;

    /// Check if a session exists for a profile.
    async fn exists(&self, profile: &str) -> Result<bool> {
        Ok(self.load(profile).await?.is_some())
    }

    /// Name of this storage backend.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Blanket impl for `Arc<T>`.
#[async_trait]
impl<T: SessionStorage + ?Sized> SessionStorage for std::sync::Arc<T> {
    async fn load(&self, profile: &str) -> Result<Option<Session>> {
        (**self).load(profile).await
    }
    async fn save(&self, profile: &str, session: &Session) -> Result<()> {
        (**self).save(profile, session).await
    }
    async fn remove(&self, profile: &str) -> Result<()> {
        (**self).remove(profile).await
    }
    async fn exists(&self, profile: &str) -> Result<bool> {
        (**self).exists(profile).await
    }
    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Blanket impl for `Box<T>`.
#[async_trait]
impl<T: SessionStorage + ?Sized> SessionStorage for Box<T> {
    async fn load(&self, profile: &str) -> Result<Option<Session>> {
        (**self).load(profile).await
    }
    async fn save(&self, profile: &str, session: &Session) -> Result<()> {
        (**self).save(profile, session).await
    }
    async fn remove(&self, profile: &str) -> Result<()> {
        (**self).remove(profile).await
    }
    async fn exists(&self, profile: &str) -> Result<bool> {
        (**self).exists(profile).await
    }
    fn name(&self) -> &str {
        (**self).name()
    }
}

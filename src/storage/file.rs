//! File-based session storage with secure permissions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

use super::SessionStorage;
use crate::error::{Error, Result};
use crate::models::session::Session;

/// File-based session storage using JSON with 0600 permissions.
///
/// The stored session contains credentials and auth cookies; anything beyond
/// a local single-user file should go through a custom [`SessionStorage`]
/// backed by an actual secret store.
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Create storage at the specified path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create storage at the default path:
    /// `~/.config/valorant-gateway/sessions.json`
    pub fn default_path() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot determine config directory".into()))?;
        let path = config_dir.join("valorant-gateway").join("sessions.json");
        Ok(Self::new(path))
    }

    fn read_all(&self) -> Result<HashMap<String, Session>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::storage_io(&self.path, e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content).map_err(|e| Error::StorageSerialization(e.to_string()))
    }

    fn write_all(&self, data: &HashMap<String, Session>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::storage_io(parent, e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(data)
            .map_err(|e| Error::StorageSerialization(e.to_string()))?;
        std::fs::write(&self.path, &content)
            .map_err(|e| Error::storage_io(&self.path, e.to_string()))?;

        // Set 0600 permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)
                .map_err(|e| Error::storage_io(&self.path, format!("chmod: {}", e)))?;
        }

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self, profile: &str) -> Result<Option<Session>> {
        let data = self.read_all()?;
        Ok(data.get(profile).cloned())
    }

    async fn save(&self, profile: &str, session: &Session) -> Result<()> {
        let mut data = self.read_all()?;
        data.insert(profile.to_string(), session.clone());
        self.write_all(&data)
    }

    async fn remove(&self, profile: &str) -> Result<()> {
        let mut data = self.read_all()?;
        data.remove(profile);
        self.write_all(&data)
    }

    fn name(&self) -> &str {
        "file"
    }
}

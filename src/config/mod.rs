// src/config/mod.rs
//
// Client configuration
//
// A single JSON file in the application data directory holds everything
// the client needs across launches: API base URL, the signed-in session,
// and a device id generated on first run.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_BASE_URL: &str = "https://api.storyhub.app/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,

    /// Bearer token for the signed-in session, if any
    pub session_token: Option<String>,

    /// User id of the signed-in session, if any
    pub session_user_id: Option<i64>,

    /// Stable per-installation identifier, sent with every request
    pub device_id: Uuid,

    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_token: None,
            session_user_id: None,
            device_id: Uuid::new_v4(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Get the config file path: {APP_DATA}/storyhub/config.json
pub fn get_config_path() -> AppResult<PathBuf> {
    let app_data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Other("Could not determine app data directory".to_string()))?;

    let storyhub_dir = app_data_dir.join("storyhub");
    std::fs::create_dir_all(&storyhub_dir).map_err(AppError::Io)?;

    Ok(storyhub_dir.join("config.json"))
}

/// Thread-safe handle to the persisted configuration
pub struct ConfigStore {
    path: PathBuf,
    config: RwLock<ClientConfig>,
}

impl ConfigStore {
    /// Load from the default location, creating the file on first run
    pub fn open_default() -> AppResult<Self> {
        Self::open(get_config_path()?)
    }

    /// Load from an explicit path, creating the file when missing
    pub fn open<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        let config = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            let fresh = ClientConfig::default();
            write_config(&path, &fresh)?;
            fresh
        };

        Ok(Self {
            path,
            config: RwLock::new(config),
        })
    }

    /// Snapshot of the current configuration
    pub fn get(&self) -> ClientConfig {
        self.config.read().unwrap().clone()
    }

    pub fn session_token(&self) -> Option<String> {
        self.config.read().unwrap().session_token.clone()
    }

    pub fn session_user_id(&self) -> Option<i64> {
        self.config.read().unwrap().session_user_id
    }

    pub fn device_id(&self) -> Uuid {
        self.config.read().unwrap().device_id
    }

    pub fn api_base_url(&self) -> String {
        self.config.read().unwrap().api_base_url.clone()
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.config.read().unwrap().request_timeout_secs
    }

    /// Store the signed-in session and persist
    pub fn set_session(&self, token: String, user_id: i64) -> AppResult<()> {
        let mut config = self.config.write().unwrap();
        config.session_token = Some(token);
        config.session_user_id = Some(user_id);
        write_config(&self.path, &config)
    }

    /// Drop the signed-in session and persist
    pub fn clear_session(&self) -> AppResult<()> {
        let mut config = self.config.write().unwrap();
        config.session_token = None;
        config.session_user_id = None;
        write_config(&self.path, &config)
    }
}

fn write_config(path: &Path, config: &ClientConfig) -> AppResult<()> {
    let raw = serde_json::to_string_pretty(config)?;
    std::fs::write(path, raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_creates_file_with_device_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let store = ConfigStore::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.session_token().is_none());

        // Device id must survive a reload
        let device_id = store.device_id();
        drop(store);

        let reloaded = ConfigStore::open(&path).unwrap();
        assert_eq!(reloaded.device_id(), device_id);
    }

    #[test]
    fn test_session_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let store = ConfigStore::open(&path).unwrap();
        store.set_session("tok_abc".to_string(), 42).unwrap();

        let reloaded = ConfigStore::open(&path).unwrap();
        assert_eq!(reloaded.session_token().as_deref(), Some("tok_abc"));
        assert_eq!(reloaded.session_user_id(), Some(42));

        reloaded.clear_session().unwrap();
        assert!(reloaded.session_token().is_none());
        assert!(reloaded.session_user_id().is_none());
    }
}

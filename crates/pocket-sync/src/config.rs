//! # Sync Configuration
//!
//! Configuration for the offline queue and its drain loop.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     POCKET_DEVICE_ID=abc-123                                           │
//! │     POCKET_BACKEND_URL=https://shop.example.com/api                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/pocket-pos/sync.toml (Linux)                             │
//! │     ~/Library/Application Support/com.pocket-pos.app/sync.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     auto_sync = true, retention_days = 7, generated device id          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # sync.toml
//! [device]
//! id = "550e8400-e29b-41d4-a716-446655440000"
//! name = "Register 1"
//!
//! [sync]
//! auto_sync = true
//! retention_days = 7
//! request_timeout_secs = 30
//!
//! [backend]
//! base_url = "https://shop.example.com/api"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Device Configuration
// =============================================================================

/// Configuration for this client device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Unique device identifier (UUID v4).
    /// Auto-generated on first run if not provided.
    pub id: String,

    /// Human-readable device name (e.g., "Register 1", "Back Office").
    #[serde(default = "default_device_name")]
    pub name: String,
}

fn default_device_name() -> String {
    "POS Terminal".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            id: Uuid::new_v4().to_string(),
            name: default_device_name(),
        }
    }
}

// =============================================================================
// Sync Settings
// =============================================================================

/// Drain behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Automatically drain the queue when connectivity returns.
    /// Default: true
    #[serde(default = "default_auto_sync")]
    pub auto_sync: bool,

    /// Retention window for synced sales, in days. Pending sales are never
    /// subject to retention.
    /// Default: 7
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,

    /// Per-request timeout for backend calls, in seconds.
    /// Default: 30
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_auto_sync() -> bool {
    true
}

fn default_retention_days() -> i64 {
    pocket_core::DEFAULT_RETENTION_DAYS
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            auto_sync: default_auto_sync(),
            retention_days: default_retention_days(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// =============================================================================
// Backend Configuration
// =============================================================================

/// REST backend endpoint settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the REST API (e.g., `https://shop.example.com/api`).
    /// Unset means the replay backend must be injected by the caller.
    #[serde(default)]
    pub base_url: Option<String>,
}

// =============================================================================
// Sync Config
// =============================================================================

/// Complete configuration for the sync engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Device identity.
    #[serde(default)]
    pub device: DeviceConfig,

    /// Drain behavior.
    #[serde(default)]
    pub sync: SyncSettings,

    /// REST backend endpoint.
    #[serde(default)]
    pub backend: BackendConfig,
}

impl SyncConfig {
    /// Loads configuration: defaults, then the config file (if present),
    /// then environment overrides.
    pub fn load() -> SyncResult<Self> {
        match Self::default_config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No home directory found, using default configuration");
                let mut config = SyncConfig::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    /// Loads configuration from an explicit TOML file path.
    ///
    /// A missing file is not an error; defaults are used. A present but
    /// unparseable file is an error - silently ignoring a user's config
    /// would be worse than failing loudly.
    pub fn load_from(path: &Path) -> SyncResult<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| SyncError::InvalidConfig(format!("read {}: {e}", path.display())))?;
            let parsed: SyncConfig = toml::from_str(&raw)
                .map_err(|e| SyncError::InvalidConfig(format!("parse {}: {e}", path.display())))?;
            debug!(path = %path.display(), "Loaded sync configuration");
            parsed
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            SyncConfig::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Default platform config file location.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "pocket-pos", "pocket-pos")
            .map(|dirs| dirs.config_dir().join("sync.toml"))
    }

    /// Applies `POCKET_*` environment variable overrides.
    fn apply_env(&mut self) {
        if let Ok(id) = std::env::var("POCKET_DEVICE_ID") {
            self.device.id = id;
        }
        if let Ok(name) = std::env::var("POCKET_DEVICE_NAME") {
            self.device.name = name;
        }
        if let Ok(url) = std::env::var("POCKET_BACKEND_URL") {
            self.backend.base_url = Some(url);
        }
        if let Ok(auto) = std::env::var("POCKET_AUTO_SYNC") {
            match auto.parse::<bool>() {
                Ok(value) => self.sync.auto_sync = value,
                Err(_) => warn!(value = %auto, "Ignoring unparseable POCKET_AUTO_SYNC"),
            }
        }
        if let Ok(days) = std::env::var("POCKET_RETENTION_DAYS") {
            match days.parse::<i64>() {
                Ok(value) => self.sync.retention_days = value,
                Err(_) => warn!(value = %days, "Ignoring unparseable POCKET_RETENTION_DAYS"),
            }
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        if self.device.id.trim().is_empty() {
            return Err(SyncError::InvalidConfig("device.id must not be empty".into()));
        }

        if self.sync.retention_days < 1 {
            return Err(SyncError::InvalidConfig(
                "sync.retention_days must be at least 1".into(),
            ));
        }

        if self.sync.request_timeout_secs == 0 {
            return Err(SyncError::InvalidConfig(
                "sync.request_timeout_secs must be at least 1".into(),
            ));
        }

        if let Some(url) = &self.backend.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SyncError::InvalidConfig(format!(
                    "backend.base_url must be an http(s) URL, got '{url}'"
                )));
            }
        }

        Ok(())
    }

    /// Retention window as a chrono duration.
    pub fn retention_window(&self) -> chrono::Duration {
        chrono::Duration::days(self.sync.retention_days)
    }

    /// Backend request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.sync.request_timeout_secs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

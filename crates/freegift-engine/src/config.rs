//! # Engine Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     FREEGIFT_STORE_ID=eu                                                │
//! │     FREEGIFT_MAX_GIFT_QTY=10                                            │
//! │     FREEGIFT_LOG=debug                                                  │
//! │     FREEGIFT_LOG_JSON=true                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/engine/engine.toml (Linux)                                │
//! │     ~/Library/Application Support/com.freegift.engine/engine.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! default_id = "default"
//!
//! [gift]
//! max_quantity = 999
//!
//! [logging]
//! filter = "info,freegift_engine=debug"
//! json = false
//! ```

use freegift_core::{StoreId, DEFAULT_STORE_ID, MAX_ITEM_QUANTITY};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};

// =============================================================================
// Store Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Store used for carts created without an explicit store.
    #[serde(default = "default_store_id")]
    pub default_id: String,
}

fn default_store_id() -> String {
    DEFAULT_STORE_ID.to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            default_id: default_store_id(),
        }
    }
}

// =============================================================================
// Gift Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftSettings {
    /// Largest gift quantity a rule may be saved with.
    #[serde(default = "default_max_quantity")]
    pub max_quantity: i64,
}

fn default_max_quantity() -> i64 {
    MAX_ITEM_QUANTITY
}

impl Default for GiftSettings {
    fn default() -> Self {
        GiftSettings {
            max_quantity: default_max_quantity(),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
            json: false,
        }
    }
}

// =============================================================================
// Main Engine Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub gift: GiftSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (engine.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides_from(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_toml(contents: &str) -> EngineResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> EngineResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| EngineError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Engine config saved");
        Ok(())
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.store.default_id.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "store.default_id must not be empty".into(),
            ));
        }

        if self.gift.max_quantity < 1 {
            return Err(EngineError::InvalidConfig(format!(
                "gift.max_quantity must be at least 1, got {}",
                self.gift.max_quantity
            )));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "logging.filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from `lookup` (the process environment in
    /// [`load`](Self::load)).
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup("FREEGIFT_STORE_ID") {
            debug!(store_id = %id, "Overriding default store from environment");
            self.store.default_id = id;
        }

        if let Some(qty) = lookup("FREEGIFT_MAX_GIFT_QTY") {
            match qty.parse::<i64>() {
                Ok(q) => self.gift.max_quantity = q,
                Err(_) => warn!(value = %qty, "Ignoring non-numeric FREEGIFT_MAX_GIFT_QTY"),
            }
        }

        if let Some(filter) = lookup("FREEGIFT_LOG") {
            self.logging.filter = filter;
        }

        if let Some(json) = lookup("FREEGIFT_LOG_JSON") {
            match json.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.logging.json = true,
                "0" | "false" | "no" => self.logging.json = false,
                _ => warn!(value = %json, "Unknown FREEGIFT_LOG_JSON value"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "freegift", "engine")
            .map(|dirs| dirs.config_dir().join("engine.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn default_store(&self) -> StoreId {
        StoreId::new(self.store.default_id.clone())
    }
}

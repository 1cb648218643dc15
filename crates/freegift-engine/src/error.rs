//! # Engine Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Engine Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Domain       │  │  Configuration  │  │     Reorder / Input     │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Core           │  │  InvalidConfig  │  │  Reorder                │ │
//! │  │  (ProductLookup,│  │  ConfigSave     │  │  Json                   │ │
//! │  │   LineNotFound) │  │  Io / Toml      │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Admin save rejections are not `EngineError`s: they carry the submitted
//! form and live in [`crate::admin::RuleSaveError`].

use freegift_core::CoreError;
use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// Domain failure (e.g. gift SKU no longer resolves).
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    // =========================================================================
    // Reorder / Input Errors
    // =========================================================================
    /// A persisted order line could not be turned back into a cart line.
    #[error("Cannot reorder {sku}: {reason}")]
    Reorder { sku: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Whether this is a gift/catalog SKU lookup failure.
    pub fn is_product_lookup(&self) -> bool {
        matches!(self, EngineError::Core(CoreError::ProductLookup { .. }))
    }
}

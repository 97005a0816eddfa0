//! Application settings loaded from `config.toml`.
//!
//! Every section is optional. A missing file yields the defaults, so a fresh checkout
//! runs against the local `SQLite` database with the ERP integration switched off.

use crate::entities::DocumentType;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default location of the settings file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Contents of the whole settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `[database]` section
    pub database: DatabaseSettings,
    /// `[erp]` section
    pub erp: ErpSettings,
}

/// Database settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Connection URL; `DATABASE_URL` takes precedence
    pub url: Option<String>,
}

/// ERP integration settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErpSettings {
    /// Whether issued documents are pushed to the ERP at all
    pub enabled: bool,
    /// Document types mirrored into the ERP
    pub document_types: Vec<DocumentType>,
}

/// Loads settings from a TOML file, falling back to defaults when it does not exist.
///
/// # Errors
/// Returns an error if:
/// - The file exists but cannot be read
/// - The TOML syntax is invalid or a value has the wrong type
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_settings(&contents)
}

/// Parses settings from TOML text.
///
/// # Errors
/// Returns an error if the TOML is invalid.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

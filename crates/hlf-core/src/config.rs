//! Configuration for the admin tooling.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $HLF_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/hlf/config.toml
//!   3. ~/.config/hlf/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::wire::SeekBehavior;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HlfConfig {
    pub admin: AdminConfig,
    pub images: ImageConfig,
    pub orderer: OrdererPaths,
    pub delivery: DeliveryConfig,
}

/// Bootstrap CA registrar credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub name: String,
    pub password: String,
}

/// Image tags for the hyperledger/* images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub fabric_tag: String,
    /// Empty = same as `fabric_tag`.
    pub ca_tag: String,
    /// CouchDB and other third-party images.
    pub third_party_tag: String,
}

/// Paths inside the orderer container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdererPaths {
    /// Directory holding the genesis block.
    pub configtx_dir: String,
    /// Ledger state directory.
    pub state_dir: String,
    pub config_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Behavior for seek requests that do not name one.
    pub default_behavior: SeekBehavior,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            name: "Admin".to_string(),
            password: "passwd".to_string(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            fabric_tag: "2.2.0".to_string(),
            ca_tag: String::new(),
            third_party_tag: "0.4.22".to_string(),
        }
    }
}

impl ImageConfig {
    pub fn effective_ca_tag(&self) -> &str {
        if self.ca_tag.is_empty() {
            &self.fabric_tag
        } else {
            &self.ca_tag
        }
    }
}

impl Default for OrdererPaths {
    fn default() -> Self {
        Self {
            configtx_dir: "/etc/hyperledger/configtx".to_string(),
            state_dir: "/var/hyperledger/production/orderer/".to_string(),
            config_dir: "/etc/hyperledger/".to_string(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            default_behavior: crate::builder::DEFAULT_SEEK_BEHAVIOR,
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// `$HLF_CONFIG`, else `$XDG_CONFIG_HOME/hlf/config.toml`, else
/// `$HOME/.config/hlf/config.toml`.
fn resolve_file_path(var: impl Fn(&str) -> Option<String>) -> Result<PathBuf, ConfigError> {
    if let Some(explicit) = var("HLF_CONFIG") {
        return Ok(PathBuf::from(explicit));
    }
    let base = var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| var("HOME").map(|home| PathBuf::from(home).join(".config")))
        .ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("hlf").join("config.toml"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config location: set HLF_CONFIG, XDG_CONFIG_HOME or HOME")]
    NoConfigDir,
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl HlfConfig {
    /// Load config: env vars → file → defaults. Without any config
    /// location only defaults and env vars apply.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::file_path() {
            Ok(path) => Self::load_file(&path)?,
            Err(ConfigError::NoConfigDir) => HlfConfig::default(),
            Err(e) => return Err(e),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Config file path.
    pub fn file_path() -> Result<PathBuf, ConfigError> {
        resolve_file_path(|key| std::env::var(key).ok())
    }

    /// Parse `path`, or defaults when it does not exist. No env overrides.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(HlfConfig::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path()?;
        Self::write_default_to(&path)?;
        Ok(path)
    }

    /// Write the default config to `path` unless a file is already there.
    pub fn write_default_to(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))?;
        }
        let text =
            toml::to_string_pretty(&HlfConfig::default()).map_err(ConfigError::SerializeFailed)?;
        std::fs::write(path, text).map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))
    }

    /// Apply HLF_* overrides looked up through `var`.
    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("HLF_ADMIN__NAME") {
            self.admin.name = v;
        }
        if let Some(v) = var("HLF_ADMIN__PASSWORD") {
            self.admin.password = v;
        }
        if let Some(v) = var("HLF_IMAGES__FABRIC_TAG") {
            self.images.fabric_tag = v;
        }
        if let Some(v) = var("HLF_IMAGES__CA_TAG") {
            self.images.ca_tag = v;
        }
        if let Some(v) = var("HLF_IMAGES__THIRD_PARTY_TAG") {
            self.images.third_party_tag = v;
        }
        if let Some(v) = var("HLF_DELIVERY__DEFAULT_BEHAVIOR") {
            if let Some(b) = SeekBehavior::from_str_name(&v.to_ascii_uppercase()) {
                self.delivery.default_behavior = b;
            }
        }
    }
}

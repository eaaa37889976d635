//! Bridge configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is a valid
//! config and yields the stock Cascade reply.

use crate::error::{Error, Result};
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Level in effect until a config is applied.
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    pub log_level: String,
    pub reply: ReplyConfig,
}

/// Fixed fields of the success reply returned by `processRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplyConfig {
    pub agent: String,
    pub version: String,
    pub message: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string().to_lowercase(),
            reply: ReplyConfig::default(),
        }
    }
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            agent: "Cascade".to_string(),
            version: "1.0.0".to_string(),
            message: "Request processed by Cascade AI agent".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Load config from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::config(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BridgeConfig = toml::from_str(content).map_err(Error::config)?;
        config.level_filter()?;
        Ok(config)
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| Error::config(format!("unknown log level: {}", self.log_level)))
    }
}

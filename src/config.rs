//! Configuration loading.
//!
//! A TOML file at the XDG config path supplies defaults for the reasoning
//! service and the batch delay; CLI flags override individual values. A
//! missing file is not an error — everything has a sensible default.

use std::path::Path;

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::reason::ReasonerConfig;

/// Errors from configuration loading.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file \"{path}\": {source}")]
    #[diagnostic(
        code(dossier::config::io),
        help("Check the file permissions, or delete the file to fall back to defaults.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file \"{path}\": {message}")]
    #[diagnostic(
        code(dossier::config::parse),
        help(
            "The config file is not valid TOML for the expected schema. \
             Valid keys: base_url, model, timeout_secs, delay_secs."
        )
    )]
    Parse { path: String, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

fn default_base_url() -> String {
    "http://localhost:11434".into()
}

fn default_model() -> String {
    "llama3.2".into()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_delay_secs() -> u64 {
    10
}

/// User configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DossierConfig {
    /// Base URL of the reasoning service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Reasoning request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Inter-document delay during batch ingestion, in seconds.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

impl Default for DossierConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            delay_secs: default_delay_secs(),
        }
    }
}

impl DossierConfig {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// The reasoner configuration slice of this config.
    pub fn reasoner(&self) -> ReasonerConfig {
        ReasonerConfig {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

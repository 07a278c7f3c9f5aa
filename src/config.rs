//! Replay configuration
//!
//! Loaded from YAML; every field is optional and falls back to its default.
//!
//! ```yaml
//! validate_schemas: true
//! indent_with_tabs: false
//! indent_width: 2
//! xml_declaration: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Check input documents against their schemas (informational only)
    pub validate_schemas: bool,
    /// Indent output with tabs instead of spaces
    pub indent_with_tabs: bool,
    /// Indent characters per nesting level
    pub indent_width: usize,
    /// Write an XML declaration at the top of the output
    pub xml_declaration: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            validate_schemas: true,
            indent_with_tabs: true,
            indent_width: 1,
            xml_declaration: true,
        }
    }
}

impl ReplayConfig {
    pub fn from_yaml_str(source: &str) -> ConfigResult<Self> {
        let config: ReplayConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.indent_width > 16 {
            return Err(ConfigError::Invalid(format!(
                "indent_width {} is larger than 16",
                self.indent_width
            )));
        }
        Ok(())
    }

    /// Indentation byte for the XML writer
    pub fn indent_char(&self) -> u8 {
        if self.indent_with_tabs {
            b'\t'
        } else {
            b' '
        }
    }
}

//! Project configuration file
//!
//! An optional TOML file collects the settings that would otherwise be
//! passed as flags. Every section and field may be omitted.
//!
//! ```toml
//! [sources]
//! project = "site/project.yaml"
//! components = "site/components.yaml"
//! implementation = "site/implementation.yaml"
//!
//! [output]
//! path = "dist/index.html"
//!
//! [resolve]
//! root = "main"
//! marker = "~"
//! inheritance = "parent-wins"
//!
//! [render]
//! strict = true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::renderer::RenderConfig;
use crate::resolver::ResolveConfig;
use crate::store::SourcePaths;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "struge.toml";

/// Errors that can occur when loading or parsing a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Where the rendered document goes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dist/index.html"),
        }
    }
}

/// Configuration for the complete pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sources: SourcePaths,
    pub output: OutputConfig,
    pub resolve: ResolveConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, else `struge.toml` if present, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.resolve.root.is_empty() {
            return Err(ConfigError::Invalid("resolve.root must not be empty".into()));
        }
        if self.resolve.marker.is_empty() {
            return Err(ConfigError::Invalid("resolve.marker must not be empty".into()));
        }
        Ok(())
    }

    /// Set the definition source paths
    pub fn with_sources(mut self, sources: SourcePaths) -> Self {
        self.sources = sources;
        self
    }

    /// Set the output path
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output.path = path.into();
        self
    }

    /// Set the resolver configuration
    pub fn with_resolve(mut self, config: ResolveConfig) -> Self {
        self.resolve = config;
        self
    }

    /// Set the render configuration
    pub fn with_render(mut self, config: RenderConfig) -> Self {
        self.render = config;
        self
    }
}

//! Configuration management for goscaffold
//!
//! Handles the optional `config.toml` and turns it into the immutable
//! [`Layout`] every scaffolding step receives.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::EnvFormat;

pub const DEFAULT_GO_BINARY: &str = "go";

pub const DEFAULT_SUBDIRS: &[&str] = &["config", "database", "errors", "handlers", "models", "services"];

pub const DEFAULT_DEPENDENCIES: &[&str] = &[
    "github.com/gin-gonic/gin",
    "gorm.io/gorm",
    "gorm.io/driver/postgres",
    "github.com/spf13/viper",
];

/// Placeholder files created empty; the env-format config file is appended.
pub const PLACEHOLDER_FILES: &[&str] = &["main.go", "errors/errors.go"];

pub const DEFAULT_README: &str = "Project scaffolded by goscaffold.\n";

/// On-disk configuration. Every field is optional and falls back to the
/// built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub go_binary: Option<String>,
    pub subdirs: Option<Vec<String>>,
    pub dependencies: Option<Vec<String>>,
    pub readme: Option<String>,
}

impl Config {
    /// Name or path of the Go toolchain binary
    pub fn go_binary(&self) -> &str {
        self.go_binary.as_deref().unwrap_or(DEFAULT_GO_BINARY)
    }
}

/// Returns the default config file location (`<config_dir>/goscaffold/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("goscaffold").join("config.toml"))
}

/// Load configuration from an explicit path, or from the default location.
///
/// An explicit path must exist. A missing default file yields the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Everything a run creates, resolved once and passed to each step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub subdirs: Vec<String>,
    pub dependencies: Vec<String>,
    pub files: Vec<String>,
    pub readme: String,
}

impl Layout {
    /// Built-in layout for the given env format
    pub fn new(env: EnvFormat) -> Self {
        Self::from_config(&Config::default(), env)
    }

    pub fn from_config(config: &Config, env: EnvFormat) -> Self {
        let subdirs = match &config.subdirs {
            Some(dirs) => dirs.clone(),
            None => DEFAULT_SUBDIRS.iter().map(|s| s.to_string()).collect(),
        };
        let dependencies = match &config.dependencies {
            Some(deps) => deps.clone(),
            None => DEFAULT_DEPENDENCIES.iter().map(|s| s.to_string()).collect(),
        };
        let mut files: Vec<String> = PLACEHOLDER_FILES.iter().map(|s| s.to_string()).collect();
        files.push(env.config_file().to_string());

        Self {
            subdirs,
            dependencies,
            files,
            readme: config.readme.clone().unwrap_or_else(|| DEFAULT_README.to_string()),
        }
    }
}

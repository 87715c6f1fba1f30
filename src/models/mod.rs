//! Core value types for goscaffold
//!
//! The env-file format selected on the command line and the stages a
//! scaffolding run moves through.

use serde::{Deserialize, Serialize};

/// Format of the generated config file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnvFormat {
    #[default]
    Env,
    Json,
}

impl EnvFormat {
    /// Path of the config file relative to the project root
    pub fn config_file(&self) -> &'static str {
        match self {
            EnvFormat::Env => "config/.env",
            EnvFormat::Json => "config/config.json",
        }
    }
}

impl std::fmt::Display for EnvFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvFormat::Env => write!(f, "env"),
            EnvFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for EnvFormat {
    type Err = String;

    // Exact match only: "JSON" or " env" are rejected like any other value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "env" => Ok(EnvFormat::Env),
            "json" => Ok(EnvFormat::Json),
            _ => Err(format!("Wrong ENV type: '{}'. It should be either env or json", s)),
        }
    }
}

/// Stages of a scaffolding run
///
/// Linear: a run only ever moves forward. Any failure after `DirsCreated`
/// ends in `RolledBack` or `RollbackSkipped` instead of `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parsed,
    Validated,
    DirsCreated,
    ModuleInitialized,
    DepsInstalled,
    FilesCreated,
    Done,
    RolledBack,
    RollbackSkipped,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Parsed => write!(f, "parsed"),
            Stage::Validated => write!(f, "validated"),
            Stage::DirsCreated => write!(f, "dirs_created"),
            Stage::ModuleInitialized => write!(f, "module_initialized"),
            Stage::DepsInstalled => write!(f, "deps_installed"),
            Stage::FilesCreated => write!(f, "files_created"),
            Stage::Done => write!(f, "done"),
            Stage::RolledBack => write!(f, "rolled_back"),
            Stage::RollbackSkipped => write!(f, "rollback_skipped"),
        }
    }
}

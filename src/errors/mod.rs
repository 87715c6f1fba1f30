//! Error types shared by every scaffolding step

use std::path::PathBuf;

/// Failure of a single scaffolding operation
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed: {reason}")]
    Subprocess { command: String, reason: String },
}

impl ScaffoldError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScaffoldError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ScaffoldError::Validation(_))
    }

    pub fn is_subprocess(&self) -> bool {
        matches!(self, ScaffoldError::Subprocess { .. })
    }
}

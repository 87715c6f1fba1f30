//! Completion marker and rollback
//!
//! A finished project carries `.goscaffold.json` and a `README.md`.
//! Rollback refuses to touch any project root that has either one, so
//! re-running against a completed project can never delete it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::errors::ScaffoldError;
use crate::models::EnvFormat;
use crate::steps::README_FILE;

pub const MARKER_FILE: &str = ".goscaffold.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStatus {
    Completed,
}

/// Contents of the completion marker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    pub status: MarkerStatus,
    pub module: String,
    pub env_format: EnvFormat,
    pub created_at: DateTime<Utc>,
}

impl Marker {
    pub fn completed(module: &str, env_format: EnvFormat) -> Self {
        Self {
            status: MarkerStatus::Completed,
            module: module.to_string(),
            env_format,
            created_at: Utc::now(),
        }
    }

    pub fn path(root: &Path) -> PathBuf {
        root.join(MARKER_FILE)
    }

    pub fn exists(root: &Path) -> bool {
        Self::path(root).exists()
    }

    pub fn write(&self, root: &Path) -> Result<(), ScaffoldError> {
        let path = Self::path(root);
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            ScaffoldError::io("Cannot serialize", &path, std::io::Error::other(e))
        })?;
        fs::write(&path, content).map_err(|e| ScaffoldError::io("Cannot write", &path, e))
    }

    /// `Ok(None)` when there is no marker
    pub fn read(root: &Path) -> Result<Option<Self>, ScaffoldError> {
        let path = Self::path(root);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).map_err(|e| ScaffoldError::io("Cannot read", &path, e))?;
        let marker = serde_json::from_str(&content).map_err(|e| {
            ScaffoldError::io(
                "Cannot parse",
                &path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;
        Ok(Some(marker))
    }
}

/// What rollback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackOutcome {
    /// The project root was deleted (or was never there)
    RolledBack,
    /// A completion marker or README was found; nothing was deleted
    Skipped,
}

/// Delete a partially created project unless it carries a completion marker
/// or a README.
///
/// A marker that exists but cannot be read still blocks deletion. A README
/// without a marker comes from an older run, or from a run that failed
/// between writing the two.
pub fn rollback(root: &Path) -> Result<RollbackOutcome, ScaffoldError> {
    if Marker::exists(root) {
        match Marker::read(root) {
            Ok(Some(marker)) => info!(
                "{} was completed at {}; leaving it untouched",
                root.display(),
                marker.created_at
            ),
            Ok(None) => {}
            Err(e) => warn!("Unreadable completion marker, leaving project untouched: {}", e),
        }
        return Ok(RollbackOutcome::Skipped);
    }

    if root.join(README_FILE).exists() {
        info!("{} has a {}; leaving it untouched", root.display(), README_FILE);
        return Ok(RollbackOutcome::Skipped);
    }

    if !root.exists() {
        return Ok(RollbackOutcome::RolledBack);
    }

    warn!("Rolling back: removing {}", root.display());
    fs::remove_dir_all(root).map_err(|e| ScaffoldError::io("Cannot delete directory", root, e))?;
    Ok(RollbackOutcome::RolledBack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_marker_round_trip() {
        let temp = TempDir::new().unwrap();
        let marker = Marker::completed("github.com/acme/demo", EnvFormat::Json);
        marker.write(temp.path()).unwrap();

        let read = Marker::read(temp.path()).unwrap().unwrap();
        assert_eq!(read, marker);
        assert_eq!(read.status, MarkerStatus::Completed);
    }

    #[test]
    fn test_read_missing_marker() {
        let temp = TempDir::new().unwrap();
        assert!(Marker::read(temp.path()).unwrap().is_none());
    }

    #[test]
    fn test_rollback_deletes_unmarked_project() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo");
        fs::create_dir_all(root.join("config")).unwrap();

        assert_eq!(rollback(&root).unwrap(), RollbackOutcome::RolledBack);
        assert!(!root.exists());
    }

    #[test]
    fn test_rollback_skips_marked_project() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo");
        fs::create_dir_all(root.join("config")).unwrap();
        Marker::completed("demo", EnvFormat::Env).write(&root).unwrap();

        assert_eq!(rollback(&root).unwrap(), RollbackOutcome::Skipped);
        assert!(root.join("config").is_dir());
        assert!(Marker::exists(&root));
    }

    #[test]
    fn test_rollback_skips_on_corrupt_marker() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo");
        fs::create_dir_all(&root).unwrap();
        fs::write(Marker::path(&root), "{ not json").unwrap();

        assert_eq!(rollback(&root).unwrap(), RollbackOutcome::Skipped);
        assert!(root.exists());
    }

    #[test]
    fn test_rollback_skips_project_with_readme_only() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(README_FILE), "hello").unwrap();
        fs::write(root.join("go.mod"), "module demo\n").unwrap();
        fs::write(root.join("main.go"), "package main\n").unwrap();

        assert_eq!(rollback(&root).unwrap(), RollbackOutcome::Skipped);
        assert_eq!(fs::read_to_string(root.join("main.go")).unwrap(), "package main\n");
        assert!(root.join("go.mod").exists());
    }

    #[test]
    fn test_rollback_of_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("never-created");
        assert_eq!(rollback(&root).unwrap(), RollbackOutcome::RolledBack);
    }
}

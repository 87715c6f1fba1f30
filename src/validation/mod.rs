//! Input validation for goscaffold
//!
//! Runs before anything touches the filesystem.

use std::path::{Component, Path, PathBuf};

use crate::config::Layout;
use crate::errors::ScaffoldError;
use crate::models::EnvFormat;

/// Raw command-line values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flags {
    pub dir: String,
    pub module: String,
    pub env: String,
}

/// Flags after validation; read-only for the rest of the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFlags {
    pub dir: String,
    pub module: String,
    pub env: EnvFormat,
}

impl ValidFlags {
    /// Project root, relative to `base`
    pub fn project_root(&self, base: &Path) -> PathBuf {
        base.join(&self.dir)
    }
}

/// Validate the three flags
pub fn validate_flags(flags: &Flags) -> Result<ValidFlags, ScaffoldError> {
    let env = flags
        .env
        .parse::<EnvFormat>()
        .map_err(ScaffoldError::Validation)?;

    for (name, value) in [("dir", &flags.dir), ("module", &flags.module), ("env", &flags.env)] {
        check_value(name, value)?;
    }

    Ok(ValidFlags {
        dir: flags.dir.clone(),
        module: flags.module.clone(),
        env,
    })
}

fn check_value(name: &str, value: &str) -> Result<(), ScaffoldError> {
    if value.is_empty() {
        return Err(ScaffoldError::Validation(format!("-{} is required", name)));
    }
    if value.contains(' ') {
        return Err(ScaffoldError::Validation(format!(
            "-{} '{}' must not contain spaces",
            name, value
        )));
    }
    Ok(())
}

/// Validate a layout that may have come from a config file
///
/// Subdirectories must stay inside the project root and must cover the
/// parent directory of every placeholder file. Dependencies must not look
/// like flags to `go get`.
pub fn validate_layout(layout: &Layout) -> Result<(), ScaffoldError> {
    for dir in &layout.subdirs {
        check_value("subdir", dir)?;
        let escapes = Path::new(dir)
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(ScaffoldError::Validation(format!(
                "subdir '{}' must be a relative path inside the project",
                dir
            )));
        }
    }
    for file in &layout.files {
        let parent = match Path::new(file).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => continue,
        };
        // create_dir_all on a nested subdir also creates its ancestors
        let covered = layout
            .subdirs
            .iter()
            .any(|dir| Path::new(dir).starts_with(parent));
        if !covered {
            return Err(ScaffoldError::Validation(format!(
                "file '{}' needs '{}' in subdirs",
                file,
                parent.display()
            )));
        }
    }
    for dep in &layout.dependencies {
        check_value("dependency", dep)?;
        if dep.starts_with('-') {
            return Err(ScaffoldError::Validation(format!(
                "dependency '{}' must not start with '-'",
                dep
            )));
        }
    }
    Ok(())
}

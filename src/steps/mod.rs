//! The individual scaffolding steps
//!
//! Each step takes its inputs explicitly and stops at the first failure.
//! None of them clean up after themselves; that is the pipeline's job.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::Layout;
use crate::errors::ScaffoldError;
use crate::runner::{run_checked, CommandRunner};

pub const README_FILE: &str = "README.md";

/// Create every subdirectory of the layout under `root`.
///
/// Idempotent. Directories created before a failure are left in place.
pub fn create_dirs(root: &Path, layout: &Layout) -> Result<(), ScaffoldError> {
    for dir in &layout.subdirs {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .map_err(|e| ScaffoldError::io("Cannot create directory", &path, e))?;
        debug!(path = %path.display(), "created directory");
    }
    info!("Created {} directories under {}", layout.subdirs.len(), root.display());
    Ok(())
}

/// Run `<go> mod init <module>` inside `root`
pub fn init_module(
    runner: &dyn CommandRunner,
    go: &str,
    root: &Path,
    module: &str,
) -> Result<(), ScaffoldError> {
    info!("Initializing module {}", module);
    run_checked(runner, go, &["mod", "init", module], root)
}

/// Run `<go> get -u <dep>` for each dependency, one at a time
pub fn install_deps(
    runner: &dyn CommandRunner,
    go: &str,
    root: &Path,
    layout: &Layout,
) -> Result<(), ScaffoldError> {
    for dep in &layout.dependencies {
        info!("Fetching {}", dep);
        run_checked(runner, go, &["get", "-u", dep.as_str()], root)?;
    }
    Ok(())
}

/// Create every placeholder file empty, truncating existing ones
pub fn create_required_files(root: &Path, layout: &Layout) -> Result<(), ScaffoldError> {
    for file in &layout.files {
        let path = root.join(file);
        fs::File::create(&path).map_err(|e| ScaffoldError::io("Cannot create file", &path, e))?;
        debug!(path = %path.display(), "created file");
    }
    info!("Created {} placeholder files", layout.files.len());
    Ok(())
}

/// Write `README.md` with the layout's fixed content
pub fn create_readme(root: &Path, layout: &Layout) -> Result<(), ScaffoldError> {
    let path = root.join(README_FILE);
    fs::write(&path, &layout.readme).map_err(|e| ScaffoldError::io("Cannot write", &path, e))
}

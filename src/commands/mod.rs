//! CLI commands for goscaffold

use std::path::Path;

use crate::config::Config;
use crate::rollback::RollbackOutcome;
use crate::runner::CommandRunner;
use crate::validation::Flags;
use crate::workflow::{PipelineError, ScaffoldReport, Scaffolder};

/// Scaffold a project and print the user-facing summary
pub fn scaffold(
    runner: &dyn CommandRunner,
    config: Config,
    flags: &Flags,
    base: &Path,
) -> Result<ScaffoldReport, PipelineError> {
    match Scaffolder::new(runner, config).run(flags, base) {
        Ok(report) => {
            println!("Project created successfully!");
            println!("  Root:   {}", report.root.display());
            println!("  Module: {}", report.flags.module);
            println!("  Config: {}", report.flags.env.config_file());
            println!();
            println!("Next steps:");
            println!("  cd {}", report.flags.dir);
            println!("  go build ./...");
            Ok(report)
        }
        Err(e) => {
            if e.rollback() == Some(RollbackOutcome::Skipped) {
                println!("Project is created successfully before!");
            }
            Err(e)
        }
    }
}

//! Scaffolding pipeline
//!
//! Drives a run through its stages:
//! - parsed -> validated: flags and layout pass validation
//! - validated -> dirs_created: subdirectories exist
//! - dirs_created -> module_initialized: `go mod init` succeeded
//! - module_initialized -> deps_installed: every `go get` succeeded
//! - deps_installed -> files_created: placeholder files exist
//! - files_created -> done: README and completion marker written
//!
//! A failure from module init, dependency install or file creation triggers
//! rollback and ends the run in `rolled_back` or `rollback_skipped`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{Config, Layout};
use crate::errors::ScaffoldError;
use crate::models::Stage;
use crate::rollback::{rollback, Marker, RollbackOutcome};
use crate::runner::CommandRunner;
use crate::steps;
use crate::validation::{validate_flags, validate_layout, Flags, ValidFlags};

/// Step of the pipeline an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validate,
    CreateDirs,
    InitModule,
    InstallDeps,
    CreateFiles,
    Finalize,
}

impl Phase {
    /// Whether a failure in this phase triggers rollback
    pub fn rolls_back(&self) -> bool {
        matches!(self, Phase::InitModule | Phase::InstallDeps | Phase::CreateFiles)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Validate => write!(f, "Check your flags!"),
            Phase::CreateDirs => write!(f, "Error occurred when creating directories!"),
            Phase::InitModule => write!(f, "Error occurred when initializing module!"),
            Phase::InstallDeps => write!(f, "Error occurred when installing dependencies!"),
            Phase::CreateFiles => {
                write!(f, "Error occurred when creating files such as main.go or the env file!")
            }
            Phase::Finalize => write!(f, "Error occurred when writing README and completion marker!"),
        }
    }
}

/// A failed run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{phase} : {source}")]
    Step {
        phase: Phase,
        #[source]
        source: ScaffoldError,
        /// Last stage reached (terminal when rollback ran)
        stage: Stage,
        rollback: Option<RollbackOutcome>,
    },

    #[error("{phase} : {source}; rollback failed too: {rollback_error}")]
    RollbackFailed {
        phase: Phase,
        #[source]
        source: ScaffoldError,
        rollback_error: ScaffoldError,
    },
}

impl PipelineError {
    pub fn phase(&self) -> Phase {
        match self {
            PipelineError::Step { phase, .. } | PipelineError::RollbackFailed { phase, .. } => *phase,
        }
    }

    pub fn cause(&self) -> &ScaffoldError {
        match self {
            PipelineError::Step { source, .. } | PipelineError::RollbackFailed { source, .. } => {
                source
            }
        }
    }

    /// Where the run stopped. `None` if rollback itself failed and the tree
    /// is in an unknown state.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Step { stage, .. } => Some(*stage),
            PipelineError::RollbackFailed { .. } => None,
        }
    }

    pub fn rollback(&self) -> Option<RollbackOutcome> {
        match self {
            PipelineError::Step { rollback, .. } => *rollback,
            PipelineError::RollbackFailed { .. } => None,
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    pub root: PathBuf,
    pub flags: ValidFlags,
    pub stages: Vec<Stage>,
}

/// Runs the scaffolding pipeline with an injected command runner
pub struct Scaffolder<'a> {
    runner: &'a dyn CommandRunner,
    config: Config,
}

impl<'a> Scaffolder<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: Config) -> Self {
        Self { runner, config }
    }

    /// Scaffold `flags.dir` under `base`
    pub fn run(&self, flags: &Flags, base: &Path) -> Result<ScaffoldReport, PipelineError> {
        let mut stages = vec![Stage::Parsed];

        let (valid, layout) = self
            .validate(flags)
            .map_err(|source| Self::fail(Phase::Validate, source, &stages))?;
        advance(&mut stages, Stage::Validated);

        let root = valid.project_root(base);
        info!("Scaffolding {} (module {})", root.display(), valid.module);

        steps::create_dirs(&root, &layout)
            .map_err(|source| Self::fail(Phase::CreateDirs, source, &stages))?;
        advance(&mut stages, Stage::DirsCreated);

        let go = self.config.go_binary();

        steps::init_module(self.runner, go, &root, &valid.module)
            .map_err(|source| Self::fail_and_roll_back(Phase::InitModule, source, &root))?;
        advance(&mut stages, Stage::ModuleInitialized);

        steps::install_deps(self.runner, go, &root, &layout)
            .map_err(|source| Self::fail_and_roll_back(Phase::InstallDeps, source, &root))?;
        advance(&mut stages, Stage::DepsInstalled);

        steps::create_required_files(&root, &layout)
            .map_err(|source| Self::fail_and_roll_back(Phase::CreateFiles, source, &root))?;
        advance(&mut stages, Stage::FilesCreated);

        steps::create_readme(&root, &layout)
            .and_then(|_| Marker::completed(&valid.module, valid.env).write(&root))
            .map_err(|source| Self::fail(Phase::Finalize, source, &stages))?;
        advance(&mut stages, Stage::Done);

        Ok(ScaffoldReport {
            root,
            flags: valid,
            stages,
        })
    }

    fn validate(&self, flags: &Flags) -> Result<(ValidFlags, Layout), ScaffoldError> {
        let valid = validate_flags(flags)?;
        let layout = Layout::from_config(&self.config, valid.env);
        validate_layout(&layout)?;
        if self.config.go_binary().trim().is_empty() {
            return Err(ScaffoldError::Validation("go_binary must not be empty".to_string()));
        }
        Ok((valid, layout))
    }

    // The message itself is reported once, by the caller.
    fn fail(phase: Phase, source: ScaffoldError, stages: &[Stage]) -> PipelineError {
        PipelineError::Step {
            phase,
            source,
            stage: stages.last().copied().unwrap_or(Stage::Parsed),
            rollback: None,
        }
    }

    fn fail_and_roll_back(phase: Phase, source: ScaffoldError, root: &Path) -> PipelineError {
        debug!("{:?} failed, rolling back {}", phase, root.display());
        debug_assert!(phase.rolls_back());

        match rollback(root) {
            Ok(outcome) => {
                let stage = match outcome {
                    RollbackOutcome::RolledBack => Stage::RolledBack,
                    RollbackOutcome::Skipped => Stage::RollbackSkipped,
                };
                PipelineError::Step {
                    phase,
                    source,
                    stage,
                    rollback: Some(outcome),
                }
            }
            Err(rollback_error) => PipelineError::RollbackFailed {
                phase,
                source,
                rollback_error,
            },
        }
    }
}

fn advance(stages: &mut Vec<Stage>, next: Stage) {
    debug!("stage -> {}", next);
    stages.push(next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RecordingRunner;
    use tempfile::TempDir;

    fn flags(dir: &str, env: &str) -> Flags {
        Flags {
            dir: dir.to_string(),
            module: "github.com/acme/demo".to_string(),
            env: env.to_string(),
        }
    }

    #[test]
    fn test_successful_run_visits_every_stage() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let report = Scaffolder::new(&runner, Config::default())
            .run(&flags("demo", "env"), temp.path())
            .unwrap();

        assert_eq!(
            report.stages,
            vec![
                Stage::Parsed,
                Stage::Validated,
                Stage::DirsCreated,
                Stage::ModuleInitialized,
                Stage::DepsInstalled,
                Stage::FilesCreated,
                Stage::Done,
            ]
        );
        assert!(Marker::exists(&report.root));
    }

    #[test]
    fn test_validation_failure_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let err = Scaffolder::new(&runner, Config::default())
            .run(&flags("demo", "xml"), temp.path())
            .unwrap_err();

        assert_eq!(err.phase(), Phase::Validate);
        assert_eq!(err.stage(), Some(Stage::Parsed));
        assert!(err.to_string().starts_with("Check your flags!"));
        assert!(!temp.path().join("demo").exists());
        assert!(runner.invocations().is_empty());
    }

    #[test]
    fn test_dependency_failure_rolls_back() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new().failing_on("viper");
        let err = Scaffolder::new(&runner, Config::default())
            .run(&flags("demo", "env"), temp.path())
            .unwrap_err();

        assert_eq!(err.phase(), Phase::InstallDeps);
        assert_eq!(err.rollback(), Some(RollbackOutcome::RolledBack));
        assert_eq!(err.stage(), Some(Stage::RolledBack));
        assert!(err.cause().is_subprocess());
        assert!(!temp.path().join("demo").exists());
    }

    #[test]
    fn test_empty_go_binary_is_a_validation_error() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let config = Config {
            go_binary: Some(" ".to_string()),
            ..Config::default()
        };
        let err = Scaffolder::new(&runner, config)
            .run(&flags("demo", "env"), temp.path())
            .unwrap_err();
        assert_eq!(err.phase(), Phase::Validate);
    }

    #[test]
    fn test_only_middle_phases_roll_back() {
        assert!(!Phase::Validate.rolls_back());
        assert!(!Phase::CreateDirs.rolls_back());
        assert!(Phase::InitModule.rolls_back());
        assert!(Phase::InstallDeps.rolls_back());
        assert!(Phase::CreateFiles.rolls_back());
        assert!(!Phase::Finalize.rolls_back());
    }
}

//! Release workflow as seen from the command line
//!
//! This module stands in for the IDE host: it finds the open solution and
//! selected project, applies command-line overrides to the configuration,
//! fires the trigger and reports the result. Keeping it apart from main.rs
//! lets the workflow be called programmatically without depending on clap.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::domain::{ProjectContext, ReleaseOutcome, ReleaseReport};
use crate::launcher::{Launcher, SystemLauncher};
use crate::orchestrator::{Dispatch, ReleaseOrchestrator};
use crate::ui;

/// Arguments for the release workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriggerArgs {
    /// Solution file or the directory holding it
    pub solution: Option<PathBuf>,

    /// Project directory; defaults to the solution directory
    pub project: Option<PathBuf>,

    /// Signing tool overriding `[signing] tool_path`
    pub sign_tool: Option<PathBuf>,

    /// Open the artifacts folder after packaging
    pub open_artifacts: bool,

    /// Open the upload page after packaging
    pub upload: bool,
}

/// Applies command-line switches on top of the loaded configuration.
///
/// Switches only ever turn features on; a flag left off keeps the file's value.
pub fn apply_overrides(mut config: Config, args: &TriggerArgs) -> Config {
    if let Some(tool) = &args.sign_tool {
        config.signing.tool_path = Some(tool.clone());
    }
    if args.open_artifacts {
        config.distribution.open_artifact_folder = true;
    }
    if args.upload {
        config.distribution.upload_to_web = true;
    }
    config
}

/// Works out which solution and project are "open".
///
/// An explicit solution may be a `.sln` file or a directory. Without one,
/// `cwd` must contain exactly one `.sln` file; otherwise the context is empty
/// and the release halts with `NoSolutionOpen`.
pub fn discover_context(
    solution: Option<&Path>,
    project: Option<&Path>,
    cwd: &Path,
) -> Result<ProjectContext> {
    let solution_root = match solution {
        Some(path) if path.is_file() => path.parent().map(Path::to_path_buf),
        Some(path) if path.is_dir() => Some(path.to_path_buf()),
        Some(path) => anyhow::bail!("Solution not found: {}", path.display()),
        None => find_solution_dir(cwd)?,
    };

    let Some(solution_root) = solution_root else {
        return Ok(ProjectContext::empty());
    };
    let solution_root = absolute(&solution_root, cwd);
    let project_root = project
        .map(|p| absolute(p, cwd))
        .unwrap_or_else(|| solution_root.clone());

    Ok(ProjectContext::new(solution_root, project_root))
}

fn find_solution_dir(dir: &Path) -> Result<Option<PathBuf>> {
    let mut solutions = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        let is_sln = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("sln"));
        if is_sln && path.is_file() {
            solutions.push(path);
        }
    }

    match solutions.len() {
        1 => Ok(Some(dir.to_path_buf())),
        0 => Ok(None),
        n => {
            tracing::warn!("{} solution files in {}, pass --solution", n, dir.display());
            Ok(None)
        }
    }
}

fn absolute(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Main release workflow
///
/// Orchestrates the whole trigger:
/// 1. Discover the open solution and project
/// 2. Apply command-line overrides to the configuration
/// 3. Trigger the release and report that packaging is running
/// 4. Wait for packaging, cancelling it on Ctrl-C
/// 5. Report the outcome
pub async fn run_release_workflow(args: TriggerArgs, config: Config) -> Result<ReleaseReport> {
    let cwd = std::env::current_dir().context("reading current directory")?;
    let context = discover_context(args.solution.as_deref(), args.project.as_deref(), &cwd)?;
    let config = apply_overrides(config, &args);

    let launcher: Arc<dyn Launcher> = Arc::new(SystemLauncher::new());
    let orchestrator = ReleaseOrchestrator::new(config, launcher);

    let report = match orchestrator.trigger(&context).await {
        Dispatch::Halted(report) => report,
        Dispatch::Running(handle) => {
            ui::display_status("Packaging script running...");
            let cancel = handle.cancel_handle();
            let wait = handle.wait();
            tokio::pin!(wait);

            tokio::select! {
                report = &mut wait => report?,
                _ = tokio::signal::ctrl_c() => {
                    ui::display_status("Cancelling release...");
                    cancel.cancel();
                    wait.await?
                }
            }
        }
    };

    ui::report_release(&report);
    if report.outcome == ReleaseOutcome::Completed {
        ui::display_success("Release completed");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_apply_overrides_turns_flags_on() {
        let args = TriggerArgs {
            sign_tool: Some(PathBuf::from("C:/tools/sign.exe")),
            open_artifacts: true,
            upload: true,
            ..TriggerArgs::default()
        };
        let config = apply_overrides(Config::default(), &args);
        assert_eq!(
            config.signing.tool_path,
            Some(PathBuf::from("C:/tools/sign.exe"))
        );
        assert!(config.distribution.open_artifact_folder);
        assert!(config.distribution.upload_to_web);
    }

    #[test]
    fn test_apply_overrides_keeps_file_values() {
        let mut config = Config::default();
        config.distribution.upload_to_web = true;
        let config = apply_overrides(config, &TriggerArgs::default());
        assert!(config.distribution.upload_to_web);
        assert!(!config.distribution.open_artifact_folder);
    }

    #[test]
    fn test_discover_single_solution_in_cwd() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Recorder.sln"), "").unwrap();

        let ctx = discover_context(None, None, dir.path()).unwrap();
        assert!(ctx.is_active());
        assert_eq!(ctx.solution_root.as_deref(), Some(dir.path()));
        assert_eq!(ctx.project_root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_discover_no_solution_is_empty() {
        let dir = TempDir::new().unwrap();
        let ctx = discover_context(None, None, dir.path()).unwrap();
        assert!(!ctx.is_active());
    }

    #[test]
    fn test_discover_ambiguous_solutions_is_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A.sln"), "").unwrap();
        fs::write(dir.path().join("B.SLN"), "").unwrap();
        let ctx = discover_context(None, None, dir.path()).unwrap();
        assert!(!ctx.is_active());
    }

    #[test]
    fn test_discover_explicit_solution_file_and_relative_project() {
        let dir = TempDir::new().unwrap();
        let sln = dir.path().join("Recorder.sln");
        fs::write(&sln, "").unwrap();

        let ctx =
            discover_context(Some(sln.as_path()), Some(Path::new("Recorder")), dir.path()).unwrap();
        assert_eq!(ctx.solution_root.as_deref(), Some(dir.path()));
        assert_eq!(ctx.project_root, Some(dir.path().join("Recorder")));
    }

    #[test]
    fn test_discover_missing_explicit_solution_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.sln");
        let result = discover_context(Some(missing.as_path()), None, dir.path());
        assert!(result.is_err());
    }
}

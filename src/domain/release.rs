use crate::boundary::ReleaseWarning;
use crate::config::Config;
use crate::domain::version::AssemblyVersion;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Solution/project pair supplied by the host for one trigger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectContext {
    /// Directory holding the solution file
    pub solution_root: Option<PathBuf>,
    /// Directory holding the selected project
    pub project_root: Option<PathBuf>,
}

impl ProjectContext {
    pub fn new(solution_root: impl Into<PathBuf>, project_root: impl Into<PathBuf>) -> Self {
        ProjectContext {
            solution_root: Some(solution_root.into()),
            project_root: Some(project_root.into()),
        }
    }

    /// Context with no solution open
    pub fn empty() -> Self {
        ProjectContext::default()
    }

    pub fn is_active(&self) -> bool {
        let has_solution = self
            .solution_root
            .as_ref()
            .is_some_and(|p| !p.as_os_str().is_empty());
        has_solution && self.project_root.is_some()
    }
}

/// Paths and switches for a single release, resolved from the host context
/// and the loaded configuration. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseConfig {
    pub solution_root: PathBuf,
    /// Directory that holds the `package/` tree
    pub package_root: PathBuf,
    pub project_root: PathBuf,
    pub metadata_path: PathBuf,
    pub script_template_path: PathBuf,
    pub packaging_script_path: PathBuf,
    pub artifacts_dir: PathBuf,
    pub sign_tool_path: Option<PathBuf>,
    pub sign_grace_period: Duration,
    pub open_artifact_folder: bool,
    pub upload_to_web: bool,
    pub upload_url: String,
    pub fail_on_packaging_error: bool,
}

impl ReleaseConfig {
    /// Resolve the release paths, or `None` when no solution is open.
    pub fn resolve(context: &ProjectContext, config: &Config) -> Option<ReleaseConfig> {
        if !context.is_active() {
            return None;
        }
        let solution_root = context.solution_root.clone()?;
        let project_root = context.project_root.clone()?;

        let package_root = match &config.layout.package_root {
            Some(root) => solution_root.join(root),
            None => solution_root
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| solution_root.clone()),
        };

        let layout = &config.layout;
        Some(ReleaseConfig {
            metadata_path: project_root.join(&layout.metadata_file),
            script_template_path: package_root.join(&layout.script_template),
            packaging_script_path: package_root.join(&layout.packaging_script),
            artifacts_dir: package_root.join(&layout.artifacts_dir),
            sign_tool_path: config
                .signing
                .tool_path
                .clone()
                .filter(|p| !p.as_os_str().is_empty()),
            sign_grace_period: Duration::from_millis(config.signing.grace_period_ms),
            open_artifact_folder: config.distribution.open_artifact_folder,
            upload_to_web: config.distribution.upload_to_web,
            upload_url: config.distribution.upload_url.clone(),
            fail_on_packaging_error: config.packaging.fail_on_error,
            solution_root,
            package_root,
            project_root,
        })
    }
}

/// Result of the version synchronization step
#[derive(Debug, Clone, PartialEq)]
pub enum VersionSync {
    /// Script template now carries this version
    Synchronized { version: AssemblyVersion },
    /// Metadata or script template missing; sync skipped
    NoVersionFileFound { missing: Vec<PathBuf> },
    /// Metadata present but no version declared; sync skipped
    VersionAbsent,
    /// Rewrite or save failed; packaging went ahead regardless
    ScriptUpdateFailed { reason: String },
}

/// How the packaging script finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackagingStatus {
    Succeeded,
    Failed { code: Option<i32> },
    Cancelled,
}

impl PackagingStatus {
    pub fn from_exit_status(status: std::process::ExitStatus) -> Self {
        if status.success() {
            PackagingStatus::Succeeded
        } else {
            PackagingStatus::Failed {
                code: status.code(),
            }
        }
    }
}

/// Headline outcome of a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// No solution was open; nothing was touched
    NoSolutionOpen,
    /// Packaged without version sync because metadata or script was missing
    NoVersionFileFound,
    /// Packaged, but the script template could not be updated
    ScriptUpdateFailed,
    /// Packaging finished and distribution was started
    Completed,
    /// Cancelled while packaging; distribution skipped
    Cancelled,
    /// Packaging script missing, not startable, or lost while waiting for it
    PackagingAborted,
}

impl ReleaseOutcome {
    /// Outcome of a release that got past path resolution. A packaging run
    /// that did not reach distribution overrides the version sync result.
    pub fn settle(sync: &VersionSync, packaging: Option<PackagingStatus>) -> Self {
        match packaging {
            None => ReleaseOutcome::PackagingAborted,
            Some(PackagingStatus::Cancelled) => ReleaseOutcome::Cancelled,
            Some(_) => ReleaseOutcome::from_version_sync(sync),
        }
    }

    pub fn from_version_sync(sync: &VersionSync) -> Self {
        match sync {
            VersionSync::ScriptUpdateFailed { .. } => ReleaseOutcome::ScriptUpdateFailed,
            VersionSync::NoVersionFileFound { .. } => ReleaseOutcome::NoVersionFileFound,
            VersionSync::Synchronized { .. } | VersionSync::VersionAbsent => {
                ReleaseOutcome::Completed
            }
        }
    }
}

/// Everything a finished (or halted) trigger did
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseReport {
    pub outcome: ReleaseOutcome,
    pub version_sync: Option<VersionSync>,
    pub signed: bool,
    pub packaging: Option<PackagingStatus>,
    /// Targets handed to the OS opener, in launch order
    pub distributed: Vec<String>,
    pub warnings: Vec<ReleaseWarning>,
}

impl ReleaseReport {
    /// Report for a trigger that stopped before touching anything
    pub fn halted(outcome: ReleaseOutcome) -> Self {
        ReleaseReport {
            outcome,
            version_sync: None,
            signed: false,
            packaging: None,
            distributed: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Version written into the script, if any
    pub fn version(&self) -> Option<&AssemblyVersion> {
        match &self.version_sync {
            Some(VersionSync::Synchronized { version }) => Some(version),
            _ => None,
        }
    }
}

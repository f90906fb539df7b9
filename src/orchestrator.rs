//! Release pipeline: version sync, signing, packaging and distribution.
//!
//! The synchronous part (resolve, version sync, signing hand-off) runs on the
//! caller's task. Packaging and the distribution that follows it run on a
//! spawned Tokio task so the trigger returns as soon as the packaging script
//! has started.

use crate::boundary::ReleaseWarning;
use crate::config::Config;
use crate::domain::{
    AssemblyVersion, PackagingStatus, ProjectContext, ReleaseConfig, ReleaseOutcome,
    ReleaseReport, VersionSync,
};
use crate::error::{AutoPackageError, Result};
use crate::extractor::extract_version_from_file;
use crate::launcher::Launcher;
use crate::rewriter::ScriptRewriter;
use chrono::{Local, NaiveDate};
use futures::future::BoxFuture;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Result of [ReleaseOrchestrator::trigger]
pub enum Dispatch {
    /// Stopped before packaging ran; the report says how far it got
    Halted(ReleaseReport),
    /// Packaging is running in the background
    Running(ReleaseHandle),
}

/// Requests cancellation of a running release. Cloneable, so it can be
/// handed to a signal handler while the [ReleaseHandle] is awaited.
#[derive(Clone, Default)]
pub struct CancelHandle(Arc<Notify>);

impl CancelHandle {
    /// Stop the release. The packaging process is killed and distribution
    /// is skipped. Has no effect once packaging has finished.
    pub fn cancel(&self) {
        self.0.notify_one();
    }
}

/// Handle to the background part of a release
pub struct ReleaseHandle {
    task: JoinHandle<Result<ReleaseReport>>,
    cancel: CancelHandle,
}

impl ReleaseHandle {
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for packaging and distribution to finish
    pub async fn wait(self) -> Result<ReleaseReport> {
        self.task.await?
    }
}

/// Parts of the report settled before packaging starts
struct Prepared {
    version_sync: VersionSync,
    signed: bool,
    warnings: Vec<ReleaseWarning>,
}

impl Prepared {
    fn into_report(self, packaging: Option<PackagingStatus>) -> ReleaseReport {
        ReleaseReport {
            outcome: ReleaseOutcome::settle(&self.version_sync, packaging),
            version_sync: Some(self.version_sync),
            signed: self.signed,
            packaging,
            distributed: Vec::new(),
            warnings: self.warnings,
        }
    }

    /// Report for a packaging script that never ran to exit
    fn aborted(mut self, release: &ReleaseConfig, error: AutoPackageError) -> ReleaseReport {
        warn!("packaging did not run: {}", error);
        self.warnings.push(ReleaseWarning::PackagingAborted {
            path: release.packaging_script_path.clone(),
            reason: error.to_string(),
        });
        self.into_report(None)
    }
}

/// Runs one release. Built fresh for every trigger; holds no state between runs.
pub struct ReleaseOrchestrator {
    config: Config,
    launcher: Arc<dyn Launcher>,
    build_date: Option<NaiveDate>,
}

impl ReleaseOrchestrator {
    pub fn new(config: Config, launcher: Arc<dyn Launcher>) -> Self {
        ReleaseOrchestrator {
            config,
            launcher,
            build_date: None,
        }
    }

    /// Pin the date used for the `(Build MM/DD/YY)` annotation
    pub fn with_build_date(mut self, date: NaiveDate) -> Self {
        self.build_date = Some(date);
        self
    }

    /// Trigger a release and wait for it to finish.
    pub async fn run(&self, context: &ProjectContext) -> Result<ReleaseReport> {
        match self.trigger(context).await {
            Dispatch::Halted(report) => Ok(report),
            Dispatch::Running(handle) => handle.wait().await,
        }
    }

    /// Trigger a release.
    ///
    /// Returns once the packaging script has been started. Steps:
    /// 1. Resolve paths; halt with `NoSolutionOpen` if no solution is open
    /// 2. Skip version sync if metadata or script template is missing
    /// 3. Copy the assembly version into the script template
    /// 4. Start the signing tool, if configured and present
    /// 5. Start the packaging script on a background task
    /// 6. After packaging, open the configured distribution targets
    ///
    /// Nothing here fails outright: a missing or unstartable packaging
    /// script halts with `PackagingAborted`, and version sync and signing
    /// problems become warnings in the report.
    pub async fn trigger(&self, context: &ProjectContext) -> Dispatch {
        let Some(release) = ReleaseConfig::resolve(context, &self.config) else {
            info!("no solution open, nothing to package");
            return Dispatch::Halted(ReleaseReport::halted(ReleaseOutcome::NoSolutionOpen));
        };
        debug!(?release, "resolved release paths");

        let mut warnings = Vec::new();
        let version_sync = self.synchronize_version(&release, &mut warnings);
        let signed = self.launch_sign_tool(&release, &mut warnings).await;
        let prepared = Prepared {
            version_sync,
            signed,
            warnings,
        };

        let packaging = match self.start_packaging(&release) {
            Ok(packaging) => packaging,
            Err(e) => return Dispatch::Halted(prepared.aborted(&release, e)),
        };
        let cancel = CancelHandle::default();
        let task = tokio::spawn(finish_release(
            Arc::clone(&self.launcher),
            release,
            prepared,
            packaging,
            cancel.clone(),
        ));

        Dispatch::Running(ReleaseHandle { task, cancel })
    }

    fn synchronize_version(
        &self,
        release: &ReleaseConfig,
        warnings: &mut Vec<ReleaseWarning>,
    ) -> VersionSync {
        let mut missing = Vec::new();
        if !release.metadata_path.is_file() {
            warnings.push(ReleaseWarning::MetadataMissing {
                path: release.metadata_path.clone(),
            });
            missing.push(release.metadata_path.clone());
        }
        if !release.script_template_path.is_file() {
            warnings.push(ReleaseWarning::ScriptTemplateMissing {
                path: release.script_template_path.clone(),
            });
            missing.push(release.script_template_path.clone());
        }
        if !missing.is_empty() {
            debug!(?missing, "skipping version sync");
            return VersionSync::NoVersionFileFound { missing };
        }

        let version = match extract_version_from_file(&release.metadata_path) {
            Ok(Some(version)) => version,
            Ok(None) => {
                debug!("no AssemblyVersion in {}", release.metadata_path.display());
                warnings.push(ReleaseWarning::VersionAbsent {
                    path: release.metadata_path.clone(),
                });
                return VersionSync::VersionAbsent;
            }
            Err(e) => return script_update_failed(release, e, warnings),
        };

        match self.write_script(&release.script_template_path, &version) {
            Ok(()) => {
                info!(
                    "{} set to version {}",
                    release.script_template_path.display(),
                    version
                );
                VersionSync::Synchronized { version }
            }
            Err(e) => script_update_failed(release, e, warnings),
        }
    }

    fn write_script(&self, path: &Path, version: &AssemblyVersion) -> Result<()> {
        let rewriter = ScriptRewriter::new()?;
        let script = fs::read(path)?;
        debug!(fields = ?rewriter.fields_present(&script), "rewriting {}", path.display());

        let build_date = self
            .build_date
            .unwrap_or_else(|| Local::now().date_naive());
        let updated = rewriter.rewrite(&script, version, build_date)?;
        write_atomic(path, &updated)
    }

    async fn launch_sign_tool(
        &self,
        release: &ReleaseConfig,
        warnings: &mut Vec<ReleaseWarning>,
    ) -> bool {
        let Some(tool) = &release.sign_tool_path else {
            return false;
        };
        if !tool.is_file() {
            debug!("signing tool {} not found, skipping", tool.display());
            return false;
        }

        match self.launcher.spawn_detached(tool) {
            Ok(()) => {
                info!(
                    "signing tool opened, waiting {:?}",
                    release.sign_grace_period
                );
                tokio::time::sleep(release.sign_grace_period).await;
                true
            }
            Err(e) => {
                warn!("signing tool did not start: {}", e);
                warnings.push(ReleaseWarning::SignToolLaunchFailed {
                    path: tool.clone(),
                    reason: e.to_string(),
                });
                false
            }
        }
    }

    fn start_packaging(
        &self,
        release: &ReleaseConfig,
    ) -> Result<BoxFuture<'static, Result<PackagingStatus>>> {
        let script = &release.packaging_script_path;
        if !script.is_file() {
            return Err(AutoPackageError::process(format!(
                "Packaging script not found: {}",
                script.display()
            )));
        }

        let working_dir = script
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or(release.package_root.as_path());
        self.launcher.run_to_exit(script, working_dir)
    }
}

fn script_update_failed(
    release: &ReleaseConfig,
    error: AutoPackageError,
    warnings: &mut Vec<ReleaseWarning>,
) -> VersionSync {
    warn!(
        "could not update {}: {}",
        release.script_template_path.display(),
        error
    );
    let reason = error.to_string();
    warnings.push(ReleaseWarning::ScriptUpdateFailed {
        path: release.script_template_path.clone(),
        reason: reason.clone(),
    });
    VersionSync::ScriptUpdateFailed { reason }
}

/// Replace `path` with `contents` via a temporary file in the same directory,
/// so an interrupted write never leaves a truncated script behind.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

async fn finish_release(
    launcher: Arc<dyn Launcher>,
    release: ReleaseConfig,
    prepared: Prepared,
    packaging: BoxFuture<'static, Result<PackagingStatus>>,
    cancel: CancelHandle,
) -> Result<ReleaseReport> {
    let status = tokio::select! {
        status = packaging => status,
        _ = cancel.0.notified() => {
            warn!("release cancelled, packaging script stopped");
            Ok(PackagingStatus::Cancelled)
        }
    };
    let status = match status {
        Ok(status) => status,
        Err(e) => return Ok(prepared.aborted(&release, e)),
    };

    let mut report = prepared.into_report(Some(status));

    match status {
        PackagingStatus::Succeeded => info!("packed"),
        PackagingStatus::Cancelled => return Ok(report),
        PackagingStatus::Failed { code } => {
            if release.fail_on_packaging_error {
                return Err(AutoPackageError::process(format!(
                    "{} exited with code {}",
                    release.packaging_script_path.display(),
                    code.map_or_else(|| "none".to_string(), |c| c.to_string())
                )));
            }
            warn!(?code, "packaging script failed");
            report.warnings.push(ReleaseWarning::PackagingFailed { code });
        }
    }

    distribute(launcher.as_ref(), &release, &mut report);
    Ok(report)
}

fn distribute(launcher: &dyn Launcher, release: &ReleaseConfig, report: &mut ReleaseReport) {
    let mut targets = Vec::new();
    if release.open_artifact_folder {
        targets.push(release.artifacts_dir.display().to_string());
    }
    if release.upload_to_web {
        targets.push(release.upload_url.clone());
    }

    for target in targets {
        match launcher.open(&target) {
            Ok(()) => report.distributed.push(target),
            Err(e) => {
                warn!("could not open {}: {}", target, e);
                report.warnings.push(ReleaseWarning::DistributionLaunchFailed {
                    target,
                    reason: e.to_string(),
                });
            }
        }
    }
}

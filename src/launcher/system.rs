use crate::domain::PackagingStatus;
use crate::error::{AutoPackageError, Result};
use crate::launcher::Launcher;
use futures::future::BoxFuture;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Launches real processes through `tokio::process`.
///
/// Must be used from within a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        SystemLauncher
    }
}

#[cfg(target_os = "windows")]
fn opener_command(target: &str) -> Command {
    let mut cmd = Command::new("cmd");
    // Empty title argument so `start` does not treat a quoted target as the window title
    cmd.args(["/C", "start", ""]).arg(target);
    cmd
}

#[cfg(target_os = "macos")]
fn opener_command(target: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(target);
    cmd
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn opener_command(target: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(target);
    cmd
}

impl Launcher for SystemLauncher {
    fn spawn_detached(&self, program: &Path) -> Result<()> {
        let mut cmd = Command::new(program);
        if let Some(dir) = program.parent().filter(|d| !d.as_os_str().is_empty()) {
            cmd.current_dir(dir);
        }

        let child = cmd
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| {
                AutoPackageError::process(format!("failed to start {}: {}", program.display(), e))
            })?;

        info!(pid = ?child.id(), "started {}", program.display());
        Ok(())
    }

    fn open(&self, target: &str) -> Result<()> {
        opener_command(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AutoPackageError::process(format!("failed to open {}: {}", target, e)))?;

        debug!("opened {}", target);
        Ok(())
    }

    fn run_to_exit(
        &self,
        program: &Path,
        working_dir: &Path,
    ) -> Result<BoxFuture<'static, Result<PackagingStatus>>> {
        let mut child = Command::new(program)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AutoPackageError::process(format!("failed to start {}: {}", program.display(), e))
            })?;

        info!(pid = ?child.id(), "{} running...", program.display());
        let name = program.display().to_string();

        Ok(Box::pin(async move {
            let status = child.wait().await?;
            debug!("{} exited with {}", name, status);
            Ok(PackagingStatus::from_exit_status(status))
        }))
    }
}

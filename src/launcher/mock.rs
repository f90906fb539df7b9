use crate::domain::PackagingStatus;
use crate::error::{AutoPackageError, Result};
use crate::launcher::{LaunchEvent, Launcher};
use futures::future::{self, BoxFuture, FutureExt};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

/// How the mock packaging script behaves once started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockPackaging {
    Exit(i32),
    /// Never exits; only cancellation ends it
    Hang,
    /// Starts, but waiting for its exit fails
    WaitError,
}

/// Mock launcher for testing without starting processes
pub struct MockLauncher {
    events: Mutex<Vec<LaunchEvent>>,
    failing: HashSet<String>,
    packaging: MockPackaging,
}

impl MockLauncher {
    /// Create a mock whose packaging script exits successfully
    pub fn new() -> Self {
        MockLauncher {
            events: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            packaging: MockPackaging::Exit(0),
        }
    }

    /// Packaging script exits with `code`
    pub fn with_packaging_exit(mut self, code: i32) -> Self {
        self.packaging = MockPackaging::Exit(code);
        self
    }

    /// Packaging script never exits
    pub fn with_hanging_packaging(mut self) -> Self {
        self.packaging = MockPackaging::Hang;
        self
    }

    /// Packaging script starts but its exit status cannot be collected
    pub fn with_failing_wait(mut self) -> Self {
        self.packaging = MockPackaging::WaitError;
        self
    }

    /// Any launch of `target` (program path or opened target) fails to start
    pub fn fail_launch_of(mut self, target: impl AsRef<Path>) -> Self {
        self.failing
            .insert(target.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Launches observed so far, in order
    pub fn events(&self) -> Vec<LaunchEvent> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LaunchEvent>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self, target: &str) -> Result<()> {
        if self.failing.contains(target) {
            return Err(AutoPackageError::process(format!(
                "failed to start {}: mock launch failure",
                target
            )));
        }
        Ok(())
    }
}

impl Default for MockLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl Launcher for MockLauncher {
    fn spawn_detached(&self, program: &Path) -> Result<()> {
        self.check(&program.to_string_lossy())?;
        self.lock().push(LaunchEvent::Detached(program.to_path_buf()));
        Ok(())
    }

    fn open(&self, target: &str) -> Result<()> {
        self.check(target)?;
        self.lock().push(LaunchEvent::Opened(target.to_string()));
        Ok(())
    }

    fn run_to_exit(
        &self,
        program: &Path,
        working_dir: &Path,
    ) -> Result<BoxFuture<'static, Result<PackagingStatus>>> {
        self.check(&program.to_string_lossy())?;
        self.lock().push(LaunchEvent::Packaged {
            program: program.to_path_buf(),
            working_dir: working_dir.to_path_buf(),
        });

        Ok(match self.packaging {
            MockPackaging::Exit(0) => future::ready(Ok(PackagingStatus::Succeeded)).boxed(),
            MockPackaging::Exit(code) => {
                future::ready(Ok(PackagingStatus::Failed { code: Some(code) })).boxed()
            }
            MockPackaging::Hang => future::pending::<Result<PackagingStatus>>().boxed(),
            MockPackaging::WaitError => future::ready(Err(AutoPackageError::process(
                "failed to wait for packaging script: mock wait failure",
            )))
            .boxed(),
        })
    }
}

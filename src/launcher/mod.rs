//! Process launching abstraction layer
//!
//! The release pipeline never calls `Command` directly. It goes through the
//! [Launcher] trait so the orchestration can be exercised without starting
//! real signing tools or packaging scripts.
//!
//! - [system::SystemLauncher]: starts real processes with `tokio::process`
//! - [mock::MockLauncher]: records launches for tests

pub mod mock;
pub mod system;

pub use mock::MockLauncher;
pub use system::SystemLauncher;

use crate::domain::PackagingStatus;
use crate::error::Result;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};

/// A process launch observed by a [Launcher]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchEvent {
    /// Program started and left running
    Detached(PathBuf),
    /// File, folder or URL handed to the OS opener
    Opened(String),
    /// Packaging script started and awaited
    Packaged { program: PathBuf, working_dir: PathBuf },
}

/// Starts the external programs of a release.
///
/// Implementors must be `Send + Sync`; the packaging wait runs on a
/// background task.
pub trait Launcher: Send + Sync {
    /// Start `program` without waiting for it.
    fn spawn_detached(&self, program: &Path) -> Result<()>;

    /// Open a file, folder or URL with the platform's default handler.
    fn open(&self, target: &str) -> Result<()>;

    /// Start `program` in `working_dir` and return a future that resolves
    /// when it exits.
    ///
    /// Spawn failures are returned immediately. Dropping the returned future
    /// terminates the child process.
    fn run_to_exit(
        &self,
        program: &Path,
        working_dir: &Path,
    ) -> Result<BoxFuture<'static, Result<PackagingStatus>>>;
}

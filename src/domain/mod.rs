//! Domain types - release values independent of files and processes

pub mod release;
pub mod version;

pub use release::{
    PackagingStatus, ProjectContext, ReleaseConfig, ReleaseOutcome, ReleaseReport, VersionSync,
};
pub use version::AssemblyVersion;

use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met during a release.
/// These never stop packaging but are reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// Assembly metadata file is not where the layout expects it
    MetadataMissing { path: PathBuf },
    /// Installer script template is not where the layout expects it
    ScriptTemplateMissing { path: PathBuf },
    /// Metadata exists but declares no usable assembly version
    VersionAbsent { path: PathBuf },
    /// Version was found but the script could not be rewritten or saved
    ScriptUpdateFailed { path: PathBuf, reason: String },
    /// Signing tool exists but could not be started
    SignToolLaunchFailed { path: PathBuf, reason: String },
    /// Packaging script exited unsuccessfully
    PackagingFailed { code: Option<i32> },
    /// Packaging script could not be started or awaited
    PackagingAborted { path: PathBuf, reason: String },
    /// Artifacts folder or upload page could not be opened
    DistributionLaunchFailed { target: String, reason: String },
}

impl ReleaseWarning {
    /// Whether this warning should be surfaced to the user, as opposed to
    /// the routine skips that are only logged.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            ReleaseWarning::MetadataMissing { .. }
                | ReleaseWarning::ScriptTemplateMissing { .. }
                | ReleaseWarning::VersionAbsent { .. }
        )
    }
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::MetadataMissing { path } => {
                write!(f, "Assembly metadata not found at '{}'", path.display())
            }
            ReleaseWarning::ScriptTemplateMissing { path } => {
                write!(f, "Installer script not found at '{}'", path.display())
            }
            ReleaseWarning::VersionAbsent { path } => {
                write!(f, "No AssemblyVersion declared in '{}'", path.display())
            }
            ReleaseWarning::ScriptUpdateFailed { path, reason } => {
                write!(f, "Change {} error: {}", path.display(), reason)
            }
            ReleaseWarning::SignToolLaunchFailed { path, reason } => {
                write!(
                    f,
                    "Could not start signing tool '{}': {}",
                    path.display(),
                    reason
                )
            }
            ReleaseWarning::PackagingFailed { code } => match code {
                Some(code) => write!(f, "Packaging script exited with code {}", code),
                None => write!(f, "Packaging script was terminated by a signal"),
            },
            ReleaseWarning::PackagingAborted { path, reason } => {
                write!(f, "Packaging '{}' did not run: {}", path.display(), reason)
            }
            ReleaseWarning::DistributionLaunchFailed { target, reason } => {
                write!(f, "Could not open '{}': {}", target, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routine_skips_are_not_user_facing() {
        let skip = ReleaseWarning::MetadataMissing {
            path: PathBuf::from("Properties/AssemblyInfo.cs"),
        };
        assert!(!skip.is_user_facing());

        let failure = ReleaseWarning::PackagingFailed { code: Some(2) };
        assert!(failure.is_user_facing());
    }
}

//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from the
//! reporting decisions in the parent module.

use crate::boundary::ReleaseWarning;
use crate::domain::{PackagingStatus, VersionSync};
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a warning message in yellow.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("WARNING:").yellow(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print a non-fatal release warning.
pub fn display_release_warning(warning: &ReleaseWarning) {
    display_warning(&warning.to_string());
}

/// One-line summary of the version sync step.
pub fn describe_version_sync(sync: &VersionSync) -> String {
    match sync {
        VersionSync::Synchronized { version } => format!("Version synchronized to {}", version),
        VersionSync::NoVersionFileFound { .. } => {
            "No version file found, version sync skipped".to_string()
        }
        VersionSync::VersionAbsent => "No assembly version declared, version sync skipped".to_string(),
        VersionSync::ScriptUpdateFailed { reason } => {
            format!("Installer script not updated: {}", reason)
        }
    }
}

/// One-line summary of the packaging step.
pub fn describe_packaging(status: PackagingStatus) -> String {
    match status {
        PackagingStatus::Succeeded => "Packed!".to_string(),
        PackagingStatus::Failed { code: Some(code) } => {
            format!("Packaging finished with exit code {}", code)
        }
        PackagingStatus::Failed { code: None } => "Packaging was terminated".to_string(),
        PackagingStatus::Cancelled => "Packaging cancelled".to_string(),
    }
}

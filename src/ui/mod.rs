//! User interface module - the reporting surface of a release.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Decides what a finished release tells the user

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    describe_packaging, describe_version_sync, display_error, display_release_warning,
    display_status, display_success, display_warning,
};

use crate::domain::{PackagingStatus, ReleaseOutcome, ReleaseReport};

/// Message shown when the trigger fires with no solution open.
pub const NO_SOLUTION_MESSAGE: &str = "Please open a solution!";

/// Reports a release to the user.
///
/// Routine skips (missing metadata, no version declared) are only printed
/// as status lines; script update failures, launch failures and packaging
/// failures are printed as warnings.
pub fn report_release(report: &ReleaseReport) {
    if report.outcome == ReleaseOutcome::NoSolutionOpen {
        display_error(NO_SOLUTION_MESSAGE);
        return;
    }

    if let Some(sync) = &report.version_sync {
        display_status(&describe_version_sync(sync));
    }

    if report.signed {
        display_status("Signing tool opened");
    }

    for warning in report.warnings.iter().filter(|w| w.is_user_facing()) {
        display_release_warning(warning);
    }

    match report.packaging {
        Some(status @ PackagingStatus::Succeeded) => display_success(&describe_packaging(status)),
        Some(status) => display_status(&describe_packaging(status)),
        None => {}
    }

    for target in &report.distributed {
        display_status(&format!("Opened {}", target));
    }

    if report.outcome == ReleaseOutcome::Cancelled {
        display_warning("Release cancelled, distribution skipped");
    }
}

/// Exit code for the binary: non-zero when packaging never finished.
pub fn exit_code(report: &ReleaseReport) -> i32 {
    match report.outcome {
        ReleaseOutcome::NoSolutionOpen
        | ReleaseOutcome::Cancelled
        | ReleaseOutcome::PackagingAborted => 1,
        ReleaseOutcome::NoVersionFileFound
        | ReleaseOutcome::ScriptUpdateFailed
        | ReleaseOutcome::Completed => 0,
    }
}

//! Version substitution into the installer script template (`version.iss`).
//!
//! The template is not parsed. Three labeled fields are located by pattern
//! and only their quoted values are replaced:
//!
//! ```text
//! #define MyAppVersion "1.4.4.13"
//! #define MyAppBuildNo "(Build 10/19/26)"
//! #define OutputVersion "144"
//! ```
//!
//! Scripts are handled as raw bytes: templates saved in a legacy code page
//! (GBK, Windows-1252) come back unchanged outside the three values.

use crate::domain::AssemblyVersion;
use crate::error::{AutoPackageError, Result};
use chrono::NaiveDate;
use regex::bytes::{NoExpand, Regex};

pub const APP_VERSION_PATTERN: &str = r#"MyAppVersion "[0-9.]*""#;
pub const BUILD_NO_PATTERN: &str = r#"MyAppBuildNo "\(Build [0-9/]*\)""#;
pub const OUTPUT_VERSION_PATTERN: &str = r#"OutputVersion "[0-9.]*""#;

/// Which of the three version fields a script contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldPresence {
    pub app_version: bool,
    pub build_no: bool,
    pub output_version: bool,
}

impl FieldPresence {
    pub fn any(&self) -> bool {
        self.app_version || self.build_no || self.output_version
    }
}

/// Formats the build annotation, e.g. `(Build 10/19/26)`.
pub fn build_number(date: NaiveDate) -> String {
    format!("(Build {})", date.format("%m/%d/%y"))
}

/// Rewrites the version fields of an installer script.
///
/// Stateless; holds only the compiled patterns.
pub struct ScriptRewriter {
    app_version: Regex,
    build_no: Regex,
    output_version: Regex,
}

impl ScriptRewriter {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| AutoPackageError::rewrite(format!("bad pattern {}: {}", pattern, e)))
        };

        Ok(ScriptRewriter {
            app_version: compile(APP_VERSION_PATTERN)?,
            build_no: compile(BUILD_NO_PATTERN)?,
            output_version: compile(OUTPUT_VERSION_PATTERN)?,
        })
    }

    /// Returns a copy of `script` with the version fields replaced.
    ///
    /// - `MyAppVersion` receives the full version
    /// - `MyAppBuildNo` receives the `(Build MM/DD/YY)` annotation for `build_date`
    /// - `OutputVersion` receives the version without its revision and dots
    ///
    /// Each substitution is independent; a missing field is left alone and
    /// the others still apply. All other bytes are preserved.
    ///
    /// # Errors
    /// Version without a dot (no revision segment to drop).
    pub fn rewrite(
        &self,
        script: impl AsRef<[u8]>,
        version: &AssemblyVersion,
        build_date: NaiveDate,
    ) -> Result<Vec<u8>> {
        let output_version = version.output_version().ok_or_else(|| {
            AutoPackageError::rewrite(format!(
                "version '{}' has no revision segment to drop",
                version
            ))
        })?;
        let build_no = build_number(build_date);

        let app_version = format!("MyAppVersion \"{}\"", version);
        let build_no = format!("MyAppBuildNo \"{}\"", build_no);
        let output_version = format!("OutputVersion \"{}\"", output_version);

        let text = self
            .app_version
            .replace_all(script.as_ref(), NoExpand(app_version.as_bytes()));
        let text = self
            .build_no
            .replace_all(&text, NoExpand(build_no.as_bytes()));
        let text = self
            .output_version
            .replace_all(&text, NoExpand(output_version.as_bytes()));

        Ok(text.into_owned())
    }

    /// Reports which version fields `script` contains.
    pub fn fields_present(&self, script: impl AsRef<[u8]>) -> FieldPresence {
        let script = script.as_ref();
        FieldPresence {
            app_version: self.app_version.is_match(script),
            build_no: self.build_no.is_match(script),
            output_version: self.output_version.is_match(script),
        }
    }
}

use crate::error::{AutoPackageError, Result};
use std::fmt;

/// Dotted numeric assembly version (e.g. `1.4.4.13`).
///
/// Holds the text exactly as declared so that it can be written back into
/// the installer script without normalization. Segments are not range
/// checked; only the `[0-9.]` shape is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyVersion(String);

impl AssemblyVersion {
    /// Parse a version string such as "1.4.4.13"
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(AutoPackageError::version("empty version string"));
        }

        if !raw.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(AutoPackageError::version(format!(
                "Invalid version format: '{}' - expected digits and dots",
                raw
            )));
        }

        if raw.split('.').any(str::is_empty) {
            return Err(AutoPackageError::version(format!(
                "Invalid version format: '{}' - empty segment",
                raw
            )));
        }

        Ok(AssemblyVersion(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dot-separated segments in declaration order
    pub fn segments(&self) -> Vec<&str> {
        self.0.split('.').collect()
    }

    /// Compact build token: drops the revision segment and strips dots.
    ///
    /// `1.4.4.13` becomes `144`. Returns `None` for a single-segment version
    /// since there is no revision to drop.
    pub fn output_version(&self) -> Option<String> {
        let (head, _revision) = self.0.rsplit_once('.')?;
        Some(head.replace('.', ""))
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AssemblyVersion {
    type Err = AutoPackageError;

    fn from_str(s: &str) -> Result<Self> {
        AssemblyVersion::parse(s)
    }
}

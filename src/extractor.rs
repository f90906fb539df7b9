//! Assembly version extraction from source metadata (`AssemblyInfo.cs`).

use crate::domain::AssemblyVersion;
use crate::error::Result;
use regex::bytes::Regex;
use std::fs;
use std::path::Path;

const ASSEMBLY_VERSION_PATTERN: &str =
    r#"\[\s*assembly\s*:\s*AssemblyVersion\s*\(\s*"([0-9.]*)"\s*\)\s*\]"#;

/// Extracts the declared assembly version from metadata text.
///
/// Only the first live `[assembly: AssemblyVersion("...")]` declaration is
/// considered; declarations inside `//` or `/* */` comments or string
/// literals are ignored. An empty or malformed quoted value yields `None`
/// rather than an error, callers treat that as "nothing to synchronize".
///
/// The text is matched as raw bytes, so metadata saved in a legacy code
/// page (e.g. a `©` in Windows-1252) is accepted.
///
/// # Example
/// ```
/// use auto_package::extractor::extract_version;
///
/// let v = extract_version(r#"[assembly: AssemblyVersion("1.4.4.13")]"#).unwrap();
/// assert_eq!(v.as_str(), "1.4.4.13");
/// assert!(extract_version("no version here").is_none());
/// ```
pub fn extract_version(metadata: impl AsRef<[u8]>) -> Option<AssemblyVersion> {
    let metadata = metadata.as_ref();
    let re = Regex::new(ASSEMBLY_VERSION_PATTERN).ok()?;

    let captures = re.captures_iter(metadata).find(|caps| {
        caps.get(0)
            .map(|m| is_live_code(metadata, m.start()))
            .unwrap_or(false)
    })?;

    // The capture is limited to [0-9.], always ASCII
    let raw = std::str::from_utf8(captures.get(1)?.as_bytes()).ok()?;
    match AssemblyVersion::parse(raw) {
        Ok(version) => Some(version),
        Err(e) => {
            tracing::debug!("ignoring AssemblyVersion declaration: {}", e);
            None
        }
    }
}

/// Reads a metadata file and extracts its assembly version.
pub fn extract_version_from_file(path: &Path) -> Result<Option<AssemblyVersion>> {
    let bytes = fs::read(path)?;
    Ok(extract_version(&bytes))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    LineComment,
    BlockComment,
    Str,
    VerbatimStr,
    Char,
}

/// Whether `offset` falls in C# code rather than a comment or literal.
fn is_live_code(text: &[u8], offset: usize) -> bool {
    let mut state = Scan::Code;
    let mut i = 0;

    while i < offset {
        let next = text.get(i + 1).copied();
        state = match (state, text[i], next) {
            (Scan::Code, b'/', Some(b'/')) => {
                i += 1;
                Scan::LineComment
            }
            (Scan::Code, b'/', Some(b'*')) => {
                i += 1;
                Scan::BlockComment
            }
            (Scan::Code, b'@', Some(b'"')) => {
                i += 1;
                Scan::VerbatimStr
            }
            (Scan::Code, b'"', _) => Scan::Str,
            (Scan::Code, b'\'', _) => Scan::Char,
            (Scan::LineComment, b'\n', _) => Scan::Code,
            (Scan::BlockComment, b'*', Some(b'/')) => {
                i += 1;
                Scan::Code
            }
            (Scan::Str | Scan::Char, b'\\', _) => {
                i += 1;
                state
            }
            (Scan::Str, b'"', _) | (Scan::Char, b'\'', _) => Scan::Code,
            // unterminated literal
            (Scan::Str | Scan::Char, b'\n', _) => Scan::Code,
            (Scan::VerbatimStr, b'"', Some(b'"')) => {
                i += 1;
                Scan::VerbatimStr
            }
            (Scan::VerbatimStr, b'"', _) => Scan::Code,
            (state, _, _) => state,
        };
        i += 1;
    }

    state == Scan::Code
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSEMBLY_INFO: &str = r#"using System.Reflection;
using System.Runtime.InteropServices;

[assembly: AssemblyTitle("Recorder")]
[assembly: ComVisible(false)]
// Version information for an assembly consists of the following four values:
//
//      Major Version
//      Minor Version
//      Build Number
//      Revision
//
// [assembly: AssemblyVersion("1.0.*")]
[assembly: AssemblyVersion("1.4.4.13")]
[assembly: AssemblyFileVersion("1.4.4.13")]
"#;

    #[test]
    fn test_extract_from_assembly_info() {
        let v = extract_version(ASSEMBLY_INFO).unwrap();
        assert_eq!(v.as_str(), "1.4.4.13");
    }

    #[test]
    fn test_extract_single_declaration() {
        let v = extract_version(r#"[assembly: AssemblyVersion("2.0.0.7")]"#).unwrap();
        assert_eq!(v.as_str(), "2.0.0.7");
    }

    #[test]
    fn test_first_declaration_wins() {
        let text = r#"[assembly: AssemblyVersion("1.0.0.1")]
[assembly: AssemblyVersion("9.9.9.9")]"#;
        assert_eq!(extract_version(text).unwrap().as_str(), "1.0.0.1");
    }

    #[test]
    fn test_commented_declaration_is_skipped() {
        let text = r#"// [assembly: AssemblyVersion("0.0.0.1")]
[assembly: AssemblyVersion("1.2.0.5")]"#;
        assert_eq!(extract_version(text).unwrap().as_str(), "1.2.0.5");

        let only_comment = r#"    // [assembly: AssemblyVersion("0.0.0.1")]"#;
        assert!(extract_version(only_comment).is_none());
    }

    #[test]
    fn test_url_earlier_on_line_is_not_a_comment() {
        let text = r#"[assembly: AssemblyCopyright("http://x")] [assembly: AssemblyVersion("1.2.3.4")]"#;
        assert_eq!(extract_version(text).unwrap().as_str(), "1.2.3.4");
    }

    #[test]
    fn test_block_comment_is_skipped() {
        let text = r#"/*
[assembly: AssemblyVersion("0.0.0.1")]
*/
[assembly: AssemblyVersion("1.2.0.5")]"#;
        assert_eq!(extract_version(text).unwrap().as_str(), "1.2.0.5");

        let inline = r#"/* [assembly: AssemblyVersion("0.0.0.1")] */ [assembly: AssemblyVersion("3.0.0.1")]"#;
        assert_eq!(extract_version(inline).unwrap().as_str(), "3.0.0.1");
    }

    #[test]
    fn test_declaration_inside_string_is_skipped() {
        let text = r#"const string S = "[assembly: AssemblyVersion(\"0.0.0.1\")]";
[assembly: AssemblyVersion("2.1.0.0")]"#;
        assert_eq!(extract_version(text).unwrap().as_str(), "2.1.0.0");

        let verbatim = r#"const string P = @"C:\tools\"; [assembly: AssemblyVersion("2.2.0.0")]"#;
        assert_eq!(extract_version(verbatim).unwrap().as_str(), "2.2.0.0");
    }

    #[test]
    fn test_legacy_code_page_metadata() {
        let mut bytes = b"[assembly: AssemblyCopyright(\"Copyright \xA9 2026\")]\r\n".to_vec();
        bytes.extend_from_slice(b"[assembly: AssemblyVersion(\"1.4.4.13\")]\r\n");
        assert!(std::str::from_utf8(&bytes).is_err());

        assert_eq!(extract_version(&bytes).unwrap().as_str(), "1.4.4.13");
    }

    #[test]
    fn test_no_declaration_is_absent() {
        assert!(extract_version("").is_none());
        assert!(extract_version(r#"[assembly: AssemblyTitle("App")]"#).is_none());
    }

    #[test]
    fn test_empty_or_wildcard_value_is_absent() {
        assert!(extract_version(r#"[assembly: AssemblyVersion("")]"#).is_none());
        assert!(extract_version(r#"[assembly: AssemblyVersion("1.0.*")]"#).is_none());
        assert!(extract_version(r#"[assembly: AssemblyVersion("1..0")]"#).is_none());
    }

    #[test]
    fn test_file_version_is_not_assembly_version() {
        let text = r#"[assembly: AssemblyFileVersion("3.3.3.3")]"#;
        assert!(extract_version(text).is_none());
    }

    #[test]
    fn test_tolerates_whitespace() {
        let text = r#"[ assembly : AssemblyVersion ( "1.2.3.4" ) ]"#;
        assert_eq!(extract_version(text).unwrap().as_str(), "1.2.3.4");
    }

    #[test]
    fn test_extract_from_missing_file_errors() {
        let result = extract_version_from_file(Path::new("/nonexistent/AssemblyInfo.cs"));
        assert!(result.is_err());
    }
}

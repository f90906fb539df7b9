use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default upload page opened after packaging when `upload_to_web` is set.
pub const DEFAULT_UPLOAD_URL: &str = "https://dist.wangxutech.com/admin";

/// Represents the complete configuration for auto-package.
///
/// Contains the project layout, the signing tool, packaging policy and the
/// distribution targets opened after a release.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub signing: SigningConfig,

    #[serde(default)]
    pub packaging: PackagingConfig,

    #[serde(default)]
    pub distribution: DistributionConfig,
}

fn default_metadata_file() -> PathBuf {
    PathBuf::from("Properties/AssemblyInfo.cs")
}

fn default_script_template() -> PathBuf {
    PathBuf::from("package/ProVersion/IssFiles/version.iss")
}

fn default_packaging_script() -> PathBuf {
    PathBuf::from("package/ProVersion/Pack_normal.bat")
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("package/ProVersion/PackedFiles")
}

/// Where release inputs live.
///
/// `metadata_file` is relative to the project root. The other paths are
/// relative to the package root, which defaults to the parent of the
/// solution directory.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Override for the package root; relative values resolve against the solution root
    #[serde(default)]
    pub package_root: Option<PathBuf>,

    #[serde(default = "default_metadata_file")]
    pub metadata_file: PathBuf,

    #[serde(default = "default_script_template")]
    pub script_template: PathBuf,

    #[serde(default = "default_packaging_script")]
    pub packaging_script: PathBuf,

    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            package_root: None,
            metadata_file: default_metadata_file(),
            script_template: default_script_template(),
            packaging_script: default_packaging_script(),
            artifacts_dir: default_artifacts_dir(),
        }
    }
}

fn default_grace_period_ms() -> u64 {
    1000
}

/// Configuration for the optional code-signing tool.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SigningConfig {
    #[serde(default)]
    pub tool_path: Option<PathBuf>,

    /// How long to wait after launching the tool before packaging starts.
    /// The tool offers no readiness signal, so this is a plain delay.
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,
}

impl Default for SigningConfig {
    fn default() -> Self {
        SigningConfig {
            tool_path: None,
            grace_period_ms: default_grace_period_ms(),
        }
    }
}

/// Policy for the packaging script's exit status.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PackagingConfig {
    /// Treat a non-zero exit as a failed release instead of a warning
    #[serde(default)]
    pub fail_on_error: bool,
}

fn default_upload_url() -> String {
    DEFAULT_UPLOAD_URL.to_string()
}

/// Targets opened once packaging has finished.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DistributionConfig {
    #[serde(default)]
    pub open_artifact_folder: bool,

    #[serde(default)]
    pub upload_to_web: bool,

    #[serde(default = "default_upload_url")]
    pub upload_url: String,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        DistributionConfig {
            open_artifact_folder: false,
            upload_to_web: false,
            upload_url: default_upload_url(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `autopackage.toml` in current directory
/// 3. `.autopackage.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./autopackage.toml").exists() {
        fs::read_to_string("./autopackage.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".autopackage.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

use thiserror::Error;

/// Unified error type for auto-package operations
#[derive(Error, Debug)]
pub enum AutoPackageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Script rewrite failed: {0}")]
    Rewrite(String),

    #[error("External process failed: {0}")]
    Process(String),

    #[error("No solution is open")]
    NoProjectContext,

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in auto-package
pub type Result<T> = std::result::Result<T, AutoPackageError>;

impl AutoPackageError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        AutoPackageError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        AutoPackageError::Version(msg.into())
    }

    /// Create a rewrite error with context
    pub fn rewrite(msg: impl Into<String>) -> Self {
        AutoPackageError::Rewrite(msg.into())
    }

    /// Create an external process error with context
    pub fn process(msg: impl Into<String>) -> Self {
        AutoPackageError::Process(msg.into())
    }
}

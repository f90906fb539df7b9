pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod launcher;
pub mod orchestrator;
pub mod rewriter;
pub mod ui;

pub use error::{AutoPackageError, Result};

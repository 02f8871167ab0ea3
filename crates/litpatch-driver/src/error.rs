//! Error types for the run driver
//!
//! Provides error handling for:
//! - Fatal patch errors that abort a run
//! - Report output failures
//! - Manifest loading (file → Pass)

use litpatch_core::PatchError;
use std::path::PathBuf;

/// Errors that abort a run
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// A step hit a fatal IO error
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// Report line could not be written
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors while loading a manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Manifest file could not be read
    #[error("io error reading manifest {path}: {source}")]
    Io {
        /// Manifest path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Manifest is not valid TOML or does not match the schema
    #[error("invalid manifest: {0}")]
    Parse(#[from] toml::de::Error),

    /// A step failed spec validation
    #[error("invalid step: {0}")]
    Spec(#[from] PatchError),

    /// Manifest declares no steps
    #[error("manifest '{0}' declares no steps")]
    Empty(String),
}

impl ManifestError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

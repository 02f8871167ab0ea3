//! Error types for patch units
//!
//! Only conditions that stop a unit are errors. A missing block, an
//! ambiguous anchor or an already-patched file are [`PatchOutcome`]s.
//!
//! [`PatchOutcome`]: crate::PatchOutcome

use std::path::PathBuf;

/// Fatal patch errors
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// Target could not be read (missing, permission denied, not UTF-8)
    #[error("io error reading {path}: {source}")]
    Read {
        /// Target path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Staged content could not be written or renamed over the target
    #[error("io error writing {path}: {source}")]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Spec rejected at build time
    #[error("invalid patch spec: {0}")]
    InvalidSpec(String),
}

impl PatchError {
    /// Create read error for path
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create write error for path
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Path involved in an IO failure, if any
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } => Some(path),
            Self::InvalidSpec(_) => None,
        }
    }
}

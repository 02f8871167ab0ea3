//! Marker checks - read-only presence probes
//!
//! A [`MarkerCheck`] verifies that an earlier fix left a recognisable trace
//! in a file. It never writes.

use litpatch_core::{read_target, write_prefix, PatchError};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

/// Presence probe for any of several markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerCheck {
    id: String,
    summary: String,
    target: PathBuf,
    any_of: Vec<String>,
}

impl MarkerCheck {
    /// Create check; markers are tried in order
    #[must_use]
    pub fn new<I, S>(id: impl Into<String>, target: impl Into<PathBuf>, any_of: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            summary: String::new(),
            target: target.into(),
            any_of: any_of.into_iter().map(Into::into).collect(),
        }
    }

    /// Set summary
    #[inline]
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Check id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Target file
    #[inline]
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Probe the target file
    ///
    /// # Errors
    /// Returns [`PatchError::Read`] if the target cannot be read
    pub fn run(&self) -> Result<CheckOutcome, PatchError> {
        let content = read_target(&self.target)?;
        Ok(self.probe(&content))
    }

    /// Probe in-memory content
    #[must_use]
    pub fn probe(&self, content: &str) -> CheckOutcome {
        self.any_of
            .iter()
            .find(|m| !m.is_empty() && content.contains(m.as_str()))
            .map_or(CheckOutcome::Missing, |m| CheckOutcome::Present {
                marker: m.clone(),
            })
    }
}

/// Result of a marker check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// First marker found
    Present {
        /// Matching marker
        marker: String,
    },
    /// No marker found
    Missing,
}

impl CheckOutcome {
    /// Check if the probe failed
    #[inline]
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Printable check result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Check id
    pub id: String,
    /// Check description
    pub summary: String,
    /// Target file
    pub target: PathBuf,
    /// What was found
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

impl CheckReport {
    /// Build report for `check`
    #[must_use]
    pub fn new(check: &MarkerCheck, outcome: CheckOutcome) -> Self {
        Self {
            id: check.id.clone(),
            summary: check.summary.clone(),
            target: check.target.clone(),
            outcome,
        }
    }
}

impl Display for CheckReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_prefix(f, &self.id, None, &self.target)?;
        match &self.outcome {
            CheckOutcome::Present { marker } => write!(f, "PRESENT ({marker:?})")?,
            CheckOutcome::Missing => f.write_str("MISSING")?,
        }
        if !self.summary.is_empty() {
            write!(f, " - {}", self.summary)?;
        }
        Ok(())
    }
}

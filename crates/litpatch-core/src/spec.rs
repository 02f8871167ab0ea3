//! Patch specifications
//!
//! Provides [`PatchSpec`], the immutable description of one literal patch,
//! and [`PatchSpecBuilder`] for constructing it.

use crate::error::PatchError;
use crate::strategy::FallbackStrategy;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

/// Severity label printed next to the fix id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Lowest priority
    Low,
    /// Normal QA finding
    Medium,
    /// Important QA finding
    High,
    /// Security or data-loss finding
    Critical,
}

impl Severity {
    /// Upper-case label used in reports
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One literal patch: expected block, replacement, and fallbacks
///
/// # Invariants
/// - `old_text` is non-empty and differs from `new_text`
/// - `fallbacks` are evaluated in insertion order
#[derive(Debug)]
pub struct PatchSpec {
    id: String,
    severity: Option<Severity>,
    summary: String,
    target: PathBuf,
    old_text: String,
    new_text: String,
    skip_if_present: Option<String>,
    fallbacks: Vec<Box<dyn FallbackStrategy>>,
}

impl PatchSpec {
    /// Start building a spec for fix `id`
    #[inline]
    #[must_use]
    pub fn builder(id: impl Into<String>) -> PatchSpecBuilder {
        PatchSpecBuilder::new(id)
    }

    /// Fix id (e.g. `"1"`, `"2b"`)
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Severity label
    #[inline]
    #[must_use]
    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    /// Human-readable description of the fix
    #[inline]
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Target file
    #[inline]
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Expected literal block
    #[inline]
    #[must_use]
    pub fn old_text(&self) -> &str {
        &self.old_text
    }

    /// Replacement literal block
    #[inline]
    #[must_use]
    pub fn new_text(&self) -> &str {
        &self.new_text
    }

    /// Marker that short-circuits to already-applied
    #[inline]
    #[must_use]
    pub fn skip_if_present(&self) -> Option<&str> {
        self.skip_if_present.as_deref()
    }

    /// Fallback strategies in evaluation order
    #[inline]
    #[must_use]
    pub fn fallbacks(&self) -> &[Box<dyn FallbackStrategy>] {
        &self.fallbacks
    }
}

/// Builder for [`PatchSpec`]
#[derive(Debug)]
pub struct PatchSpecBuilder {
    id: String,
    severity: Option<Severity>,
    summary: String,
    target: Option<PathBuf>,
    old_text: Option<String>,
    new_text: Option<String>,
    skip_if_present: Option<String>,
    fallbacks: Vec<Box<dyn FallbackStrategy>>,
}

impl PatchSpecBuilder {
    /// Create new builder
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity: None,
            summary: String::new(),
            target: None,
            old_text: None,
            new_text: None,
            skip_if_present: None,
            fallbacks: Vec::new(),
        }
    }

    /// Set severity
    #[inline]
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Set summary
    #[inline]
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set target file
    #[inline]
    #[must_use]
    pub fn target(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = Some(path.into());
        self
    }

    /// Set expected block
    #[inline]
    #[must_use]
    pub fn old_text(mut self, text: impl Into<String>) -> Self {
        self.old_text = Some(text.into());
        self
    }

    /// Set replacement block
    #[inline]
    #[must_use]
    pub fn new_text(mut self, text: impl Into<String>) -> Self {
        self.new_text = Some(text.into());
        self
    }

    /// Report already-applied whenever `marker` is in the file
    #[inline]
    #[must_use]
    pub fn skip_if_present(mut self, marker: impl Into<String>) -> Self {
        self.skip_if_present = Some(marker.into());
        self
    }

    /// Append a fallback strategy
    #[inline]
    #[must_use]
    pub fn fallback(mut self, strategy: impl FallbackStrategy + 'static) -> Self {
        self.fallbacks.push(Box::new(strategy));
        self
    }

    /// Append an already boxed fallback strategy
    #[inline]
    #[must_use]
    pub fn boxed_fallback(mut self, strategy: Box<dyn FallbackStrategy>) -> Self {
        self.fallbacks.push(strategy);
        self
    }

    /// Build spec
    ///
    /// # Errors
    /// Returns [`PatchError::InvalidSpec`] if target, old or new text is
    /// missing, old text is empty, or old and new text are identical
    pub fn build(self) -> Result<PatchSpec, PatchError> {
        let Self {
            id,
            severity,
            summary,
            target,
            old_text,
            new_text,
            skip_if_present,
            fallbacks,
        } = self;
        let invalid = |what: &str| PatchError::InvalidSpec(format!("fix {id}: {what}"));

        let target = target.ok_or_else(|| invalid("missing target"))?;
        let old_text = old_text.ok_or_else(|| invalid("missing old_text"))?;
        let new_text = new_text.ok_or_else(|| invalid("missing new_text"))?;

        if old_text.is_empty() {
            return Err(invalid("old_text is empty"));
        }
        if old_text == new_text {
            return Err(invalid("old_text and new_text are identical"));
        }
        if skip_if_present.as_deref() == Some("") {
            return Err(invalid("skip_if_present marker is empty"));
        }

        Ok(PatchSpec {
            id,
            severity,
            summary,
            target,
            old_text,
            new_text,
            skip_if_present,
            fallbacks,
        })
    }
}

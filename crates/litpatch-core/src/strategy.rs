//! Fallback strategies
//!
//! Provides the [`FallbackStrategy`] trait, evaluated in order by
//! [`PatchUnit`](crate::PatchUnit) once the exact block is gone. Each
//! strategy inspects the whole file text and returns a [`StrategyVerdict`];
//! only [`StrategyVerdict::Rewrite`] leads to a write.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Default number of preceding lines searched by [`AnchoredWindow`]
pub const DEFAULT_WINDOW: usize = 10;

/// Looser matcher consulted when the exact block is missing
///
/// # Contract
/// `evaluate()` must be pure: same text in, same verdict out. Strategies
/// never touch the filesystem.
pub trait FallbackStrategy: Send + Sync + Debug {
    /// Inspect the file text
    fn evaluate(&self, content: &str) -> StrategyVerdict;

    /// Strategy name (for reports and logs)
    fn name(&self) -> &'static str;
}

/// Result of evaluating one fallback strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyVerdict {
    /// Nothing recognised; try the next strategy
    NoMatch,

    /// The change is already in the file
    AlreadyApplied,

    /// Full replacement text for the file
    Rewrite(String),

    /// Something plausible was found but cannot be patched safely
    Ambiguous(String),
}

impl StrategyVerdict {
    /// Check if evaluation should continue with the next strategy
    #[inline]
    #[must_use]
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch)
    }
}

/// Alternate literal pair, first occurrence rewritten
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactFallback {
    /// Alternate expected block
    pub old_text: String,
    /// Replacement for the alternate block
    pub new_text: String,
}

impl ExactFallback {
    /// Create exact fallback
    #[must_use]
    pub fn new(old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        Self {
            old_text: old_text.into(),
            new_text: new_text.into(),
        }
    }
}

impl FallbackStrategy for ExactFallback {
    fn evaluate(&self, content: &str) -> StrategyVerdict {
        if self.old_text.is_empty() || !content.contains(&self.old_text) {
            return StrategyVerdict::NoMatch;
        }
        StrategyVerdict::Rewrite(content.replacen(&self.old_text, &self.new_text, 1))
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}

/// Marker whose presence means the fix already landed
///
/// With `after` set, only the text following the first occurrence of that
/// scope anchor is searched. A file without the scope anchor never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPresent {
    /// Marker string
    pub marker: String,
    /// Optional scope anchor
    #[serde(default)]
    pub after: Option<String>,
}

impl MarkerPresent {
    /// Marker searched in the whole file
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            after: None,
        }
    }

    /// Restrict the search to the text between the first and second `scope`
    #[must_use]
    pub fn after(mut self, scope: impl Into<String>) -> Self {
        self.after = Some(scope.into());
        self
    }
}

impl FallbackStrategy for MarkerPresent {
    fn evaluate(&self, content: &str) -> StrategyVerdict {
        if self.marker.is_empty() {
            return StrategyVerdict::NoMatch;
        }
        let haystack = match &self.after {
            Some(scope) if scope.is_empty() => return StrategyVerdict::NoMatch,
            Some(scope) => match content.split(scope.as_str()).nth(1) {
                Some(segment) => segment,
                None => return StrategyVerdict::NoMatch,
            },
            None => content,
        };
        if haystack.contains(&self.marker) {
            StrategyVerdict::AlreadyApplied
        } else {
            StrategyVerdict::NoMatch
        }
    }

    fn name(&self) -> &'static str {
        "marker_present"
    }
}

/// Sub-fragment of the expected block; its presence means drift
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentPresent {
    /// Fragment string
    pub fragment: String,
    /// Reason reported when the fragment is found
    pub reason: String,
}

impl FragmentPresent {
    /// Create fragment probe
    #[must_use]
    pub fn new(fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }
}

impl FallbackStrategy for FragmentPresent {
    fn evaluate(&self, content: &str) -> StrategyVerdict {
        if !self.fragment.is_empty() && content.contains(&self.fragment) {
            StrategyVerdict::Ambiguous(self.reason.clone())
        } else {
            StrategyVerdict::NoMatch
        }
    }

    fn name(&self) -> &'static str {
        "fragment_present"
    }
}

/// Line anchor disambiguated by a marker in the preceding lines
///
/// A line containing `anchor` qualifies when `context_marker` occurs in the
/// `window` lines before it (the anchor line excluded). One qualifying line
/// is replaced whole by `replacement`; zero or several are ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchoredWindow {
    /// Substring identifying candidate lines
    pub anchor: String,
    /// Substring required in the preceding window
    pub context_marker: String,
    /// Number of preceding lines searched
    #[serde(default = "default_window")]
    pub window: usize,
    /// Text substituted for the qualifying line
    pub replacement: String,
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

impl AnchoredWindow {
    /// Create anchored fallback with the default window
    #[must_use]
    pub fn new(
        anchor: impl Into<String>,
        context_marker: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            anchor: anchor.into(),
            context_marker: context_marker.into(),
            window: DEFAULT_WINDOW,
            replacement: replacement.into(),
        }
    }

    /// Set window size
    #[inline]
    #[must_use]
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }
}

impl FallbackStrategy for AnchoredWindow {
    fn evaluate(&self, content: &str) -> StrategyVerdict {
        if self.anchor.is_empty() || self.context_marker.is_empty() {
            return StrategyVerdict::NoMatch;
        }

        let mut lines: Vec<&str> = content.split('\n').collect();
        let mut anchor_seen = false;
        let mut qualifying = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if !line.contains(&self.anchor) {
                continue;
            }
            anchor_seen = true;
            let start = i.saturating_sub(self.window);
            if lines[start..i].join("\n").contains(&self.context_marker) {
                qualifying.push(i);
            }
        }

        match qualifying.as_slice() {
            [] if !anchor_seen => StrategyVerdict::NoMatch,
            [] => StrategyVerdict::Ambiguous(format!(
                "found `{}` but `{}` is not within {} preceding lines",
                self.anchor, self.context_marker, self.window
            )),
            [idx] => {
                tracing::debug!(line = idx + 1, anchor = %self.anchor, "anchored line located");
                lines[*idx] = self.replacement.as_str();
                StrategyVerdict::Rewrite(lines.join("\n"))
            }
            many => {
                let numbers: Vec<String> = many.iter().map(|i| (i + 1).to_string()).collect();
                StrategyVerdict::Ambiguous(format!(
                    "`{}` qualifies on lines {}",
                    self.anchor,
                    numbers.join(", ")
                ))
            }
        }
    }

    fn name(&self) -> &'static str {
        "anchored_window"
    }
}

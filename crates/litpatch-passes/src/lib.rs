//! Built-in litpatch passes
//!
//! The SIDEBAR-01 QA fixes and the TypeScript follow-ups they required, as
//! ready-made [`Pass`]es. Run the QA pass first.
//!
//! # Example
//!
//! ```rust,ignore
//! use litpatch_passes::{PassRegistry, DEFAULT_PROJECT_ROOT};
//!
//! let registry = PassRegistry::with_defaults();
//! let pass = registry.build("sidebar01-qa", Path::new(DEFAULT_PROJECT_ROOT))?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod sidebar01_qa;
pub mod sidebar01_ts;

use litpatch_core::PatchError;
use litpatch_driver::Pass;
use std::path::Path;

/// Project root the built-in passes were written against
pub const DEFAULT_PROJECT_ROOT: &str = "/home/tikso/tikso";

/// Notes API route, relative to the project root
pub const NOTES_ROUTE: &str = "src/app/api/inbox/notes/route.ts";

/// Inbox layout component, relative to the project root
pub const INBOX_LAYOUT: &str = "src/components/inbox/inbox-layout.tsx";

/// AI server actions, relative to the project root
pub const AI_ACTIONS: &str = "src/app/(app)/[orgId]/ai/actions.ts";

type PassBuilder = fn(&Path) -> Result<Pass, PatchError>;

/// Named pass constructors
#[derive(Default, Clone)]
pub struct PassRegistry {
    entries: Vec<(&'static str, &'static str, PassBuilder)>,
}

impl std::fmt::Debug for PassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(name, _, _)| name))
            .finish()
    }
}

impl PassRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with the built-in passes
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(sidebar01_qa::NAME, sidebar01_qa::TITLE, sidebar01_qa::pass);
        registry.register(sidebar01_ts::NAME, sidebar01_ts::TITLE, sidebar01_ts::pass);
        registry
    }

    /// Register a pass constructor; a later entry with the same name wins
    pub fn register(&mut self, name: &'static str, title: &'static str, builder: PassBuilder) {
        self.entries.retain(|(n, _, _)| *n != name);
        self.entries.push((name, title, builder));
    }

    /// Check if a pass exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _, _)| *n == name)
    }

    /// `(name, title)` pairs in registration order
    #[must_use]
    pub fn list(&self) -> Vec<(&'static str, &'static str)> {
        self.entries.iter().map(|(n, t, _)| (*n, *t)).collect()
    }

    /// Build the named pass with targets under `root`
    ///
    /// Returns `None` for unknown names.
    ///
    /// # Errors
    /// Propagates [`PatchError::InvalidSpec`] from the pass constructor
    pub fn build(&self, name: &str, root: &Path) -> Option<Result<Pass, PatchError>> {
        let (_, _, builder) = self.entries.iter().find(|(n, _, _)| *n == name)?;
        tracing::debug!("Building pass {} under {}", name, root.display());
        Some(builder(root))
    }

    /// Number of registered passes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! TOML pass manifests
//!
//! Describes a [`Pass`] as data so markers, replacements and window sizes can
//! change without recompiling:
//!
//! ```toml
//! name = "sidebar01-qa"
//! title = "SIDEBAR-01 QA fixes"
//!
//! [[step]]
//! kind = "patch"
//! id = "3"
//! severity = "medium"
//! target = "src/app/(app)/[orgId]/ai/actions.ts"
//! old_text = '...'
//! new_text = '...'
//!
//! [[step.fallback]]
//! kind = "anchored_window"
//! anchor = 'assertMemberPermission(member, "liveChat")'
//! context_marker = "updateJourneyState"
//! replacement = '...'
//!
//! [[step]]
//! kind = "check"
//! id = "2b"
//! target = "src/app/api/inbox/notes/route.ts"
//! any_of = ["{ session, member }", "session, member"]
//! ```
//!
//! Relative targets are joined onto the root passed to [`Manifest::into_pass`].

use crate::check::MarkerCheck;
use crate::error::ManifestError;
use crate::pass::Pass;
use litpatch_core::{
    AnchoredWindow, ExactFallback, FallbackStrategy, FragmentPresent, MarkerPresent, PatchSpec,
    Severity,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Parsed manifest file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    /// Pass name
    pub name: String,
    /// Summary line title; defaults to the name
    #[serde(default)]
    pub title: Option<String>,
    /// Steps in execution order
    #[serde(default, rename = "step")]
    pub steps: Vec<StepEntry>,
}

/// One `[[step]]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepEntry {
    /// `kind = "patch"`
    Patch(PatchEntry),
    /// `kind = "check"`
    Check(CheckEntry),
}

/// Patch step fields
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatchEntry {
    /// Fix id
    pub id: String,
    /// Severity label
    #[serde(default)]
    pub severity: Option<Severity>,
    /// Fix description
    #[serde(default)]
    pub summary: String,
    /// Target file
    pub target: PathBuf,
    /// Expected block
    pub old_text: String,
    /// Replacement block
    pub new_text: String,
    /// Marker meaning the fix is already in place
    #[serde(default)]
    pub skip_if_present: Option<String>,
    /// Fallbacks in evaluation order
    #[serde(default, rename = "fallback")]
    pub fallbacks: Vec<FallbackEntry>,
}

/// Check step fields
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckEntry {
    /// Check id
    pub id: String,
    /// Check description
    #[serde(default)]
    pub summary: String,
    /// Target file
    pub target: PathBuf,
    /// Markers in probe order
    pub any_of: Vec<String>,
}

/// One `[[step.fallback]]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackEntry {
    /// Alternate literal pair
    Exact(ExactFallback),
    /// Marker means done
    MarkerPresent(MarkerPresent),
    /// Fragment means manual
    FragmentPresent(FragmentPresent),
    /// Anchored single-line rewrite
    AnchoredWindow(AnchoredWindow),
}

impl FallbackEntry {
    fn into_strategy(self) -> Box<dyn FallbackStrategy> {
        match self {
            Self::Exact(s) => Box::new(s),
            Self::MarkerPresent(s) => Box::new(s),
            Self::FragmentPresent(s) => Box::new(s),
            Self::AnchoredWindow(s) => Box::new(s),
        }
    }
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl Manifest {
    /// Read and parse a manifest file
    ///
    /// # Errors
    /// - [`ManifestError::Io`] if the file cannot be read
    /// - [`ManifestError::Parse`] if it is not a valid manifest
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ManifestError::io_error(path, e))?;
        let manifest: Self = text.parse()?;
        tracing::debug!("Loaded manifest {} from {}", manifest.name, path.display());
        Ok(manifest)
    }

    /// Build the pass, resolving relative targets against `root`
    ///
    /// # Errors
    /// - [`ManifestError::Empty`] if no steps are declared
    /// - [`ManifestError::Spec`] if a patch step is invalid
    pub fn into_pass(self, root: &Path) -> Result<Pass, ManifestError> {
        if self.steps.is_empty() {
            return Err(ManifestError::Empty(self.name));
        }

        let title = self.title.unwrap_or_else(|| self.name.clone());
        let mut pass = Pass::new(self.name, title);

        for step in self.steps {
            match step {
                StepEntry::Patch(entry) => pass.push(entry.into_spec(root)?),
                StepEntry::Check(entry) => pass.push(
                    MarkerCheck::new(entry.id, root.join(entry.target), entry.any_of)
                        .with_summary(entry.summary),
                ),
            }
        }
        Ok(pass)
    }
}

impl PatchEntry {
    fn into_spec(self, root: &Path) -> Result<PatchSpec, ManifestError> {
        let mut builder = PatchSpec::builder(self.id)
            .summary(self.summary)
            .target(root.join(self.target))
            .old_text(self.old_text)
            .new_text(self.new_text);
        if let Some(severity) = self.severity {
            builder = builder.severity(severity);
        }
        if let Some(marker) = self.skip_if_present {
            builder = builder.skip_if_present(marker);
        }
        for fallback in self.fallbacks {
            builder = builder.boxed_fallback(fallback.into_strategy());
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::Step;
    use litpatch_core::DEFAULT_WINDOW;

    const MANIFEST: &str = r#"
name = "demo"
title = "Demo fixes"

[[step]]
kind = "patch"
id = "3"
severity = "medium"
target = "src/actions.ts"
old_text = 'check(member, "a")'
new_text = 'check(member, "a", "b")'

[[step.fallback]]
kind = "marker_present"
marker = '"b")'

[[step.fallback]]
kind = "anchored_window"
anchor = 'check(member'
context_marker = "updateJourneyState"
replacement = "  both()"

[[step]]
kind = "check"
id = "2b"
target = "/abs/route.ts"
any_of = ["{ session, member }", "session, member"]
summary = "member destructured"
"#;

    #[test]
    fn parses_steps_and_fallbacks() {
        let manifest: Manifest = MANIFEST.parse().unwrap();
        assert_eq!(manifest.steps.len(), 2);

        let StepEntry::Patch(patch) = &manifest.steps[0] else {
            panic!("expected patch step");
        };
        assert_eq!(patch.severity, Some(Severity::Medium));
        assert_eq!(patch.fallbacks.len(), 2);
        let FallbackEntry::AnchoredWindow(window) = &patch.fallbacks[1] else {
            panic!("expected anchored_window");
        };
        assert_eq!(window.window, DEFAULT_WINDOW);
    }

    #[test]
    fn relative_targets_join_root() {
        let manifest: Manifest = MANIFEST.parse().unwrap();
        let pass = manifest.into_pass(Path::new("/srv/app")).unwrap();

        assert_eq!(pass.title(), "Demo fixes");
        assert_eq!(
            pass.steps()[0].target(),
            Path::new("/srv/app/src/actions.ts")
        );
        assert_eq!(pass.steps()[1].target(), Path::new("/abs/route.ts"));

        let Step::Patch(spec) = &pass.steps()[0] else {
            panic!("expected patch step");
        };
        let names: Vec<_> = spec.fallbacks().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["marker_present", "anchored_window"]);
    }

    #[test]
    fn title_defaults_to_name() {
        let manifest: Manifest = "name = \"solo\"\n[[step]]\nkind = \"check\"\nid = \"1\"\ntarget = \"a\"\nany_of = [\"x\"]\n"
            .parse()
            .unwrap();
        let pass = manifest.into_pass(Path::new(".")).unwrap();
        assert_eq!(pass.title(), "solo");
    }

    #[test]
    fn empty_manifest_rejected() {
        let manifest: Manifest = "name = \"none\"".parse().unwrap();
        assert!(matches!(
            manifest.into_pass(Path::new(".")),
            Err(ManifestError::Empty(name)) if name == "none"
        ));
    }

    #[test]
    fn unknown_kind_is_parse_error() {
        let result: Result<Manifest, _> =
            "name = \"x\"\n[[step]]\nkind = \"delete\"\nid = \"1\"\n".parse();
        assert!(matches!(result, Err(ManifestError::Parse(_))));
    }

    #[test]
    fn identical_texts_are_spec_errors() {
        let manifest: Manifest = "name = \"x\"\n[[step]]\nkind = \"patch\"\nid = \"1\"\ntarget = \"a\"\nold_text = \"same\"\nnew_text = \"same\"\n"
            .parse()
            .unwrap();
        assert!(matches!(
            manifest.into_pass(Path::new(".")),
            Err(ManifestError::Spec(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Manifest::from_path(Path::new("/nonexistent/litpatch.toml")).unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
    }
}

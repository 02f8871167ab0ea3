//! Patch unit - read, match, rewrite, classify
//!
//! Applies one [`PatchSpec`] to its target file.
//!
//! # Evaluation order
//!
//! ```text
//! read → skip marker? → exact block? → replacement present? → fallbacks… → NotFound
//!            │               │                 │                  │
//!      AlreadyApplied    Applied         AlreadyApplied     Applied / AlreadyApplied / Manual
//! ```
//!
//! A replacement that contains the expected block is looked for before the
//! exact match, so re-running it cannot duplicate the block.

use crate::error::PatchError;
use crate::outcome::PatchOutcome;
use crate::spec::PatchSpec;
use crate::strategy::StrategyVerdict;
use crate::write::{read_target, write_atomic};

/// Stateless executor for patch specs
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchUnit;

impl PatchUnit {
    /// Apply `spec` to its target file
    ///
    /// The file is written (atomically) only when the outcome is
    /// [`PatchOutcome::Applied`]. Only the first occurrence of the expected
    /// block is replaced.
    ///
    /// # Errors
    /// - [`PatchError::Read`] if the target cannot be read
    /// - [`PatchError::Write`] if the rewritten content cannot be stored
    pub fn apply(spec: &PatchSpec) -> Result<PatchOutcome, PatchError> {
        let path = spec.target();
        let content = read_target(path)?;

        let outcome = match Self::evaluate(spec, &content) {
            Evaluation::Rewrite(rewritten, outcome) => {
                write_atomic(path, &rewritten)?;
                tracing::info!(fix = spec.id(), path = %path.display(), "patch applied");
                outcome
            }
            Evaluation::Unchanged(outcome) => outcome,
        };

        if outcome.needs_attention() {
            tracing::warn!(
                fix = spec.id(),
                path = %path.display(),
                outcome = outcome.label(),
                "patch unresolved"
            );
        }
        Ok(outcome)
    }

    /// Classify `spec` against in-memory `content` without touching disk
    ///
    /// Returns the outcome together with the rewritten text when the outcome
    /// is applied.
    #[must_use]
    pub fn preview(spec: &PatchSpec, content: &str) -> (PatchOutcome, Option<String>) {
        match Self::evaluate(spec, content) {
            Evaluation::Rewrite(rewritten, outcome) => (outcome, Some(rewritten)),
            Evaluation::Unchanged(outcome) => (outcome, None),
        }
    }

    fn evaluate(spec: &PatchSpec, content: &str) -> Evaluation {
        if let Some(marker) = spec.skip_if_present() {
            if content.contains(marker) {
                tracing::debug!(fix = spec.id(), marker, "skip marker present");
                return Evaluation::Unchanged(PatchOutcome::AlreadyApplied);
            }
        }

        let new_text = spec.new_text();
        let replacement_present = !new_text.is_empty() && content.contains(new_text);

        // A replacement that embeds the expected block would match it again.
        if replacement_present && new_text.contains(spec.old_text()) {
            tracing::debug!(fix = spec.id(), "replacement block already present");
            return Evaluation::Unchanged(PatchOutcome::AlreadyApplied);
        }

        if content.contains(spec.old_text()) {
            let rewritten = content.replacen(spec.old_text(), spec.new_text(), 1);
            return Evaluation::Rewrite(rewritten, PatchOutcome::applied());
        }

        if replacement_present {
            tracing::debug!(fix = spec.id(), "replacement block already present");
            return Evaluation::Unchanged(PatchOutcome::AlreadyApplied);
        }

        for strategy in spec.fallbacks() {
            let verdict = strategy.evaluate(content);
            tracing::debug!(
                fix = spec.id(),
                strategy = strategy.name(),
                ?verdict,
                "fallback evaluated"
            );
            match verdict {
                StrategyVerdict::NoMatch => continue,
                StrategyVerdict::AlreadyApplied => {
                    return Evaluation::Unchanged(PatchOutcome::AlreadyApplied);
                }
                StrategyVerdict::Rewrite(rewritten) => {
                    return Evaluation::Rewrite(
                        rewritten,
                        PatchOutcome::applied_via(strategy.name()),
                    );
                }
                StrategyVerdict::Ambiguous(reason) => {
                    return Evaluation::Unchanged(PatchOutcome::manual(reason));
                }
            }
        }

        Evaluation::Unchanged(PatchOutcome::NotFound)
    }
}

enum Evaluation {
    Rewrite(String, PatchOutcome),
    Unchanged(PatchOutcome),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{AnchoredWindow, FragmentPresent, MarkerPresent};

    fn spec(old: &str, new: &str) -> crate::spec::PatchSpecBuilder {
        PatchSpec::builder("1").target("unused").old_text(old).new_text(new)
    }

    #[test]
    fn preview_exact_replaces_first() {
        let s = spec("x", "y").build().unwrap();
        let (outcome, text) = PatchUnit::preview(&s, "x-x");
        assert_eq!(outcome, PatchOutcome::applied());
        assert_eq!(text.as_deref(), Some("y-x"));
    }

    #[test]
    fn skip_marker_wins_over_exact_match() {
        let s = spec("assert", "assert, has")
            .skip_if_present("has")
            .build()
            .unwrap();
        let (outcome, text) = PatchUnit::preview(&s, "import { assert, has }");
        assert_eq!(outcome, PatchOutcome::AlreadyApplied);
        assert!(text.is_none());
    }

    #[test]
    fn replacement_present_is_already_applied() {
        let s = spec("old line", "new line").build().unwrap();
        let (outcome, _) = PatchUnit::preview(&s, "a\nnew line\nb");
        assert_eq!(outcome, PatchOutcome::AlreadyApplied);
    }

    #[test]
    fn widening_replacement_applies_once() {
        let s = spec("assert", "assert, has").build().unwrap();

        let (first, text) = PatchUnit::preview(&s, "import { assert } from \"x\";");
        assert_eq!(first, PatchOutcome::applied());
        let text = text.unwrap();
        assert_eq!(text, "import { assert, has } from \"x\";");

        let (second, again) = PatchUnit::preview(&s, &text);
        assert_eq!(second, PatchOutcome::AlreadyApplied);
        assert!(again.is_none());
    }

    #[test]
    fn widening_replacement_rerun_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actions.ts");
        std::fs::write(&path, "import { assert } from \"x\";\n").unwrap();
        let s = PatchSpec::builder("1a")
            .target(path.clone())
            .old_text("assert")
            .new_text("assert, has")
            .build()
            .unwrap();

        assert_eq!(PatchUnit::apply(&s).unwrap(), PatchOutcome::applied());
        assert_eq!(PatchUnit::apply(&s).unwrap(), PatchOutcome::AlreadyApplied);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "import { assert, has } from \"x\";\n"
        );
    }

    #[test]
    fn empty_replacement_is_not_treated_as_present() {
        let s = spec("old", "").build().unwrap();
        let (outcome, _) = PatchUnit::preview(&s, "other");
        assert_eq!(outcome, PatchOutcome::NotFound);
    }

    #[test]
    fn fallbacks_run_in_order() {
        let s = spec("missing", "replacement")
            .fallback(FragmentPresent::new("frag", "drift"))
            .fallback(MarkerPresent::new("frag"))
            .build()
            .unwrap();
        let (outcome, _) = PatchUnit::preview(&s, "frag");
        assert_eq!(outcome, PatchOutcome::manual("drift"));
    }

    #[test]
    fn no_match_falls_through_to_next() {
        let s = spec("missing", "replacement")
            .fallback(FragmentPresent::new("absent", "drift"))
            .fallback(MarkerPresent::new("done"))
            .build()
            .unwrap();
        let (outcome, _) = PatchUnit::preview(&s, "done");
        assert_eq!(outcome, PatchOutcome::AlreadyApplied);
    }

    #[test]
    fn fallback_rewrite_names_strategy() {
        let s = spec("missing", "replacement")
            .fallback(AnchoredWindow::new("check()", "ctx", "fixed();"))
            .build()
            .unwrap();
        let (outcome, text) = PatchUnit::preview(&s, "ctx\ncheck();");
        assert_eq!(outcome, PatchOutcome::applied_via("anchored_window"));
        assert_eq!(text.as_deref(), Some("ctx\nfixed();"));
    }

    #[test]
    fn nothing_matches_is_not_found() {
        let s = spec("missing", "replacement")
            .fallback(MarkerPresent::new("absent"))
            .build()
            .unwrap();
        let (outcome, text) = PatchUnit::preview(&s, "unrelated");
        assert_eq!(outcome, PatchOutcome::NotFound);
        assert!(text.is_none());
    }

    #[test]
    fn matching_is_case_and_whitespace_sensitive() {
        let s = spec("Foo  bar", "baz").build().unwrap();
        assert_eq!(PatchUnit::preview(&s, "foo  bar").0, PatchOutcome::NotFound);
        assert_eq!(PatchUnit::preview(&s, "Foo bar").0, PatchOutcome::NotFound);
    }
}

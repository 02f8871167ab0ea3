//! Patch outcomes

use serde::Serialize;

/// How an applied patch located its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "via", content = "strategy", rename_all = "snake_case")]
pub enum Resolution {
    /// The expected block matched verbatim
    Exact,
    /// A named fallback strategy produced the rewrite
    Fallback(&'static str),
}

/// Classification of one patch unit run
///
/// Only [`PatchOutcome::Applied`] implies the target file was rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PatchOutcome {
    /// File rewritten
    Applied {
        /// Match path used
        resolution: Resolution,
    },

    /// Replacement or an equivalent marker already present
    AlreadyApplied,

    /// Neither the block nor any fallback matched
    NotFound,

    /// A fallback matched partially or ambiguously
    ManualInterventionRequired {
        /// Why the unit refused to patch
        reason: String,
    },
}

impl PatchOutcome {
    /// Applied through the exact block
    #[inline]
    #[must_use]
    pub fn applied() -> Self {
        Self::Applied {
            resolution: Resolution::Exact,
        }
    }

    /// Applied through a fallback strategy
    #[inline]
    #[must_use]
    pub fn applied_via(strategy: &'static str) -> Self {
        Self::Applied {
            resolution: Resolution::Fallback(strategy),
        }
    }

    /// Manual intervention with reason
    #[inline]
    #[must_use]
    pub fn manual(reason: impl Into<String>) -> Self {
        Self::ManualInterventionRequired {
            reason: reason.into(),
        }
    }

    /// Check if the file was rewritten
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Check if a human has to follow up
    #[inline]
    #[must_use]
    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::NotFound | Self::ManualInterventionRequired { .. })
    }

    /// Upper-case category label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Applied { .. } => "APPLIED",
            Self::AlreadyApplied => "ALREADY APPLIED",
            Self::NotFound => "NOT FOUND",
            Self::ManualInterventionRequired { .. } => "MANUAL INTERVENTION REQUIRED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attention_only_for_unresolved() {
        assert!(!PatchOutcome::applied().needs_attention());
        assert!(!PatchOutcome::AlreadyApplied.needs_attention());
        assert!(PatchOutcome::NotFound.needs_attention());
        assert!(PatchOutcome::manual("drift").needs_attention());
    }

    #[test]
    fn applied_via_keeps_strategy_name() {
        let outcome = PatchOutcome::applied_via("anchored_window");
        assert!(outcome.is_applied());
        assert_eq!(
            outcome,
            PatchOutcome::Applied {
                resolution: Resolution::Fallback("anchored_window")
            }
        );
    }

    #[test]
    fn serializes_with_tag() {
        let json = serde_json::to_value(PatchOutcome::manual("pattern mismatch")).unwrap();
        assert_eq!(json["outcome"], "manual_intervention_required");
        assert_eq!(json["reason"], "pattern mismatch");

        let json = serde_json::to_value(PatchOutcome::applied_via("exact")).unwrap();
        assert_eq!(json["outcome"], "applied");
        assert_eq!(json["resolution"]["via"], "fallback");
        assert_eq!(json["resolution"]["strategy"], "exact");
    }
}

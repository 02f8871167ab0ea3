//! Passes and steps
//!
//! A [`Pass`] is a hand-enumerated, ordered list of [`Step`]s addressing one
//! QA concern.

use crate::check::MarkerCheck;
use litpatch_core::PatchSpec;
use std::path::Path;

/// One unit of work in a pass
#[derive(Debug)]
pub enum Step {
    /// Rewrite a file
    Patch(PatchSpec),
    /// Probe a file for markers
    Check(MarkerCheck),
}

impl Step {
    /// Step id as printed in reports
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Patch(spec) => spec.id(),
            Self::Check(check) => check.id(),
        }
    }

    /// File the step reads
    #[must_use]
    pub fn target(&self) -> &Path {
        match self {
            Self::Patch(spec) => spec.target(),
            Self::Check(check) => check.target(),
        }
    }
}

impl From<PatchSpec> for Step {
    fn from(spec: PatchSpec) -> Self {
        Self::Patch(spec)
    }
}

impl From<MarkerCheck> for Step {
    fn from(check: MarkerCheck) -> Self {
        Self::Check(check)
    }
}

/// Ordered steps for one QA concern
#[derive(Debug)]
pub struct Pass {
    name: String,
    title: String,
    steps: Vec<Step>,
}

impl Pass {
    /// Create empty pass
    #[must_use]
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            steps: Vec::new(),
        }
    }

    /// Append a patch step
    #[inline]
    #[must_use]
    pub fn patch(mut self, spec: PatchSpec) -> Self {
        self.steps.push(Step::Patch(spec));
        self
    }

    /// Append a check step
    #[inline]
    #[must_use]
    pub fn check(mut self, check: MarkerCheck) -> Self {
        self.steps.push(Step::Check(check));
        self
    }

    /// Append any step
    #[inline]
    pub fn push(&mut self, step: impl Into<Step>) {
        self.steps.push(step.into());
    }

    /// Short name (e.g. `sidebar01-qa`)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Title used in the summary line
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Steps in execution order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of check steps
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::Check(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_keep_declaration_order() {
        let spec = PatchSpec::builder("1")
            .target("a.ts")
            .old_text("a")
            .new_text("b")
            .build()
            .unwrap();
        let mut pass = Pass::new("demo", "Demo")
            .check(MarkerCheck::new("0", "b.ts", ["x"]))
            .patch(spec);
        pass.push(MarkerCheck::new("2", "c.ts", ["y"]));

        let ids: Vec<_> = pass.steps().iter().map(Step::id).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
        assert_eq!(pass.check_count(), 2);
        assert_eq!(pass.steps()[1].target(), Path::new("a.ts"));
    }
}

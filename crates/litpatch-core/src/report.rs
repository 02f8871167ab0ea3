//! Report lines
//!
//! One human-readable line per patch unit: fix id, severity, file name and
//! outcome category.

use crate::outcome::{PatchOutcome, Resolution};
use crate::spec::{PatchSpec, Severity};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

/// Outcome of one patch unit with the fields needed to print it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    /// Fix id
    pub id: String,
    /// Severity label
    pub severity: Option<Severity>,
    /// Fix description
    pub summary: String,
    /// Target file
    pub target: PathBuf,
    /// What happened
    #[serde(flatten)]
    pub outcome: PatchOutcome,
}

impl PatchReport {
    /// Build report for `spec`
    #[must_use]
    pub fn new(spec: &PatchSpec, outcome: PatchOutcome) -> Self {
        Self {
            id: spec.id().to_string(),
            severity: spec.severity(),
            summary: spec.summary().to_string(),
            target: spec.target().to_path_buf(),
            outcome,
        }
    }
}

/// Write `Fix <id> (<SEVERITY>) [<file>]: ` prefix
///
/// Shared with other step kinds so every report line starts the same way.
///
/// # Errors
/// Propagates formatter errors
pub fn write_prefix(
    f: &mut Formatter<'_>,
    id: &str,
    severity: Option<Severity>,
    target: &Path,
) -> fmt::Result {
    write!(f, "Fix {id}")?;
    if let Some(severity) = severity {
        write!(f, " ({severity})")?;
    }
    let name = target
        .file_name()
        .map_or_else(|| target.display().to_string(), |n| n.to_string_lossy().into_owned());
    write!(f, " [{name}]: ")
}

impl Display for PatchReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_prefix(f, &self.id, self.severity, &self.target)?;
        f.write_str(self.outcome.label())?;
        match &self.outcome {
            PatchOutcome::Applied {
                resolution: Resolution::Fallback(name),
            } => write!(f, " via {name}")?,
            PatchOutcome::NotFound => {
                return write!(
                    f,
                    " - expected block missing from {}",
                    self.target.display()
                );
            }
            PatchOutcome::ManualInterventionRequired { reason } => {
                return write!(f, " - {reason}");
            }
            _ => {}
        }
        if !self.summary.is_empty() {
            write!(f, " - {}", self.summary)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcome: PatchOutcome) -> PatchReport {
        PatchReport {
            id: "1".to_string(),
            severity: Some(Severity::Critical),
            summary: "AC2 author check".to_string(),
            target: PathBuf::from("/srv/app/src/app/api/inbox/notes/route.ts"),
            outcome,
        }
    }

    #[test]
    fn applied_line() {
        assert_eq!(
            report(PatchOutcome::applied()).to_string(),
            "Fix 1 (CRITICAL) [route.ts]: APPLIED - AC2 author check"
        );
    }

    #[test]
    fn applied_via_fallback_line() {
        assert_eq!(
            report(PatchOutcome::applied_via("anchored_window")).to_string(),
            "Fix 1 (CRITICAL) [route.ts]: APPLIED via anchored_window - AC2 author check"
        );
    }

    #[test]
    fn not_found_names_full_path() {
        assert_eq!(
            report(PatchOutcome::NotFound).to_string(),
            "Fix 1 (CRITICAL) [route.ts]: NOT FOUND - expected block missing from /srv/app/src/app/api/inbox/notes/route.ts"
        );
    }

    #[test]
    fn manual_line_uses_reason() {
        assert_eq!(
            report(PatchOutcome::manual("pattern mismatch")).to_string(),
            "Fix 1 (CRITICAL) [route.ts]: MANUAL INTERVENTION REQUIRED - pattern mismatch"
        );
    }

    #[test]
    fn no_severity_no_summary() {
        let mut r = report(PatchOutcome::AlreadyApplied);
        r.severity = None;
        r.summary.clear();
        assert_eq!(r.to_string(), "Fix 1 [route.ts]: ALREADY APPLIED");
    }
}

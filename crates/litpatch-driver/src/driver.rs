//! Run driver - executes a pass step by step
//!
//! Writes one report line per step to the output sink, then a blank line
//! and the summary line. Non-fatal outcomes never stop a run; there is no
//! rollback of steps that already wrote.
//!
//! A dry run keeps each target's would-be content in memory, so later steps
//! on the same file see what earlier steps would have written.

use crate::check::{CheckOutcome, CheckReport, MarkerCheck};
use crate::error::DriverError;
use crate::pass::{Pass, Step};
use litpatch_core::{read_target, PatchOutcome, PatchReport, PatchSpec, PatchUnit};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

/// How unresolved outcomes map to the process exit status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Always succeed once the run completes
    #[default]
    Advisory,
    /// Fail when any step is unresolved
    Strict,
}

impl ExitPolicy {
    /// Exit status for a completed run
    #[must_use]
    pub fn exit_code(self, summary: &RunSummary) -> u8 {
        match self {
            Self::Advisory => 0,
            Self::Strict if summary.unresolved() > 0 => 1,
            Self::Strict => 0,
        }
    }
}

/// Run configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Exit status policy
    pub policy: ExitPolicy,
    /// Classify steps without writing any file
    pub dry_run: bool,
}

impl RunOptions {
    /// Create default options (advisory, writing)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With exit policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: ExitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// With dry run
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Per-category counts for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Units rewritten
    pub applied: usize,
    /// Units found already in their target state
    pub already_applied: usize,
    /// Units whose expected block was missing
    pub not_found: usize,
    /// Units needing a human
    pub manual: usize,
    /// Checks that found a marker
    pub checks_passed: usize,
    /// Checks that found nothing
    pub checks_failed: usize,
}

impl RunSummary {
    /// Count a patch outcome
    pub fn record_patch(&mut self, outcome: &PatchOutcome) {
        match outcome {
            PatchOutcome::Applied { .. } => self.applied += 1,
            PatchOutcome::AlreadyApplied => self.already_applied += 1,
            PatchOutcome::NotFound => self.not_found += 1,
            PatchOutcome::ManualInterventionRequired { .. } => self.manual += 1,
        }
    }

    /// Count a check outcome
    pub fn record_check(&mut self, outcome: &CheckOutcome) {
        match outcome {
            CheckOutcome::Present { .. } => self.checks_passed += 1,
            CheckOutcome::Missing => self.checks_failed += 1,
        }
    }

    /// Steps a strict run fails on
    #[inline]
    #[must_use]
    pub fn unresolved(&self) -> usize {
        self.not_found + self.manual + self.checks_failed
    }

    /// Summary line for a pass titled `title`
    #[must_use]
    pub fn line(&self, title: &str) -> String {
        let mut line = format!(
            "{title}: {} applied, {} already applied, {} not found, {} need manual intervention",
            self.applied, self.already_applied, self.not_found, self.manual
        );
        if self.checks_passed + self.checks_failed > 0 {
            let _ = write!(
                line,
                ", {} checks passed, {} checks failed",
                self.checks_passed, self.checks_failed
            );
        }
        line
    }
}

/// Record of one executed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepReport {
    /// Patch unit result
    Patch(PatchReport),
    /// Marker check result
    Check(CheckReport),
}

impl std::fmt::Display for StepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Patch(report) => report.fmt(f),
            Self::Check(report) => report.fmt(f),
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Pass name
    pub pass: String,
    /// Pass title
    pub title: String,
    /// Whether files were left untouched
    pub dry_run: bool,
    /// Step records in execution order
    pub steps: Vec<StepReport>,
    /// Counts
    pub summary: RunSummary,
}

impl RunReport {
    /// Summary line as printed at the end of a run
    #[must_use]
    pub fn summary_line(&self) -> String {
        let line = self.summary.line(&self.title);
        if self.dry_run {
            format!("{line} (dry run)")
        } else {
            line
        }
    }
}

/// Sequential executor for passes
#[derive(Debug, Clone, Default)]
pub struct RunDriver {
    options: RunOptions,
}

impl RunDriver {
    /// Create driver with options
    #[inline]
    #[must_use]
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    /// Execute every step of `pass` in order, writing report lines to `out`
    ///
    /// # Errors
    /// - [`DriverError::Patch`] on the first unreadable or unwritable target;
    ///   the run stops there and earlier writes stay in place
    /// - [`DriverError::Output`] if `out` rejects a line
    pub fn run<W: Write + ?Sized>(
        &self,
        pass: &Pass,
        out: &mut W,
    ) -> Result<RunReport, DriverError> {
        tracing::info!("Running pass {} ({} steps)", pass.name(), pass.steps().len());

        let mut summary = RunSummary::default();
        let mut steps = Vec::with_capacity(pass.steps().len());
        let mut staged = Staged::new();

        for step in pass.steps() {
            let report = match step {
                Step::Patch(spec) => {
                    let outcome = self.apply(spec, &mut staged)?;
                    summary.record_patch(&outcome);
                    StepReport::Patch(PatchReport::new(spec, outcome))
                }
                Step::Check(check) => {
                    let outcome = Self::check(check, &staged)?;
                    if outcome.is_missing() {
                        tracing::warn!(
                            check = check.id(),
                            path = %check.target().display(),
                            "marker missing"
                        );
                    }
                    summary.record_check(&outcome);
                    StepReport::Check(CheckReport::new(check, outcome))
                }
            };
            writeln!(out, "{report}")?;
            steps.push(report);
        }

        let report = RunReport {
            pass: pass.name().to_string(),
            title: pass.title().to_string(),
            dry_run: self.options.dry_run,
            steps,
            summary,
        };
        writeln!(out)?;
        writeln!(out, "{}", report.summary_line())?;
        tracing::info!("Pass {} finished: {} unresolved", pass.name(), summary.unresolved());
        Ok(report)
    }

    /// Exit status for `report` under the configured policy
    #[inline]
    #[must_use]
    pub fn exit_code(&self, report: &RunReport) -> u8 {
        self.options.policy.exit_code(&report.summary)
    }

    fn apply(&self, spec: &PatchSpec, staged: &mut Staged) -> Result<PatchOutcome, DriverError> {
        if !self.options.dry_run {
            return Ok(PatchUnit::apply(spec)?);
        }

        let content = match staged.remove(spec.target()) {
            Some(content) => content,
            None => read_target(spec.target())?,
        };
        let (outcome, rewritten) = PatchUnit::preview(spec, &content);
        tracing::debug!(fix = spec.id(), outcome = outcome.label(), "dry run");
        staged.insert(spec.target().to_path_buf(), rewritten.unwrap_or(content));
        Ok(outcome)
    }

    fn check(check: &MarkerCheck, staged: &Staged) -> Result<CheckOutcome, DriverError> {
        match staged.get(check.target()) {
            Some(content) => Ok(check.probe(content)),
            None => Ok(check.run()?),
        }
    }
}

/// Would-be file contents during a dry run, keyed by target path
type Staged = HashMap<PathBuf, String>;

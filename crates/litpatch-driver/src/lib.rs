//! litpatch run driver
//!
//! Sequences patch units and marker checks for one QA pass, prints one line
//! per step and a closing summary line.
//!
//! # Core Concepts
//!
//! - [`Pass`]: ordered [`Step`]s for one concern
//! - [`MarkerCheck`]: read-only probe proving an earlier fix is in place
//! - [`RunDriver`]: executes a pass, never rolls back
//! - [`ExitPolicy`]: advisory (always 0) or strict (1 on anything unresolved)
//! - [`Manifest`]: a pass described in TOML
//!
//! # Example
//!
//! ```rust,ignore
//! use litpatch_driver::{ExitPolicy, Manifest, RunDriver, RunOptions};
//!
//! let pass = Manifest::from_path(path)?.into_pass(root)?;
//! let driver = RunDriver::new(RunOptions::new().with_policy(ExitPolicy::Strict));
//! let report = driver.run(&pass, &mut std::io::stdout())?;
//! std::process::exit(driver.exit_code(&report).into());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod check;
mod driver;
mod error;
mod manifest;
mod pass;

pub use check::{CheckOutcome, CheckReport, MarkerCheck};
pub use driver::{ExitPolicy, RunDriver, RunOptions, RunReport, RunSummary, StepReport};
pub use error::{DriverError, ManifestError};
pub use manifest::{CheckEntry, FallbackEntry, Manifest, PatchEntry, StepEntry};
pub use pass::{Pass, Step};

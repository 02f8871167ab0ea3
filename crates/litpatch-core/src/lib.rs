//! litpatch core
//!
//! Literal find-and-replace patching of source files, with ordered fallback
//! heuristics and one report line per patch.
//!
//! # Core Concepts
//!
//! - [`PatchSpec`]: expected block, replacement and fallbacks for one fix
//! - [`PatchUnit`]: applies a spec to its target file
//! - [`PatchOutcome`]: applied / already applied / not found / manual
//! - [`FallbackStrategy`]: looser matcher used once the exact block is gone
//! - [`PatchReport`]: printable line for one outcome
//!
//! Matching is literal: case-sensitive, whitespace-sensitive, no parsing.
//!
//! # Example
//!
//! ```rust,ignore
//! use litpatch_core::{MarkerPresent, PatchSpec, PatchUnit, Severity};
//!
//! let spec = PatchSpec::builder("1")
//!     .severity(Severity::Critical)
//!     .target("src/app/api/inbox/notes/route.ts")
//!     .old_text(OLD_DELETE)
//!     .new_text(NEW_DELETE)
//!     .fallback(MarkerPresent::new("authorId").after("DELETE"))
//!     .build()?;
//!
//! let outcome = PatchUnit::apply(&spec)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod outcome;
mod report;
mod spec;
mod strategy;
mod unit;
mod write;

pub use error::PatchError;
pub use outcome::{PatchOutcome, Resolution};
pub use report::{write_prefix, PatchReport};
pub use spec::{PatchSpec, PatchSpecBuilder, Severity};
pub use strategy::{
    AnchoredWindow, ExactFallback, FallbackStrategy, FragmentPresent, MarkerPresent,
    StrategyVerdict, DEFAULT_WINDOW,
};
pub use unit::PatchUnit;
pub use write::{read_target, write_atomic};

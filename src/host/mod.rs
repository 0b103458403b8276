//! Host driver
//!
//! The engine never reads source files itself. A host toolchain writes one
//! [`AnalysisUnit`] snapshot per source file; the [`Driver`] runs the
//! override rule over each unit and places the diagnostics in their file.

mod driver;
mod snapshot;

pub use driver::{Driver, FileReport, Finding};
pub use snapshot::{AnalysisUnit, SnapshotError};

//! overridelint - consistent `@override` tags and `override` keywords
//!
//! This library checks class members that override a base class member or
//! implement an interface member, and produces formatting-preserving fixes
//! for missing or unnecessary override declarations.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! 1. **Discovery** - Find analysis-unit snapshots written by the host toolchain
//! 2. **Loading** - Read each unit: source text, class declarations, type information
//! 3. **Resolution** - Find what each member overrides through the type hierarchy
//! 4. **Policy** - Compare the member's declarations with the configured style
//! 5. **Fixing** - Compute edits and optionally write them back to disk
//! 6. **Reporting** - Output findings in various formats

pub mod analysis;
pub mod baseline;
pub mod config;
pub mod discovery;
pub mod fix;
pub mod hierarchy;
pub mod host;
pub mod report;
pub mod syntax;

pub use analysis::{
    Diagnostic, MessageKind, OverrideResolver, OverrideRule, OverrideSource, PolicyConfiguration,
    PolicyStyle,
};
pub use baseline::Baseline;
pub use config::Config;
pub use discovery::FileFinder;
pub use fix::{apply_fixes, build_fix, Edit, Fix};
pub use hierarchy::{TypeDeclaration, TypeGraph, TypeHierarchy};
pub use host::{AnalysisUnit, Driver, FileReport, Finding};
pub use report::{ReportFormat, Reporter};
pub use syntax::{ClassLikeDeclaration, MemberDeclaration, SourceText, TextRange};

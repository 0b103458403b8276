// Visits every class and member of a unit and collects findings

use super::AnalysisUnit;
use crate::analysis::{Diagnostic, OverrideRule, PolicyConfiguration};
use crate::config::Config;
use crate::hierarchy::{TypeGraph, TypeHierarchy};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A diagnostic placed in a file
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub file: PathBuf,

    /// 1-indexed line of the member start
    pub line: usize,

    /// 1-indexed column of the member start
    pub column: usize,

    pub diagnostic: Diagnostic,
}

impl Finding {
    pub fn is_fixable(&self) -> bool {
        self.diagnostic.is_fixable()
    }
}

/// Findings for one analysis unit
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    /// Source file on disk
    pub file: PathBuf,

    /// Snapshot the findings came from
    pub snapshot: Option<PathBuf>,

    pub findings: Vec<Finding>,
}

impl FileReport {
    pub fn fixable_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_fixable()).count()
    }
}

/// Runs the override rule over analysis units
pub struct Driver {
    policy: PolicyConfiguration,
    skip_classes: Vec<String>,
}

impl Driver {
    pub fn new(policy: PolicyConfiguration) -> Self {
        Self {
            policy,
            skip_classes: Vec::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.policy).with_skip_classes(config.skip_classes.clone())
    }

    pub fn with_skip_classes(mut self, patterns: Vec<String>) -> Self {
        self.skip_classes = patterns;
        self
    }

    fn skips_class(&self, name: Option<&str>) -> bool {
        name.is_some_and(|name| {
            self.skip_classes
                .iter()
                .any(|pattern| crate::config::wildcard_match(pattern, name))
        })
    }

    /// Check one unit; classes and members are visited once, in order
    pub fn run_unit(&self, unit: &AnalysisUnit) -> FileReport {
        let graph = unit.type_graph();
        let hierarchy = graph.as_ref().map(|g| g as &dyn TypeHierarchy);
        if hierarchy.is_none() {
            debug!(
                "No type information for {}, using heritage heuristic",
                unit.file.display()
            );
        }

        if let Some(graph) = &graph {
            self.warn_missing_heritage(graph, unit);
        }

        let rule = OverrideRule::new(self.policy, hierarchy);
        let source = unit.source_text();
        let file = unit.source_path();

        let findings = unit
            .classes
            .iter()
            .filter(|class| {
                let skip = self.skips_class(class.name.as_deref());
                if skip {
                    debug!("Skipping class '{}' by pattern", class.display_name());
                }
                !skip
            })
            .flat_map(|class| rule.check_class(class, source))
            .map(|diagnostic| {
                let (line, column) = source.line_col(diagnostic.range.start);
                Finding {
                    file: file.clone(),
                    line,
                    column,
                    diagnostic,
                }
            })
            .collect();

        FileReport {
            file,
            snapshot: unit.origin.clone(),
            findings,
        }
    }

    /// Inherited members of an unknown base resolve as the class's own
    fn warn_missing_heritage(&self, graph: &TypeGraph, unit: &AnalysisUnit) {
        for class in &unit.classes {
            if self.skips_class(class.name.as_deref()) {
                continue;
            }
            let missing = graph.missing_heritage(class);
            if !missing.is_empty() {
                warn!(
                    "{}: no type information for {} (base of '{}'); its members are checked as own members",
                    unit.file.display(),
                    missing.join(", "),
                    class.display_name()
                );
            }
        }
    }

    /// Check units in parallel; reports come back in input order
    pub fn run_all(&self, units: &[AnalysisUnit]) -> Vec<FileReport> {
        info!("Checking {} units", units.len());
        units.par_iter().map(|unit| self.run_unit(unit)).collect()
    }
}

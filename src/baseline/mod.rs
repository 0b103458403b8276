//! Baselines
//!
//! A baseline records the findings of one run so later runs report only
//! findings that are new.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

use crate::analysis::MessageKind;
use crate::host::Finding;

#[derive(Error, Debug)]
pub enum BaselineError {
    #[error("Failed to read baseline file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse baseline: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Baseline version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
}

const BASELINE_VERSION: u32 = 1;

/// Lines a member may move between runs and still match its fingerprint
const LINE_DRIFT: usize = 10;

/// A finding identity that survives small edits to the file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueFingerprint {
    /// File path relative to the project root
    pub file: String,
    pub class: String,
    pub member: String,
    pub kind: MessageKind,
    pub line: usize,
}

fn relative_file(finding: &Finding, project_root: &Path) -> String {
    finding
        .file
        .strip_prefix(project_root)
        .unwrap_or(&finding.file)
        .to_string_lossy()
        .replace('\\', "/")
}

impl IssueFingerprint {
    pub fn from_finding(finding: &Finding, project_root: &Path) -> Self {
        Self {
            file: relative_file(finding, project_root),
            class: finding.diagnostic.class_name.clone(),
            member: finding.diagnostic.member_name.clone(),
            kind: finding.diagnostic.message_kind,
            line: finding.line,
        }
    }

    pub fn matches(&self, finding: &Finding, project_root: &Path) -> bool {
        self.file == relative_file(finding, project_root)
            && self.class == finding.diagnostic.class_name
            && self.member == finding.diagnostic.member_name
            && self.kind == finding.diagnostic.message_kind
            && self.line.abs_diff(finding.line) <= LINE_DRIFT
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Baseline {
    pub version: u32,
    /// Seconds since the Unix epoch
    pub created_at: u64,
    pub issues: Vec<IssueFingerprint>,
}

impl Baseline {
    pub fn from_findings<'a, I>(findings: I, project_root: &Path) -> Self
    where
        I: IntoIterator<Item = &'a Finding>,
    {
        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Self {
            version: BASELINE_VERSION,
            created_at,
            issues: findings
                .into_iter()
                .map(|finding| IssueFingerprint::from_finding(finding, project_root))
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, BaselineError> {
        let file = fs::File::open(path)?;
        let baseline: Self = serde_json::from_reader(BufReader::new(file))?;

        if baseline.version != BASELINE_VERSION {
            return Err(BaselineError::VersionMismatch {
                found: baseline.version,
                expected: BASELINE_VERSION,
            });
        }

        Ok(baseline)
    }

    pub fn save(&self, path: &Path) -> Result<(), BaselineError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn is_baselined(&self, finding: &Finding, project_root: &Path) -> bool {
        self.issues.iter().any(|fp| fp.matches(finding, project_root))
    }

    /// Keep only findings that are not in the baseline
    pub fn retain_new(&self, findings: &mut Vec<Finding>, project_root: &Path) -> BaselineStats {
        let before = findings.len();
        findings.retain(|finding| !self.is_baselined(finding, project_root));

        BaselineStats {
            total_in_baseline: self.issues.len(),
            baselined_found: before - findings.len(),
            new_issues: findings.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselineStats {
    pub total_in_baseline: usize,
    pub baselined_found: usize,
    pub new_issues: usize,
}

impl std::fmt::Display for BaselineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} new issues ({} baselined, {} in baseline file)",
            self.new_issues, self.baselined_found, self.total_in_baseline
        )
    }
}

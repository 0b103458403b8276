//! Override-resolution engine
//!
//! For every member the host visits, the pipeline is:
//! 1. **Classify** - skip overload signatures, constructors, static and private members
//! 2. **Resolve** - find the interface or base class the member overrides, if any
//! 3. **Detect** - read the `@override` tag and `override` keyword state
//! 4. **Decide** - compare required and actual state under the policy style
//! 5. **Fix** - attach formatting-preserving edits to each diagnostic

pub mod classifier;
pub mod detector;
mod policy;
mod resolver;
mod rule;

pub use classifier::{MemberCategory, SkipReason};
pub use detector::{DocBlock, DocLine, OVERRIDE_KEYWORD, OVERRIDE_TAG};
pub use policy::{decide, DeclarationForm, PolicyConfiguration, PolicyStyle};
pub use resolver::OverrideResolver;
pub use rule::OverrideRule;

use crate::fix::Fix;
use crate::hierarchy::TypeKind;
use crate::syntax::TextRange;
use serde::{Deserialize, Serialize};

/// What a member overrides or implements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverrideSource {
    pub kind: TypeKind,
    pub name: String,
}

impl OverrideSource {
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Interface,
            name: name.into(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Class,
            name: name.into(),
        }
    }

    fn relation(&self) -> String {
        match self.kind {
            TypeKind::Interface => format!("implements interface '{}'", self.name),
            TypeKind::Class => format!("overrides a member of class '{}'", self.name),
        }
    }
}

impl std::fmt::Display for OverrideSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// Which override declarations a member currently carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeclarationState {
    pub has_tag: bool,
    pub has_keyword: bool,
}

impl DeclarationState {
    pub fn new(has_tag: bool, has_keyword: bool) -> Self {
        Self {
            has_tag,
            has_keyword,
        }
    }

    pub fn has_any(&self) -> bool {
        self.has_tag || self.has_keyword
    }
}

/// Kinds of override-declaration issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    /// Required `@override` tag is absent
    MissingTag,

    /// Required `override` keyword is absent
    MissingKeyword,

    /// Both forms are required and both are absent
    MissingBoth,

    /// At least one form is required and neither is present
    MissingEither,

    /// Tag present but nothing is overridden, or the style forbids it
    UnnecessaryTag,

    /// Keyword present but nothing is overridden, or the style forbids it
    UnnecessaryKeyword,
}

impl MessageKind {
    pub const ALL: [MessageKind; 6] = [
        MessageKind::MissingTag,
        MessageKind::MissingKeyword,
        MessageKind::MissingBoth,
        MessageKind::MissingEither,
        MessageKind::UnnecessaryTag,
        MessageKind::UnnecessaryKeyword,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::MissingTag => "missing-tag",
            MessageKind::MissingKeyword => "missing-keyword",
            MessageKind::MissingBoth => "missing-both",
            MessageKind::MissingEither => "missing-either",
            MessageKind::UnnecessaryTag => "unnecessary-tag",
            MessageKind::UnnecessaryKeyword => "unnecessary-keyword",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            MessageKind::MissingTag => "OVR001",
            MessageKind::MissingKeyword => "OVR002",
            MessageKind::MissingBoth => "OVR003",
            MessageKind::MissingEither => "OVR004",
            MessageKind::UnnecessaryTag => "OVR005",
            MessageKind::UnnecessaryKeyword => "OVR006",
        }
    }

    pub fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// One-line description of the rule, independent of any member
    pub fn description(&self) -> &'static str {
        match self {
            MessageKind::MissingTag => "Overriding member is missing the @override tag",
            MessageKind::MissingKeyword => "Overriding member is missing the override keyword",
            MessageKind::MissingBoth => {
                "Overriding member is missing both the @override tag and the override keyword"
            }
            MessageKind::MissingEither => {
                "Overriding member has neither an @override tag nor the override keyword"
            }
            MessageKind::UnnecessaryTag => "@override tag is not needed here",
            MessageKind::UnnecessaryKeyword => "override keyword is not needed here",
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            MessageKind::MissingTag
                | MessageKind::MissingKeyword
                | MessageKind::MissingBoth
                | MessageKind::MissingEither
        )
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One override-declaration issue on one member
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message_kind: MessageKind,

    /// Display name of the member (`render`, `#secret`, `[Symbol.iterator]`)
    pub member_name: String,

    /// `method`, `getter`, `setter` or `abstract method`
    pub member_kind_label: &'static str,

    /// What the member overrides, if anything
    pub source: Option<OverrideSource>,

    /// Display name of the enclosing class
    pub class_name: String,

    /// Range of the member declaration
    pub range: TextRange,

    pub severity: Severity,

    /// Edits resolving the issue; absent when no safe position was found
    pub fix: Option<Fix>,
}

impl Diagnostic {
    pub fn new(
        message_kind: MessageKind,
        member_name: impl Into<String>,
        member_kind_label: &'static str,
        range: TextRange,
    ) -> Self {
        Self {
            message_kind,
            member_name: member_name.into(),
            member_kind_label,
            source: None,
            class_name: String::new(),
            range,
            severity: message_kind.default_severity(),
            fix: None,
        }
    }

    pub fn with_source(mut self, source: Option<OverrideSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_fix(mut self, fix: Option<Fix>) -> Self {
        self.fix = fix;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        let subject = format!("{} '{}'", capitalize(self.member_kind_label), self.member_name);
        let relation = self
            .source
            .as_ref()
            .map(OverrideSource::relation)
            .unwrap_or_default();

        match self.message_kind {
            MessageKind::MissingTag => {
                format!("{} {} but has no @override tag", subject, relation)
            }
            MessageKind::MissingKeyword => {
                format!("{} {} but is missing the override keyword", subject, relation)
            }
            MessageKind::MissingBoth => format!(
                "{} {} but is missing both the @override tag and the override keyword",
                subject, relation
            ),
            MessageKind::MissingEither => format!(
                "{} {} but has neither an @override tag nor the override keyword",
                subject, relation
            ),
            MessageKind::UnnecessaryTag => match &self.source {
                Some(_) => format!(
                    "{} {}; the configured style does not allow an @override tag",
                    subject, relation
                ),
                None => format!(
                    "{} has an @override tag but does not override anything",
                    subject
                ),
            },
            MessageKind::UnnecessaryKeyword => match &self.source {
                Some(_) => format!(
                    "{} {}; the configured style does not allow the override keyword",
                    subject, relation
                ),
                None => format!(
                    "{} has the override keyword but does not override anything",
                    subject
                ),
            },
        }
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

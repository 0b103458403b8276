//! Member Classifier
//!
//! Decides which members take part in override analysis at all, and how a
//! member is named and labelled in diagnostics.
//!
//! ## Skipped members
//!
//! - Overload signatures (declared without a body and not abstract)
//! - Constructors
//! - Static members; they cannot override instance members
//! - Private members, by `#name` syntax or the `private` modifier
//!
//! Missing information never causes a skip.

use crate::syntax::{Accessibility, MemberDeclaration, MemberKind, MemberName, SourceText};

/// Why a member is excluded from analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    OverloadSignature,
    Constructor,
    Static,
    Private,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::OverloadSignature => "overload signature",
            SkipReason::Constructor => "constructor",
            SkipReason::Static => "static member",
            SkipReason::Private => "private member",
        }
    }
}

/// Category of an analysed member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberCategory {
    Method,
    Getter,
    Setter,
    AbstractMethod,
}

impl MemberCategory {
    pub fn label(&self) -> &'static str {
        match self {
            MemberCategory::Method => "method",
            MemberCategory::Getter => "getter",
            MemberCategory::Setter => "setter",
            MemberCategory::AbstractMethod => "abstract method",
        }
    }
}

/// Reason to leave `member` out of the analysis, if any
pub fn skip_reason(member: &MemberDeclaration) -> Option<SkipReason> {
    if member.kind == MemberKind::Constructor {
        return Some(SkipReason::Constructor);
    }
    if !member.has_body && !member.modifiers.is_abstract {
        return Some(SkipReason::OverloadSignature);
    }
    if member.modifiers.is_static {
        return Some(SkipReason::Static);
    }
    if member.name.is_private() || member.modifiers.accessibility == Some(Accessibility::Private) {
        return Some(SkipReason::Private);
    }
    None
}

pub fn should_skip(member: &MemberDeclaration) -> bool {
    skip_reason(member).is_some()
}

pub fn category(member: &MemberDeclaration) -> MemberCategory {
    match member.kind {
        MemberKind::Getter => MemberCategory::Getter,
        MemberKind::Setter => MemberCategory::Setter,
        _ if member.modifiers.is_abstract => MemberCategory::AbstractMethod,
        _ => MemberCategory::Method,
    }
}

/// Name as it should appear in a diagnostic
pub fn display_name(member: &MemberDeclaration, source: &SourceText) -> String {
    match &member.name {
        MemberName::Identifier(name) | MemberName::Literal(name) => name.clone(),
        MemberName::Private(name) => format!("#{}", name),
        MemberName::Computed => source
            .slice(member.name_range)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| "[computed]".to_string()),
    }
}

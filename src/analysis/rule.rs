// Per-member control flow: classify, resolve, detect, decide, fix

use super::classifier::{category, display_name, skip_reason};
use super::detector::declaration_state;
use super::policy::{decide, DeclarationForm, PolicyConfiguration};
use super::resolver::OverrideResolver;
use super::{Diagnostic, MessageKind};
use crate::fix::positions::{keyword_insert_edit, keyword_removal, tag_insert_position, tag_removal};
use crate::fix::{build_fix, Edit, Fix};
use crate::hierarchy::TypeHierarchy;
use crate::syntax::{ClassLikeDeclaration, MemberDeclaration, SourceText};
use tracing::trace;

/// The override-declaration rule for one analysis run
#[derive(Debug, Clone, Copy)]
pub struct OverrideRule<'h> {
    policy: PolicyConfiguration,
    resolver: OverrideResolver<'h>,
}

impl<'h> OverrideRule<'h> {
    pub fn new(policy: PolicyConfiguration, hierarchy: Option<&'h dyn TypeHierarchy>) -> Self {
        Self {
            policy,
            resolver: OverrideResolver::new(hierarchy),
        }
    }

    /// Diagnostics for every member of `class`, in member order
    pub fn check_class(&self, class: &ClassLikeDeclaration, source: SourceText) -> Vec<Diagnostic> {
        class
            .members
            .iter()
            .flat_map(|member| self.check_member(member, class, source))
            .collect()
    }

    pub fn check_member(
        &self,
        member: &MemberDeclaration,
        class: &ClassLikeDeclaration,
        source: SourceText,
    ) -> Vec<Diagnostic> {
        if let Some(reason) = skip_reason(member) {
            trace!(
                "Skipping {} in '{}': {}",
                display_name(member, &source),
                class.display_name(),
                reason.as_str()
            );
            return Vec::new();
        }

        let override_source = self.resolver.resolve(member, class);
        let state = declaration_state(member, source);
        let kinds = decide(override_source.as_ref(), state, &self.policy);
        if kinds.is_empty() {
            return Vec::new();
        }

        let name = display_name(member, &source);
        let label = category(member).label();

        kinds
            .into_iter()
            .map(|kind| {
                Diagnostic::new(kind, name.clone(), label, member.range)
                    .with_source(override_source.clone())
                    .with_class(class.display_name())
                    .with_fix(self.fix_for(kind, member, source))
            })
            .collect()
    }

    fn fix_for(&self, kind: MessageKind, member: &MemberDeclaration, source: SourceText) -> Option<Fix> {
        let edits: Vec<Edit> = match kind {
            MessageKind::MissingTag => vec![tag_insert_position(member, source)?],
            MessageKind::MissingKeyword => vec![keyword_insert_edit(member, source)?],
            MessageKind::MissingBoth => vec![
                tag_insert_position(member, source)?,
                keyword_insert_edit(member, source)?,
            ],
            MessageKind::MissingEither => match self.policy.prefer {
                DeclarationForm::Tag => vec![tag_insert_position(member, source)?],
                DeclarationForm::Keyword => vec![keyword_insert_edit(member, source)?],
            },
            MessageKind::UnnecessaryTag => tag_removal(member, source),
            MessageKind::UnnecessaryKeyword => keyword_removal(member, source),
        };
        build_fix(edits)
    }
}

//! Override Source Resolver
//!
//! Finds the interface or base class a member overrides. Lookups go, first
//! match wins:
//!
//! 1. computed names resolve to nothing
//! 2. each declared interface's member table
//! 3. the declared superclass's member table
//! 4. every base type reachable from the class, nearest first
//!
//! Without type information at all, a coarse heuristic applies: members of a
//! class implementing an interface are attributed to its first interface,
//! otherwise to its superclass if it has one.

use super::OverrideSource;
use crate::hierarchy::{HierarchyError, MemberTable, TypeHierarchy};
use crate::syntax::{ClassLikeDeclaration, MemberDeclaration, TypeRef};
use tracing::{debug, trace};

/// Resolves override sources against an optional type hierarchy
#[derive(Clone, Copy)]
pub struct OverrideResolver<'h> {
    hierarchy: Option<&'h dyn TypeHierarchy>,
}

impl<'h> OverrideResolver<'h> {
    pub fn new(hierarchy: Option<&'h dyn TypeHierarchy>) -> Self {
        Self { hierarchy }
    }

    /// Resolver that only has the heritage heuristic to go on
    pub fn heuristic() -> Self {
        Self { hierarchy: None }
    }

    pub fn has_type_information(&self) -> bool {
        self.hierarchy.is_some()
    }

    /// What `member` overrides in `class`, or `None` if it is the class's own
    pub fn resolve(
        &self,
        member: &MemberDeclaration,
        class: &ClassLikeDeclaration,
    ) -> Option<OverrideSource> {
        let name = member.name.lookup_key()?;

        let Some(hierarchy) = self.hierarchy else {
            return heuristic_source(class);
        };

        for interface in &class.implements {
            if declares(hierarchy, interface, &name) {
                return Some(OverrideSource::interface(&interface.name));
            }
        }

        if let Some(superclass) = &class.superclass {
            if declares(hierarchy, superclass, &name) {
                return Some(OverrideSource::class(&superclass.name));
            }
        }

        match hierarchy.base_types(class) {
            Ok(bases) => bases
                .into_iter()
                .find(|base| base.members.contains(&name))
                .map(|base| OverrideSource {
                    kind: base.kind,
                    name: base.name,
                }),
            Err(err) => {
                debug!(
                    "Base-type walk for '{}' failed, treating '{}' as own member: {}",
                    class.display_name(),
                    name,
                    err
                );
                None
            }
        }
    }
}

impl std::fmt::Debug for OverrideResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideResolver")
            .field("has_type_information", &self.has_type_information())
            .finish()
    }
}

/// Whether the referenced type declares `name`; query errors count as "no"
fn declares(hierarchy: &dyn TypeHierarchy, type_ref: &TypeRef, name: &str) -> bool {
    let table: Result<Option<MemberTable>, HierarchyError> = hierarchy.member_table(type_ref);
    match table {
        Ok(Some(table)) => {
            let found = table.contains(name);
            trace!("Lookup '{}' in '{}': {}", name, type_ref, found);
            found
        }
        Ok(None) => false,
        Err(err) => {
            debug!("Skipping candidate '{}': {}", type_ref, err);
            false
        }
    }
}

fn heuristic_source(class: &ClassLikeDeclaration) -> Option<OverrideSource> {
    if let Some(interface) = class.implements.first() {
        return Some(OverrideSource::interface(&interface.name));
    }
    class
        .superclass
        .as_ref()
        .map(|superclass| OverrideSource::class(&superclass.name))
}

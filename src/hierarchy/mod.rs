//! Type-hierarchy query capability
//!
//! The resolver only ever asks two questions of the host's type system:
//! which members a referenced type declares, and which base types are
//! reachable from a class. [`TypeHierarchy`] is that capability;
//! [`TypeGraph`] is the in-memory implementation built from snapshots.

mod graph;

pub use graph::{TypeDeclaration, TypeGraph};

use crate::syntax::{ClassLikeDeclaration, TypeRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors raised while querying type information
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("Unknown type '{0}'")]
    UnknownType(String),
    #[error("Malformed type entry '{name}': {reason}")]
    Malformed { name: String, reason: String },
}

/// Nature of a base type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    Class,
    Interface,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the members declared directly on a type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberTable {
    names: BTreeSet<String>,
}

impl MemberTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for MemberTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A base type reachable from a class, with its own member table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseType {
    pub name: String,
    pub kind: TypeKind,
    pub members: MemberTable,
}

/// Query capability over the host's static type information
///
/// Implementations must be pure: answering the same query twice yields the
/// same result and has no side effects.
pub trait TypeHierarchy: Send + Sync {
    /// Members declared directly on the referenced type, or `None` if the
    /// type is known but exposes no member information
    fn member_table(&self, type_ref: &TypeRef) -> Result<Option<MemberTable>, HierarchyError>;

    /// Every base type reachable from the class, nearest first
    fn base_types(&self, class: &ClassLikeDeclaration) -> Result<Vec<BaseType>, HierarchyError>;
}

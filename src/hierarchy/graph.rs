// Type graph built from host snapshots

use super::{BaseType, HierarchyError, MemberTable, TypeHierarchy, TypeKind};
use crate::syntax::{ClassLikeDeclaration, TypeRef};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace};

/// A class or interface as the host's type checker sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,

    pub kind: TypeKind,

    /// Superclass for classes, extended interfaces for interfaces
    #[serde(default)]
    pub extends: Vec<String>,

    /// Implemented interfaces (classes only)
    #[serde(default)]
    pub implements: Vec<String>,

    /// Members declared directly on this type
    #[serde(default)]
    pub members: Vec<String>,
}

impl TypeDeclaration {
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            extends: Vec::new(),
            implements: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn extending(mut self, base: impl Into<String>) -> Self {
        self.extends.push(base.into());
        self
    }

    pub fn implementing(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members.extend(members.into_iter().map(Into::into));
        self
    }
}

/// Heritage edge kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heritage {
    Extends,
    Implements,
}

#[derive(Debug)]
struct TypeNode {
    name: String,
    kind: TypeKind,
    members: MemberTable,
}

/// Heritage graph over every type declared in an analysis unit
#[derive(Debug)]
pub struct TypeGraph {
    /// Nodes are types, edges point from a type to its bases
    inner: DiGraph<TypeNode, Heritage>,

    /// Map from type name to node index
    node_map: HashMap<String, NodeIndex>,

    /// Heritage names that did not resolve to any declared type
    dangling: HashMap<NodeIndex, Vec<String>>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self {
            inner: DiGraph::new(),
            node_map: HashMap::new(),
            dangling: HashMap::new(),
        }
    }

    /// Build the graph; repeated names merge the way interface declarations do
    pub fn from_declarations<I>(declarations: I) -> Self
    where
        I: IntoIterator<Item = TypeDeclaration>,
    {
        let declarations: Vec<TypeDeclaration> = declarations.into_iter().collect();
        let mut graph = Self::new();

        for decl in &declarations {
            graph.add_type(decl);
        }
        for decl in &declarations {
            graph.link(decl);
        }

        debug!(
            "Type graph: {} types, {} heritage edges",
            graph.inner.node_count(),
            graph.inner.edge_count()
        );
        graph
    }

    fn add_type(&mut self, decl: &TypeDeclaration) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&decl.name) {
            let node = &mut self.inner[idx];
            if node.kind != decl.kind {
                debug!(
                    "Type '{}' declared as both {} and {}, keeping {}",
                    decl.name, node.kind, decl.kind, node.kind
                );
            }
            node.members.extend(decl.members.iter().cloned());
            return idx;
        }

        let idx = self.inner.add_node(TypeNode {
            name: decl.name.clone(),
            kind: decl.kind,
            members: decl.members.iter().cloned().collect(),
        });
        self.node_map.insert(decl.name.clone(), idx);
        idx
    }

    fn link(&mut self, decl: &TypeDeclaration) {
        let Some(&from) = self.node_map.get(&decl.name) else {
            return;
        };

        let heritage = decl
            .extends
            .iter()
            .map(|name| (Heritage::Extends, name))
            .chain(decl.implements.iter().map(|name| (Heritage::Implements, name)));

        for (kind, target) in heritage {
            match self.node_map.get(target) {
                Some(&to) => {
                    if self.inner.find_edge(from, to).is_none() {
                        self.inner.add_edge(from, to, kind);
                    }
                }
                None => {
                    trace!("Unresolved heritage '{}' on '{}'", target, decl.name);
                    self.dangling.entry(from).or_default().push(target.clone());
                }
            }
        }
    }

    /// Number of distinct types
    pub fn type_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Heritage names of `name` that point at undeclared types
    pub fn unresolved_heritage(&self, name: &str) -> &[String] {
        self.node_map
            .get(name)
            .and_then(|idx| self.dangling.get(idx))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Heritage of `class` with no type information, written names first
    pub fn missing_heritage(&self, class: &ClassLikeDeclaration) -> Vec<String> {
        let mut missing: Vec<String> = class
            .superclass
            .iter()
            .chain(class.implements.iter())
            .filter(|type_ref| !self.contains(&type_ref.name))
            .map(|type_ref| type_ref.name.clone())
            .collect();
        if let Some(name) = &class.name {
            for dangling in self.unresolved_heritage(name) {
                if !missing.contains(dangling) {
                    missing.push(dangling.clone());
                }
            }
        }
        missing
    }

    /// Direct bases of a node, in declaration order
    fn bases_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .inner
            .edges(idx)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, target)| target).collect()
    }

    fn seeds(&self, class: &ClassLikeDeclaration) -> Vec<NodeIndex> {
        let mut seeds = Vec::new();
        let written = class.superclass.iter().chain(class.implements.iter());
        for type_ref in written {
            match self.node_map.get(&type_ref.name) {
                Some(&idx) => seeds.push(idx),
                None => trace!("Heritage '{}' has no type information", type_ref.name),
            }
        }

        if let Some(&own) = class.name.as_ref().and_then(|name| self.node_map.get(name)) {
            seeds.extend(self.bases_of(own));
        }
        seeds
    }
}

impl Default for TypeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeHierarchy for TypeGraph {
    fn member_table(&self, type_ref: &TypeRef) -> Result<Option<MemberTable>, HierarchyError> {
        let idx = self
            .node_map
            .get(&type_ref.name)
            .ok_or_else(|| HierarchyError::UnknownType(type_ref.name.clone()))?;
        Ok(Some(self.inner[*idx].members.clone()))
    }

    fn base_types(&self, class: &ClassLikeDeclaration) -> Result<Vec<BaseType>, HierarchyError> {
        let own = class.name.as_ref().and_then(|name| self.node_map.get(name)).copied();
        let seeds = self.seeds(class);

        if seeds.is_empty() && class.has_heritage() {
            let first = class
                .superclass
                .iter()
                .chain(class.implements.iter())
                .next()
                .map(|t| t.name.clone())
                .unwrap_or_default();
            return Err(HierarchyError::UnknownType(first));
        }

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        for seed in seeds {
            if visited.insert(seed) {
                queue.push_back(seed);
            }
        }

        let mut bases = Vec::new();
        while let Some(idx) = queue.pop_front() {
            if Some(idx) == own {
                debug!("Heritage of '{}' loops back to itself", class.display_name());
                continue;
            }

            let node = &self.inner[idx];
            bases.push(BaseType {
                name: node.name.clone(),
                kind: node.kind,
                members: node.members.clone(),
            });

            for base in self.bases_of(idx) {
                if visited.insert(base) {
                    queue.push_back(base);
                }
            }
        }

        Ok(bases)
    }
}

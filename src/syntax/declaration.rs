use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Half-open byte range into a file's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextRange {
    /// Starting byte offset
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width range at `offset`
    pub fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Whether edits at the two ranges would collide: they share a byte, an
    /// insertion point falls strictly inside the other range, or both are
    /// insertions at the same offset
    pub fn overlaps(&self, other: &TextRange) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => self.start == other.start,
            (true, false) => other.start < self.start && self.start < other.end,
            (false, true) => self.start < other.start && other.start < self.end,
            (false, false) => self.start < other.end && other.start < self.end,
        }
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Syntactic shape of a class member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberKind {
    Method,
    Getter,
    Setter,
    Constructor,
}

impl MemberKind {
    /// Header keyword that introduces an accessor
    pub fn accessor_keyword(&self) -> Option<&'static str> {
        match self {
            MemberKind::Getter => Some("get"),
            MemberKind::Setter => Some("set"),
            _ => None,
        }
    }
}

/// Name of a member as the host resolved it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberName {
    /// Plain identifier (`foo`)
    Identifier(String),
    /// Private identifier (`#foo`), stored without the `#`
    Private(String),
    /// String or numeric literal key (`'foo'`, `42`)
    Literal(String),
    /// Runtime expression (`[Symbol.iterator]`)
    Computed,
}

impl MemberName {
    /// Key used for member-table lookups; `None` when the name is only known at runtime
    pub fn lookup_key(&self) -> Option<Cow<'_, str>> {
        match self {
            MemberName::Identifier(name) | MemberName::Literal(name) => Some(Cow::Borrowed(name)),
            MemberName::Private(name) => Some(Cow::Owned(format!("#{}", name))),
            MemberName::Computed => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, MemberName::Computed)
    }

    pub fn is_private(&self) -> bool {
        matches!(self, MemberName::Private(_))
    }
}

/// Explicit accessibility modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accessibility {
    Public,
    Protected,
    Private,
}

/// Modifier flags on a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    #[serde(rename = "static")]
    pub is_static: bool,

    #[serde(rename = "abstract")]
    pub is_abstract: bool,

    #[serde(rename = "async")]
    pub is_async: bool,

    /// Carries the `override` keyword
    #[serde(rename = "override")]
    pub has_override: bool,

    /// `None` means implicitly public
    pub accessibility: Option<Accessibility>,
}

fn default_has_body() -> bool {
    true
}

/// One method, accessor, or abstract-method slot of a class-like declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDeclaration {
    pub kind: MemberKind,

    pub name: MemberName,

    /// Source range of the name; for computed names this includes the brackets
    pub name_range: TextRange,

    /// Whole declaration, starting at its first decorator or modifier
    pub range: TextRange,

    #[serde(default)]
    pub modifiers: Modifiers,

    /// False for overload signatures and abstract members
    #[serde(default = "default_has_body")]
    pub has_body: bool,

    /// Comments between the previous token and the member, in source order
    #[serde(default)]
    pub leading_comments: Vec<TextRange>,
}

impl MemberDeclaration {
    pub fn new(kind: MemberKind, name: MemberName, range: TextRange, name_range: TextRange) -> Self {
        Self {
            kind,
            name,
            name_range,
            range,
            modifiers: Modifiers::default(),
            has_body: true,
            leading_comments: Vec::new(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_body(mut self, has_body: bool) -> Self {
        self.has_body = has_body;
        self
    }

    pub fn with_leading_comment(mut self, comment: TextRange) -> Self {
        self.leading_comments.push(comment);
        self
    }

    /// Range of the modifier header: from the member start up to its name
    pub fn header_range(&self) -> Option<TextRange> {
        if self.name_range.start < self.range.start || self.name_range.start > self.range.end {
            return None;
        }
        Some(TextRange::new(self.range.start, self.name_range.start))
    }
}

/// Reference to a type as written in a heritage clause
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef {
    pub name: String,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// A class declaration or class expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLikeDeclaration {
    /// `None` for anonymous class expressions
    #[serde(default)]
    pub name: Option<String>,

    pub range: TextRange,

    #[serde(default)]
    pub superclass: Option<TypeRef>,

    #[serde(default)]
    pub implements: Vec<TypeRef>,

    #[serde(default)]
    pub members: Vec<MemberDeclaration>,
}

impl ClassLikeDeclaration {
    pub fn new(name: Option<String>, range: TextRange) -> Self {
        Self {
            name,
            range,
            superclass: None,
            implements: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(TypeRef::new(superclass));
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(TypeRef::new(interface));
        self
    }

    pub fn with_member(mut self, member: MemberDeclaration) -> Self {
        self.members.push(member);
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }

    /// Whether the class has any heritage clause at all
    pub fn has_heritage(&self) -> bool {
        self.superclass.is_some() || !self.implements.is_empty()
    }
}

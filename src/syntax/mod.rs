//! Host syntax model
//!
//! The engine never parses source text. A host toolchain hands over class
//! declarations, their members, and the file text; these types describe
//! that hand-over and give read-only access to the text.

mod declaration;
mod text;

pub use declaration::{
    Accessibility, ClassLikeDeclaration, MemberDeclaration, MemberKind, MemberName, Modifiers,
    TextRange, TypeRef,
};
pub use text::{HeaderTokens, SourceText, Token};

pub(crate) use text::is_identifier_byte;

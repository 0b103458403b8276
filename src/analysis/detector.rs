//! Comment/Keyword Detector
//!
//! Reports whether a member carries an `@override` documentation tag and
//! whether it carries the `override` keyword.
//!
//! ## Tag lines
//!
//! A line of a `/** ... */` block declares the tag only when, after the
//! leading `*` decoration and whitespace are stripped, it starts with
//! `@override`, and the tag is neither inside an inline code span nor inside
//! a fenced code block. Prose that merely mentions the tag does not count:
//!
//! ```text
//! /**
//!  * Do not add `@override` here.      <- not a declaration
//!  * @override                         <- declaration
//!  */
//! ```

use super::DeclarationState;
use crate::syntax::{is_identifier_byte, MemberDeclaration, SourceText, TextRange};
use regex::Regex;
use std::sync::OnceLock;

/// Documentation tag token
pub const OVERRIDE_TAG: &str = "@override";

/// Keyword modifier token
pub const OVERRIDE_KEYWORD: &str = "override";

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"^(```|~~~)").expect("fence pattern is valid"))
}

/// One line of a documentation block, as absolute file offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocLine {
    /// Start of the file line this block line sits on
    pub line_start: usize,

    /// Start of the line inside the block (the block start for the first line)
    pub start: usize,

    /// End of the line, before its terminator or the closing `*/`
    pub end: usize,

    /// First byte after the `*` decoration and whitespace
    pub content_start: usize,

    /// End of the content with trailing whitespace trimmed
    pub content_end: usize,

    /// Opens or closes a fenced code block
    pub is_fence: bool,

    /// Lies between fence lines
    pub in_fence: bool,
}

impl DocLine {
    pub fn is_blank(&self) -> bool {
        self.content_start >= self.content_end
    }

    /// Decoration preceding the content, from the start of the file line
    pub fn prefix_range(&self) -> TextRange {
        TextRange::new(self.line_start, self.content_start)
    }
}

/// A parsed `/** ... */` block
#[derive(Debug, Clone)]
pub struct DocBlock<'a> {
    source: SourceText<'a>,
    range: TextRange,
    lines: Vec<DocLine>,
}

impl<'a> DocBlock<'a> {
    /// Parse the comment at `range`; `None` unless it is a `/** */` block
    pub fn parse(source: SourceText<'a>, range: TextRange) -> Option<Self> {
        let text = source.slice(range)?;
        if text.len() < 5 || !text.starts_with("/**") || text.starts_with("/**/") || !text.ends_with("*/") {
            return None;
        }

        let close = range.end - 2;
        let bytes = source.as_str().as_bytes();
        let mut lines = Vec::new();
        let mut begin = range.start;
        let mut in_fence = false;

        loop {
            let newline = bytes[begin..close].iter().position(|&b| b == b'\n').map(|p| begin + p);
            let mut end = newline.unwrap_or(close);
            if newline.is_some() && end > begin && bytes[end - 1] == b'\r' {
                end -= 1;
            }

            let mut pos = begin;
            if begin == range.start {
                pos += 3;
                while pos < end && bytes[pos] == b'*' {
                    pos += 1;
                }
            } else {
                pos = skip_blank(bytes, pos, end);
                while pos < end && bytes[pos] == b'*' {
                    pos += 1;
                }
            }
            let content_start = skip_blank(bytes, pos, end);
            let mut content_end = end;
            while content_end > content_start && matches!(bytes[content_end - 1], b' ' | b'\t') {
                content_end -= 1;
            }
            if newline.is_none() {
                // `**/` closers
                while content_end > content_start && bytes[content_end - 1] == b'*' {
                    content_end -= 1;
                }
                while content_end > content_start && matches!(bytes[content_end - 1], b' ' | b'\t') {
                    content_end -= 1;
                }
            }

            let content = source.slice(TextRange::new(content_start, content_end)).unwrap_or("");
            let is_fence = fence_pattern().is_match(content);
            lines.push(DocLine {
                line_start: source.line_start(begin),
                start: begin,
                end,
                content_start,
                content_end,
                is_fence,
                in_fence: in_fence && !is_fence,
            });
            if is_fence {
                in_fence = !in_fence;
            }

            match newline {
                Some(nl) => begin = nl + 1,
                None => break,
            }
        }

        Some(Self {
            source,
            range,
            lines,
        })
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn lines(&self) -> &[DocLine] {
        &self.lines
    }

    /// Offset of the closing `*/`
    pub fn close_offset(&self) -> usize {
        self.range.end - 2
    }

    pub fn is_single_line(&self) -> bool {
        self.lines.len() == 1
    }

    pub fn content(&self, line: &DocLine) -> &'a str {
        self.source
            .slice(TextRange::new(line.content_start, line.content_end))
            .unwrap_or("")
    }

    /// Raw text of the line inside the block
    pub fn line_text(&self, line: &DocLine) -> &'a str {
        self.source
            .slice(TextRange::new(line.start, line.end))
            .unwrap_or("")
    }

    /// Line starts with some block tag (`@param`, `@returns`, ...)
    pub fn is_block_tag(&self, line: &DocLine) -> bool {
        !line.is_fence && !line.in_fence && self.content(line).starts_with('@')
    }

    /// Line declares the override tag
    pub fn is_override_tag(&self, line: &DocLine) -> bool {
        if line.is_fence || line.in_fence {
            return false;
        }
        let content = self.content(line);
        if !content.starts_with(OVERRIDE_TAG) {
            return false;
        }
        if content
            .as_bytes()
            .get(OVERRIDE_TAG.len())
            .is_some_and(|&b| is_identifier_byte(b) || b == b'-')
        {
            return false;
        }
        let before = self
            .source
            .slice(TextRange::new(line.start, line.content_start))
            .unwrap_or("");
        !inside_code_span(before)
    }

    pub fn override_tag_lines(&self) -> impl Iterator<Item = &DocLine> {
        self.lines.iter().filter(move |line| self.is_override_tag(line))
    }

    pub fn has_override_tag(&self) -> bool {
        self.override_tag_lines().next().is_some()
    }

    /// First block-tag line, the slot a new tag is inserted before
    pub fn first_block_tag(&self) -> Option<&DocLine> {
        self.lines.iter().find(|line| self.is_block_tag(line))
    }

    /// Every non-blank line is exactly the override tag
    pub fn is_declaration_only(&self) -> bool {
        let mut saw_tag = false;
        for line in &self.lines {
            if line.is_blank() {
                continue;
            }
            if self.is_override_tag(line) && self.content(line) == OVERRIDE_TAG {
                saw_tag = true;
            } else {
                return false;
            }
        }
        saw_tag
    }
}

fn skip_blank(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && matches!(bytes[pos], b' ' | b'\t') {
        pos += 1;
    }
    pos
}

/// An odd number of backticks before a position opens an inline code span
fn inside_code_span(before: &str) -> bool {
    before.matches('`').count() % 2 == 1
}

/// Every documentation block among the member's leading comments, in order
pub fn doc_blocks<'a>(member: &MemberDeclaration, source: SourceText<'a>) -> Vec<DocBlock<'a>> {
    member
        .leading_comments
        .iter()
        .filter_map(|&range| DocBlock::parse(source, range))
        .collect()
}

/// The documentation block closest to the member
pub fn nearest_doc_block<'a>(member: &MemberDeclaration, source: SourceText<'a>) -> Option<DocBlock<'a>> {
    member
        .leading_comments
        .iter()
        .rev()
        .find_map(|&range| DocBlock::parse(source, range))
}

pub fn has_tag_declaration(member: &MemberDeclaration, source: SourceText) -> bool {
    doc_blocks(member, source)
        .iter()
        .any(DocBlock::has_override_tag)
}

pub fn has_keyword_declaration(member: &MemberDeclaration) -> bool {
    member.modifiers.has_override
}

pub fn is_declaration_only_comment(block: &DocBlock) -> bool {
    block.is_declaration_only()
}

pub fn declaration_state(member: &MemberDeclaration, source: SourceText) -> DeclarationState {
    DeclarationState::new(
        has_tag_declaration(member, source),
        has_keyword_declaration(member),
    )
}

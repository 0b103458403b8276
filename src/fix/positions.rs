//! Fix Position Calculator
//!
//! Computes where an override declaration goes, or what to delete to take
//! one away, without disturbing the surrounding formatting.
//!
//! ## Tag insertion
//!
//! - Block with other tags: a new tag line before the first of them, with
//!   the same decoration
//! - Block with description only: a new tag line before the closing `*/`
//! - Single-line block: rewritten as a multi-line block
//! - No block: `/** @override */` on its own line above the member
//!
//! ## Keyword insertion
//!
//! Before `abstract`, else `async`, else `*`, else `get`/`set`, else the
//! `[` of a computed name, else the name itself.

use super::Edit;
use crate::analysis::detector::{
    doc_blocks, is_declaration_only_comment, nearest_doc_block, DocBlock, DocLine,
};
use crate::analysis::{OVERRIDE_KEYWORD, OVERRIDE_TAG};
use crate::syntax::{MemberDeclaration, SourceText, TextRange, Token};
use tracing::trace;

/// Edit adding the `@override` tag to the member's documentation
pub fn tag_insert_position(member: &MemberDeclaration, source: SourceText) -> Option<Edit> {
    match nearest_doc_block(member, source) {
        None => Some(synthesize_block(member, source)),
        Some(block) if block.is_single_line() => expand_single_line(&block, source),
        Some(block) => match block.first_block_tag() {
            Some(line) => Some(insert_before_tag_line(&block, line, source)),
            None => insert_before_close(&block, source),
        },
    }
}

/// Offset the `override` keyword is inserted at
pub fn keyword_insert_position(member: &MemberDeclaration, source: SourceText) -> Option<usize> {
    let header = member.header_range()?;
    let tokens: Vec<Token> = source.header_tokens(header).collect();
    let find = |word: &str| tokens.iter().find(|t| t.text == word).map(|t| t.range.start);

    if member.modifiers.is_abstract {
        return find("abstract");
    }
    if member.modifiers.is_async {
        return find("async");
    }
    if let Some(star) = find("*") {
        return Some(star);
    }
    if let Some(keyword) = member.kind.accessor_keyword() {
        return find(keyword);
    }
    Some(member.name_range.start)
}

/// Edit inserting `override ` at its conventional slot
pub fn keyword_insert_edit(member: &MemberDeclaration, source: SourceText) -> Option<Edit> {
    let offset = keyword_insert_position(member, source)?;
    if offset > source.len() {
        return None;
    }
    Some(Edit::insert(offset, format!("{} ", OVERRIDE_KEYWORD)))
}

/// Edits deleting every `@override` tag in the member's documentation
pub fn tag_removal(member: &MemberDeclaration, source: SourceText) -> Vec<Edit> {
    let mut edits = Vec::new();
    for block in doc_blocks(member, source) {
        if !block.has_override_tag() {
            continue;
        }
        if is_declaration_only_comment(&block) {
            edits.push(remove_block(&block, source));
        } else {
            edits.extend(
                block
                    .override_tag_lines()
                    .map(|line| remove_tag_line(&block, line, source)),
            );
        }
    }
    edits
}

/// Edit deleting the `override` keyword and the whitespace after it
pub fn keyword_removal(member: &MemberDeclaration, source: SourceText) -> Vec<Edit> {
    let Some(header) = member.header_range() else {
        return Vec::new();
    };
    let Some(token) = source
        .header_tokens(header)
        .find(|t| t.text == OVERRIDE_KEYWORD)
    else {
        trace!("No override keyword in header {}", header);
        return Vec::new();
    };

    let end = source.skip_whitespace(token.range.end);
    vec![Edit::delete(TextRange::new(token.range.start, end))]
}

fn line_break(source: SourceText, offset: usize) -> &'static str {
    let end = source.line_end(offset);
    if source.byte_at(end) == Some(b'\r') {
        "\r\n"
    } else {
        "\n"
    }
}

fn synthesize_block(member: &MemberDeclaration, source: SourceText) -> Edit {
    let start = member.range.start;
    if source.is_first_on_line(start) {
        let indent = source.indentation(start);
        let nl = line_break(source, start);
        Edit::insert(start, format!("/** {} */{}{}", OVERRIDE_TAG, nl, indent))
    } else {
        Edit::insert(start, format!("/** {} */ ", OVERRIDE_TAG))
    }
}

fn expand_single_line(block: &DocBlock, source: SourceText) -> Option<Edit> {
    let line = block.lines().first()?;
    let content = block.content(line);
    let indent = source.indentation(block.range().start);
    let nl = line_break(source, block.range().start);
    let star = format!("{}{} * ", nl, indent);

    let body = if content.is_empty() {
        format!("{}{}", star, OVERRIDE_TAG)
    } else if content.starts_with('@') {
        format!("{}{}{}{}", star, OVERRIDE_TAG, star, content)
    } else {
        format!("{}{}{}{}", star, content, star, OVERRIDE_TAG)
    };

    Some(Edit::replace(
        block.range(),
        format!("/**{}{}{} */", body, nl, indent),
    ))
}

fn insert_before_tag_line(block: &DocBlock, line: &DocLine, source: SourceText) -> Edit {
    let nl = line_break(source, line.start);
    if line.start == block.range().start {
        // Tag sits right after `/**`; keep it there and push the old tag down
        let decoration = decoration(block, source);
        return Edit::insert(
            line.content_start,
            format!("{}{}{}", OVERRIDE_TAG, nl, decoration),
        );
    }
    let prefix = source.slice(line.prefix_range()).unwrap_or("");
    Edit::insert(line.line_start, format!("{}{}{}", prefix, OVERRIDE_TAG, nl))
}

fn insert_before_close(block: &DocBlock, source: SourceText) -> Option<Edit> {
    let last = block.lines().last()?;
    let decoration = decoration(block, source);
    let nl = line_break(source, block.range().start);

    if last.is_blank() && last.start != block.range().start {
        return Some(Edit::insert(
            last.line_start,
            format!("{}{}{}", decoration, OVERRIDE_TAG, nl),
        ));
    }

    // Description shares its line with `*/`
    let indent = source.indentation(block.range().start);
    Some(Edit::replace(
        TextRange::new(last.content_end, block.close_offset()),
        format!("{}{}{}{}{} ", nl, decoration, OVERRIDE_TAG, nl, indent),
    ))
}

/// Star decoration used by the block's own content lines
fn decoration(block: &DocBlock, source: SourceText) -> String {
    let lines = block.lines();
    let closing = lines.len().saturating_sub(1);
    let candidates: Vec<&DocLine> = lines
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(i, line)| !(*i == closing && line.is_blank()))
        .map(|(_, line)| line)
        .collect();

    let chosen = candidates
        .iter()
        .find(|line| !line.is_blank())
        .or_else(|| candidates.first());

    match chosen.and_then(|line| source.slice(line.prefix_range())) {
        Some(prefix) if prefix.ends_with(' ') || prefix.ends_with('\t') => prefix.to_string(),
        Some(prefix) if prefix.ends_with('*') => format!("{} ", prefix),
        _ => format!("{} * ", source.indentation(block.range().start)),
    }
}

fn remove_block(block: &DocBlock, source: SourceText) -> Edit {
    let range = block.range();
    let after = source.skip_horizontal_whitespace(range.end);
    let ends_line = matches!(source.byte_at(after), None | Some(b'\n') | Some(b'\r'));

    if ends_line && source.is_first_on_line(range.start) {
        Edit::delete(TextRange::new(
            source.line_start(range.start),
            source.next_line_start(range.end),
        ))
    } else if ends_line {
        Edit::delete(TextRange::new(
            source.trim_horizontal_whitespace_back(range.start),
            after,
        ))
    } else {
        Edit::delete(TextRange::new(range.start, after))
    }
}

fn remove_tag_line(block: &DocBlock, line: &DocLine, source: SourceText) -> Edit {
    let lines = block.lines();
    let is_first = line.start == block.range().start;
    let is_last = lines.last().map(|l| l.start) == Some(line.start);
    let tag_only = block.content(line) == OVERRIDE_TAG;

    match (is_first, is_last) {
        (false, false) if tag_only => Edit::delete(TextRange::new(
            line.line_start,
            source.next_line_start(line.line_start),
        )),
        (true, false) if tag_only => {
            Edit::delete(TextRange::new(block.range().start + 3, line.end))
        }
        (false, true) if tag_only => Edit::replace(
            TextRange::new(line.line_start, block.close_offset()),
            source.indentation(line.line_start),
        ),
        _ => {
            let tag_end = line.content_start + OVERRIDE_TAG.len();
            let end = source.skip_horizontal_whitespace(tag_end).min(line.end);
            Edit::delete(TextRange::new(line.content_start, end.max(tag_end)))
        }
    }
}

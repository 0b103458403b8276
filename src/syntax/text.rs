// Read-only accessors over a file's text

use super::TextRange;

/// A word-like token inside a member header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub range: TextRange,
}

/// Source text of one file, as the host read it
#[derive(Debug, Clone, Copy)]
pub struct SourceText<'a> {
    text: &'a str,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text covered by `range`, or `None` if the range does not fit
    pub fn slice(&self, range: TextRange) -> Option<&'a str> {
        if range.start > range.end {
            return None;
        }
        self.text.get(range.start..range.end)
    }

    /// Byte at `offset`, if any
    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(offset).copied()
    }

    /// Offset of the first byte of the line containing `offset`
    pub fn line_start(&self, offset: usize) -> usize {
        let offset = offset.min(self.text.len());
        self.text.as_bytes()[..offset]
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|pos| pos + 1)
            .unwrap_or(0)
    }

    /// Offset of the line terminator (`\n` or `\r\n`) ending the line containing `offset`,
    /// or the end of text
    pub fn line_end(&self, offset: usize) -> usize {
        let offset = offset.min(self.text.len());
        let end = self.text.as_bytes()[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|pos| offset + pos)
            .unwrap_or(self.text.len());
        if end > offset && self.byte_at(end - 1) == Some(b'\r') && end < self.text.len() {
            end - 1
        } else {
            end
        }
    }

    /// Offset just past the line terminator of the line containing `offset`
    pub fn next_line_start(&self, offset: usize) -> usize {
        let end = self.line_end(offset);
        match self.byte_at(end) {
            Some(b'\r') if self.byte_at(end + 1) == Some(b'\n') => end + 2,
            Some(b'\n') => end + 1,
            _ => end,
        }
    }

    /// Whitespace that starts the line containing `offset`
    pub fn indentation(&self, offset: usize) -> &'a str {
        let start = self.line_start(offset);
        let rest = &self.text[start..];
        let width = rest
            .bytes()
            .take_while(|&b| b == b' ' || b == b'\t')
            .count();
        &rest[..width]
    }

    /// True when only spaces or tabs precede `offset` on its line
    pub fn is_first_on_line(&self, offset: usize) -> bool {
        let offset = offset.min(self.text.len());
        self.text.as_bytes()[self.line_start(offset)..offset]
            .iter()
            .all(|&b| b == b' ' || b == b'\t')
    }

    /// First offset at or after `offset` that is not a space or tab
    pub fn skip_horizontal_whitespace(&self, offset: usize) -> usize {
        let offset = offset.min(self.text.len());
        offset
            + self.text.as_bytes()[offset..]
                .iter()
                .take_while(|&&b| b == b' ' || b == b'\t')
                .count()
    }

    /// First offset at or after `offset` that is not whitespace of any kind
    pub fn skip_whitespace(&self, offset: usize) -> usize {
        let offset = offset.min(self.text.len());
        offset
            + self.text.as_bytes()[offset..]
                .iter()
                .take_while(|b| b.is_ascii_whitespace())
                .count()
    }

    /// Last offset at or before `offset` such that the bytes in between are spaces or tabs
    pub fn trim_horizontal_whitespace_back(&self, offset: usize) -> usize {
        let offset = offset.min(self.text.len());
        offset
            - self.text.as_bytes()[..offset]
                .iter()
                .rev()
                .take_while(|&&b| b == b' ' || b == b'\t')
                .count()
    }

    /// 1-indexed line and column of `offset`
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = self.text.as_bytes()[..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1;
        let start = self.line_start(offset);
        let column = self
            .text
            .get(start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - start)
            + 1;
        (line, column)
    }

    /// Word tokens in a member header, skipping decorators and comments
    pub fn header_tokens(&self, range: TextRange) -> HeaderTokens<'a> {
        let mut end = range.end.min(self.text.len());
        let pos = range.start.min(end);
        if !self.text.is_char_boundary(end) || !self.text.is_char_boundary(pos) {
            end = pos;
        }
        HeaderTokens {
            text: self.text,
            pos,
            end,
        }
    }
}

/// Iterator over identifier and `*` tokens of a member header
pub struct HeaderTokens<'a> {
    text: &'a str,
    pos: usize,
    end: usize,
}

impl<'a> HeaderTokens<'a> {
    fn peek(&self) -> Option<u8> {
        if self.pos < self.end {
            self.text.as_bytes().get(self.pos).copied()
        } else {
            None
        }
    }

    fn word_end(&self, from: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut pos = from;
        while pos < self.end && is_identifier_byte(bytes[pos]) {
            pos += 1;
        }
        pos
    }

    fn skip_comment(&mut self) -> bool {
        let Some(rest) = self.text.get(self.pos..self.end) else {
            return false;
        };
        if rest.starts_with("/*") {
            self.pos = rest
                .find("*/")
                .map(|i| self.pos + i + 2)
                .unwrap_or(self.end);
            true
        } else if rest.starts_with("//") {
            self.pos = rest
                .find('\n')
                .map(|i| self.pos + i)
                .unwrap_or(self.end);
            true
        } else {
            false
        }
    }

    // `@scope.name(args)` including balanced parentheses and string arguments
    fn skip_decorator(&mut self) {
        self.pos += 1;
        let bytes = self.text.as_bytes();
        while self.pos < self.end && (is_identifier_byte(bytes[self.pos]) || bytes[self.pos] == b'.') {
            self.pos += 1;
        }
        if self.peek() != Some(b'(') {
            return;
        }
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;
        while self.pos < self.end {
            let b = bytes[self.pos];
            self.pos += 1;
            match quote {
                Some(_) if b == b'\\' => self.pos += 1,
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None => match b {
                    b'\'' | b'"' | b'`' => quote = Some(b),
                    b'(' => depth += 1,
                    b')' => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            return;
                        }
                    }
                    _ => {}
                },
            }
        }
    }
}

impl<'a> Iterator for HeaderTokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
                continue;
            }
            if b == b'/' && self.skip_comment() {
                continue;
            }
            if b == b'@' {
                self.skip_decorator();
                continue;
            }
            if b == b'*' {
                let start = self.pos;
                self.pos += 1;
                return Some(Token {
                    text: &self.text[start..self.pos],
                    range: TextRange::new(start, self.pos),
                });
            }
            if is_identifier_byte(b) {
                let start = self.pos;
                self.pos = self.word_end(start);
                return Some(Token {
                    text: &self.text[start..self.pos],
                    range: TextRange::new(start, self.pos),
                });
            }
            self.pos += 1;
        }
        None
    }
}

pub(crate) fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

//! Hand-written matchers for templ tag syntax.
//!
//! Attribute values and spread attributes may hold nested `{ ... }` groups.
//! Balanced nesting is not regular, so these matchers walk the text
//! directly with a fixed nesting budget instead of expanding a regex
//! template. Structural delimiters are ASCII and are scanned as bytes;
//! whitespace and comment ends are scanned as chars so that every
//! boundary stays on a char boundary.

use std::ops::Range;

use hl_engine::Pattern;

/// Nesting allowed inside an outermost brace group: one level of literal
/// nesting plus one level of interpolation.
pub const DEFAULT_BRACE_DEPTH: usize = 2;

/// Byte cursor over one candidate match.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, pos: usize) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) {
        if self.pos < self.bytes.len() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume bytes while `f` holds; returns how many were consumed.
    fn eat_while(&mut self, f: impl Fn(u8) -> bool) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(&f) {
            self.pos += 1;
        }
        self.pos - start
    }
}

/// JavaScript `\s`: Unicode `White_Space` except U+0085, plus U+FEFF.
fn is_space(ch: char) -> bool {
    ch == '\u{feff}' || (ch.is_whitespace() && ch != '\u{85}')
}

/// Characters a JavaScript `.` does not match.
fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_tag_name(b: u8) -> bool {
    is_word(b) || matches!(b, b'.' | b':' | b'-')
}

fn is_attr_name(b: u8) -> bool {
    is_word(b) || matches!(b, b'.' | b':' | b'$' | b'-')
}

fn ends_unquoted_value(ch: char) -> bool {
    is_space(ch) || matches!(ch, '{' | '\'' | '"' | '/' | '>' | '=')
}

/// Leftmost match of an anchored matcher, trying each `trigger` byte.
fn find_from(
    text: &str,
    start: usize,
    trigger: u8,
    match_at: impl Fn(usize) -> Option<usize>,
) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    (start..bytes.len())
        .filter(|&i| bytes[i] == trigger)
        .find_map(|i| match_at(i).map(|end| i..end))
}

/// Whitespace or a Go comment, as allowed between tag parts.
///
/// Whitespace is the JavaScript `\s` set, so U+00A0 and U+FEFF separate
/// attributes, and a `//` comment ends at any JavaScript line terminator,
/// U+2028 and U+2029 included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpacePattern;

impl SpacePattern {
    /// End of a single space unit starting at `pos`.
    pub fn match_at(&self, text: &str, pos: usize) -> Option<usize> {
        let rest = text.get(pos..)?;
        let ch = rest.chars().next()?;
        if is_space(ch) {
            Some(pos + ch.len_utf8())
        } else if rest.starts_with("//") {
            Some(rest.find(is_line_terminator).map_or(text.len(), |i| pos + i))
        } else if rest.starts_with("/*") {
            rest[2..].find("*/").map(|i| pos + i + 4)
        } else {
            None
        }
    }

    /// End of the longest run of space units starting at `pos`.
    pub fn skip(&self, text: &str, mut pos: usize) -> usize {
        while let Some(end) = self.match_at(text, pos) {
            pos = end;
        }
        pos
    }
}

/// A `{ ... }` group with bounded nesting.
///
/// Matching is recursive descent: an inner `{` spends one level of the
/// budget, and a group nested deeper than `max_depth` does not match at
/// all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracePattern {
    max_depth: usize,
}

impl BracePattern {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// End of the brace group starting at `pos`.
    pub fn match_at(&self, text: &str, pos: usize) -> Option<usize> {
        group_end(text.as_bytes(), pos, self.max_depth)
    }
}

fn group_end(bytes: &[u8], pos: usize, depth: usize) -> Option<usize> {
    if bytes.get(pos) != Some(&b'{') {
        return None;
    }
    let mut i = pos + 1;
    loop {
        match *bytes.get(i)? {
            b'}' => return Some(i + 1),
            b'{' if depth == 0 => return None,
            b'{' => i = group_end(bytes, i, depth - 1)?,
            _ => i += 1,
        }
    }
}

impl Pattern for BracePattern {
    fn find_at(&self, text: &str, start: usize) -> Option<Range<usize>> {
        find_from(text, start, b'{', |i| self.match_at(text, i))
    }
}

/// `{ ...expr }`: spread every attribute of an expression into a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadPattern {
    space: SpacePattern,
    braces: BracePattern,
}

impl SpreadPattern {
    pub fn new(space: SpacePattern, braces: BracePattern) -> Self {
        Self { space, braces }
    }

    pub fn match_at(&self, text: &str, pos: usize) -> Option<usize> {
        let mut c = Cursor::new(text, pos);
        if !c.eat(b'{') {
            return None;
        }
        c.pos = self.space.skip(text, c.pos);
        if !(c.eat(b'.') && c.eat(b'.') && c.eat(b'.')) {
            return None;
        }
        loop {
            match c.peek()? {
                b'}' => return Some(c.pos + 1),
                b'{' => c.pos = self.braces.match_at(text, c.pos)?,
                _ => c.advance(),
            }
        }
    }
}

impl Pattern for SpreadPattern {
    fn find_at(&self, text: &str, start: usize) -> Option<Range<usize>> {
        find_from(text, start, b'{', |i| self.match_at(text, i))
    }
}

/// `={ ... }`: an attribute whose value is an inline expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptPattern {
    braces: BracePattern,
}

impl ScriptPattern {
    pub fn new(braces: BracePattern) -> Self {
        Self { braces }
    }

    pub fn match_at(&self, text: &str, pos: usize) -> Option<usize> {
        if text.as_bytes().get(pos) != Some(&b'=') {
            return None;
        }
        self.braces.match_at(text, pos + 1)
    }
}

impl Pattern for ScriptPattern {
    fn find_at(&self, text: &str, start: usize) -> Option<Range<usize>> {
        find_from(text, start, b'=', |i| self.match_at(text, i))
    }
}

/// A whole opening, closing or self-closing tag.
///
/// `</?name (attr(=value)? | {...spread})* /?>`, plus the bare fragment
/// delimiters `<>` and `</>`. Values are quoted (backslash escapes
/// honored), unquoted, or a brace group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPattern {
    space: SpacePattern,
    braces: BracePattern,
    spread: SpreadPattern,
}

impl TagPattern {
    pub fn new(space: SpacePattern, braces: BracePattern, spread: SpreadPattern) -> Self {
        Self {
            space,
            braces,
            spread,
        }
    }

    pub fn match_at(&self, text: &str, pos: usize) -> Option<usize> {
        let mut c = Cursor::new(text, pos);
        if !c.eat(b'<') {
            return None;
        }
        c.eat(b'/');
        let after_open = c.pos;
        if let Some(end) = self.named_tag(text, after_open) {
            return Some(end);
        }
        (c.peek() == Some(b'>')).then_some(after_open + 1)
    }

    fn named_tag(&self, text: &str, pos: usize) -> Option<usize> {
        let mut c = Cursor::new(text, pos);
        if c.eat_while(is_tag_name) == 0 {
            return None;
        }
        loop {
            let spaced = self.space.skip(text, c.pos);
            if spaced == c.pos {
                break;
            }
            match self.attribute(text, spaced) {
                Some(end) => c.pos = end,
                None => break,
            }
        }
        c.pos = self.space.skip(text, c.pos);
        c.eat(b'/');
        c.eat(b'>').then_some(c.pos)
    }

    /// End of one attribute or spread attribute at `pos`.
    fn attribute(&self, text: &str, pos: usize) -> Option<usize> {
        if let Some(end) = self.spread.match_at(text, pos) {
            return Some(end);
        }
        let mut c = Cursor::new(text, pos);
        if c.eat_while(is_attr_name) == 0 {
            return None;
        }
        let name_end = c.pos;
        if !c.eat(b'=') {
            return Some(name_end);
        }
        Some(self.value(text, c.pos).unwrap_or(name_end))
    }

    fn value(&self, text: &str, pos: usize) -> Option<usize> {
        let mut c = Cursor::new(text, pos);
        match c.peek()? {
            quote @ (b'"' | b'\'') => {
                c.advance();
                loop {
                    match c.peek()? {
                        b'\\' => {
                            c.advance();
                            c.peek()?;
                            c.advance();
                        }
                        b if b == quote => return Some(c.pos + 1),
                        _ => c.advance(),
                    }
                }
            }
            b'{' => self.braces.match_at(text, pos),
            _ => {
                let end = text[pos..].find(ends_unquoted_value).map_or(text.len(), |i| pos + i);
                (end > pos).then_some(end)
            }
        }
    }
}

impl Pattern for TagPattern {
    fn find_at(&self, text: &str, start: usize) -> Option<Range<usize>> {
        find_from(text, start, b'<', |i| self.match_at(text, i))
    }
}

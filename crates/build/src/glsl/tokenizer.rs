//! GLSL source tokenizer
//!
//! Splits shader source into contiguous classified spans. The tokenizer only
//! knows what a token is; deciding what to do with it is left to the
//! [`rewriter`](super::rewriter).

use super::vocabulary::is_identifier_byte;

/// Classification of a source span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Run of bytes at or below the space character
    Whitespace,
    /// Preprocessor line starting at `#`, including its line feed
    Directive,
    /// `//` comment, excluding the line feed
    LineComment,
    /// `/* */` comment, possibly unterminated
    BlockComment,
    /// `.` followed by a field or swizzle name, possibly after blanks
    Member,
    /// Run of identifier bytes: identifiers, keywords and numbers
    Word,
    /// Any other single byte
    Other,
}

/// A classified half-open span `[start, end)` of the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// The bytes covered by this token
    pub fn text<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        &source[self.start..self.end]
    }

    /// Whitespace and comments carry no meaning for the compiler
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// Lazy iterator over the tokens of a shader source
///
/// The scan position only moves forward. A tokenizer can be restarted at any
/// token boundary with [`Tokenizer::starting_at`].
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a [u8],
    position: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::from_bytes(source.as_bytes())
    }

    pub fn from_bytes(source: &'a [u8]) -> Self {
        Self { source, position: 0 }
    }

    /// Resumes tokenizing at a previously returned token boundary
    pub fn starting_at(source: &'a [u8], position: usize) -> Self {
        Self {
            source,
            position: position.min(source.len()),
        }
    }

    /// Offset of the next token
    pub fn position(&self) -> usize {
        self.position
    }

    fn scan_while(&self, mut index: usize, predicate: impl Fn(u8) -> bool) -> usize {
        while index < self.source.len() && predicate(self.source[index]) {
            index += 1;
        }
        index
    }

    fn find_from(&self, index: usize, needle: &[u8]) -> Option<usize> {
        self.source.get(index..)?.windows(needle.len()).position(|w| w == needle).map(|offset| index + offset)
    }

    fn directive_end(&self, start: usize) -> usize {
        let mut index = start + 1;
        loop {
            let Some(line_feed) = self.find_from(index, b"\n") else {
                return self.source.len();
            };
            let mut last = line_feed;
            while last > start && self.source[last - 1] == b'\r' {
                last -= 1;
            }
            if last > start && self.source[last - 1] == b'\\' {
                index = line_feed + 1;
            } else {
                return line_feed + 1;
            }
        }
    }

    /// End of a `.name` access starting at `start`, blanks after the dot allowed
    fn member_end(&self, start: usize) -> Option<usize> {
        if self.source[start] != b'.' {
            return None;
        }
        let name_start = self.scan_while(start + 1, |b| b <= b' ');
        let first = *self.source.get(name_start)?;
        is_identifier_byte(first).then(|| self.scan_while(name_start, is_identifier_byte))
    }

    fn classify(&self, start: usize) -> (TokenKind, usize) {
        let source = self.source;
        let byte = source[start];
        let next = source.get(start + 1).copied();

        if byte <= b' ' {
            (TokenKind::Whitespace, self.scan_while(start + 1, |b| b <= b' '))
        } else if byte == b'#' {
            (TokenKind::Directive, self.directive_end(start))
        } else if byte == b'/' && next == Some(b'/') {
            let end = self.find_from(start + 2, b"\n").unwrap_or(source.len());
            (TokenKind::LineComment, end)
        } else if byte == b'/' && next == Some(b'*') {
            let end = self.find_from(start + 2, b"*/").map_or(source.len(), |i| i + 2);
            (TokenKind::BlockComment, end)
        } else if let Some(end) = self.member_end(start) {
            (TokenKind::Member, end)
        } else if is_identifier_byte(byte) {
            (TokenKind::Word, self.scan_while(start + 1, is_identifier_byte))
        } else {
            (TokenKind::Other, start + 1)
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.position >= self.source.len() {
            return None;
        }
        let start = self.position;
        let (kind, end) = self.classify(start);
        self.position = end;
        Some(Token { kind, start, end })
    }
}

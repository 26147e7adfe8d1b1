//! Source rewriting
//!
//! Consumes the token stream of one shader and produces its minified text:
//! comments and redundant whitespace are dropped and every identifier that is
//! not reserved is replaced by a short alias.
//!
//! Known limitations:
//! * `out` declarations share their alias between stages but produce no macro
//!   unless [`MinifyOptions::record_outputs`](super::MinifyOptions) is set.
//! * Member accesses are never renamed while the names declared inside a
//!   `struct` or uniform block are, so sources that access named struct
//!   fields (`light.pos`) do not survive minification. Swizzles are fine.

use std::borrow::Cow;
use std::collections::HashSet;

use super::alias::AliasAllocator;
use super::declaration::DeclarationTracker;
use super::macros::MacroRecord;
use super::session::{AliasTable, Session, ShaderSource};
use super::tokenizer::{Token, TokenKind, Tokenizer};
use super::vocabulary::is_identifier_byte;
use crate::{Error, Result};

/// Per-file rewriting state
struct FilePass<'s> {
    session: &'s mut Session,
    /// Aliases visible in this file, seeded from the session's shared table
    local: AliasTable,
    allocator: AliasAllocator,
    tracker: DeclarationTracker,
    /// Names introduced by `#define`, kept verbatim
    defined: HashSet<Vec<u8>>,
    program: &'s str,
    file: &'s str,
}

impl<'s> FilePass<'s> {
    fn new(source: &'s ShaderSource, session: &'s mut Session) -> Self {
        Self {
            local: session.shared_aliases().clone(),
            allocator: AliasAllocator::new(session.options().max_alias_len),
            tracker: DeclarationTracker::new(source.stage),
            defined: HashSet::new(),
            program: &source.program,
            file: &source.name,
            session,
        }
    }

    /// Remembers `#define`d names; a name that is already some identifier's alias is an error
    fn observe_directive(&mut self, directive: &[u8]) -> Result<()> {
        let Some(name) = defined_name(directive) else {
            return Ok(());
        };
        let name = String::from_utf8_lossy(name);
        if self.local.contains_alias(&name) {
            return Err(Error::DefinedAliasClash {
                file: self.file.to_string(),
                name: name.into_owned(),
            });
        }
        self.defined.insert(name.as_bytes().to_vec());
        Ok(())
    }

    fn rewrite_word<'t>(&mut self, word: &'t [u8]) -> Result<Cow<'t, [u8]>> {
        if self.session.vocabulary().is_reserved(word) || self.defined.contains(word) {
            self.tracker.observe_keyword(word);
            return Ok(Cow::Borrowed(word));
        }

        let name = String::from_utf8_lossy(word);
        let declaration = self.tracker.consume();
        let alias = match self.local.get(&name) {
            Some(alias) => alias.to_string(),
            None => {
                let FilePass {
                    session, local, allocator, defined, ..
                } = self;
                let shared = session.shared_aliases();
                let alias = allocator.allocate(session.vocabulary(), |candidate| {
                    shared.contains_alias(candidate) || local.contains_alias(candidate) || defined.contains(candidate.as_bytes())
                })?;
                local.insert(&name, &alias);
                alias
            }
        };

        if declaration.is_shared() {
            self.session.share(&name, &alias);
        }
        if let Some(prefix) = declaration.macro_prefix(self.session.options().record_outputs) {
            self.session.record(MacroRecord::new(prefix, self.program, &name, &alias));
        }

        Ok(Cow::Owned(alias.into_bytes()))
    }
}

/// Name introduced by a `#define` directive, if any
fn defined_name(directive: &[u8]) -> Option<&[u8]> {
    let is_blank = |b: &u8| *b == b' ' || *b == b'\t';
    let rest = directive.strip_prefix(b"#")?;
    let rest = &rest[rest.iter().take_while(|b| is_blank(b)).count()..];
    let rest = rest.strip_prefix(b"define")?;
    let blanks = rest.iter().take_while(|b| is_blank(b)).count();
    if blanks == 0 {
        return None;
    }
    let rest = &rest[blanks..];
    let len = rest.iter().take_while(|&&b| is_identifier_byte(b)).count();
    (len > 0).then(|| &rest[..len])
}

/// Whether writing `left` directly before `right` would merge two tokens
fn fuses(left: u8, right: u8) -> bool {
    if is_identifier_byte(left) && is_identifier_byte(right) {
        return true;
    }
    match (left, right) {
        (b'/', b'/' | b'*') => true,
        (b'+' | b'-' | b'*' | b'/' | b'%' | b'<' | b'>' | b'=' | b'!' | b'&' | b'|' | b'^', b'=') => true,
        (b'+', b'+') | (b'-', b'-') | (b'<', b'<') | (b'>', b'>') | (b'&', b'&') | (b'|', b'|') | (b'^', b'^') => true,
        _ => false,
    }
}

/// Minifies one shader source within `session`
///
/// Whitespace and comments are removed; a single space is kept only where the
/// neighbouring tokens would otherwise fuse. Directives are copied verbatim,
/// member accesses lose only the blanks around their dot.
///
/// # Errors
/// [`Error::AliasExhausted`] when no alias is left, and
/// [`Error::DefinedAliasClash`] when a `#define` names an alias already in use.
pub fn minify_source(source: &ShaderSource, session: &mut Session) -> Result<String> {
    let bytes = source.text.as_bytes();
    let mut pass = FilePass::new(source, session);
    let mut output: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut separated = false;

    for token in Tokenizer::from_bytes(bytes) {
        if token.is_trivia() {
            separated = true;
            continue;
        }

        let text = token.text(bytes);
        let replacement = match token.kind {
            TokenKind::Word => pass.rewrite_word(text)?,
            TokenKind::Directive => {
                pass.observe_directive(text)?;
                Cow::Borrowed(text)
            }
            TokenKind::Member if text.iter().any(|&b| b <= b' ') => Cow::Owned(text.iter().copied().filter(|&b| b > b' ').collect()),
            TokenKind::Other => {
                pass.tracker.observe_punctuation(text[0]);
                Cow::Borrowed(text)
            }
            _ => Cow::Borrowed(text),
        };

        write_token(&mut output, token, &replacement, separated);
        separated = false;
    }

    tracing::debug!(file = %source.name, from = bytes.len(), to = output.len(), "minified shader");
    Ok(String::from_utf8_lossy(&output).into_owned())
}

fn write_token(output: &mut Vec<u8>, token: Token, text: &[u8], separated: bool) {
    let last = output.last().copied();
    if token.kind == TokenKind::Directive {
        if last.is_some_and(|b| b != b'\n') {
            output.push(b'\n');
        }
    } else if let (true, Some(left), Some(&right)) = (separated, last, text.first()) {
        if fuses(left, right) {
            output.push(b' ');
        }
    }
    output.extend_from_slice(text);
}

/// Debug variant: the original text with surrounding whitespace trimmed
pub fn copy_source(source: &ShaderSource) -> String {
    source.text.trim().to_string()
}

/// Wraps shader text in a `R"r( ... )r"` raw string literal for embedding
pub fn wrap_raw_string(text: &str) -> String {
    format!("R\"r({text})r\"\n")
}

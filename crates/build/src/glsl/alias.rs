//! Short alias generation
//!
//! Aliases are numerals over a 63-symbol alphabet (`a-z`, `A-Z`, `0-9`, `_`
//! in ascending order) with `_` as the highest digit in every position; a new
//! digit is added only once every digit is at its maximum. Numerals with a
//! leading decimal digit are numeric literals and never issued. Successive
//! aliases are produced in a fixed order, so the same sequence of requests
//! always yields the same names.

use super::vocabulary::Vocabulary;
use crate::{Error, Result};

/// Alias digits in ascending order
const ALPHABET: &[u8; 63] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";
const FIRST_DIGIT: u8 = b'a';
const LAST_DIGIT: u8 = b'_';

/// Longest alias produced unless configured otherwise
pub const DEFAULT_MAX_ALIAS_LEN: usize = 8;

fn digit_value(byte: u8) -> usize {
    match byte {
        b'a'..=b'z' => (byte - b'a') as usize,
        b'A'..=b'Z' => (byte - b'A') as usize + 26,
        b'0'..=b'9' => (byte - b'0') as usize + 52,
        _ => ALPHABET.len() - 1,
    }
}

/// `gl9`, `GL9_`, `gL9__`... are the last numerals before the `gl_` range
fn precedes_builtin_range(name: &[u8]) -> bool {
    name.len() >= 3 && name[..3].eq_ignore_ascii_case(b"GL9") && name[3..].iter().all(|&b| b == LAST_DIGIT)
}

/// Returns the numeral following `name`, ignoring reservations
fn successor(name: &[u8]) -> Vec<u8> {
    if precedes_builtin_range(name) {
        // jump over every `gl_*` numeral by bumping the second digit
        let mut next = vec![name[0], ALPHABET[digit_value(name[1]) + 1]];
        next.resize(name.len(), FIRST_DIGIT);
        return next;
    }

    let Some(i) = name.iter().rposition(|&b| b != LAST_DIGIT) else {
        return vec![FIRST_DIGIT; name.len() + 1];
    };
    let mut next = name[..i].to_vec();
    next.push(ALPHABET[digit_value(name[i]) + 1]);
    next.resize(name.len(), FIRST_DIGIT);
    if next[0].is_ascii_digit() {
        // numeric literals: go straight to the `_` leading digit
        next[0] = LAST_DIGIT;
        next[1..].fill(FIRST_DIGIT);
    }
    next
}

/// Computes the next free alias after `previous`
///
/// Candidates are skipped while they are reserved words or `taken` reports
/// them as already issued. The empty string starts the sequence at `a`.
///
/// # Errors
/// Returns [`Error::AliasExhausted`] once the next candidate would be longer
/// than `max_len`.
pub fn next_alias(previous: &str, vocabulary: &Vocabulary, max_len: usize, mut taken: impl FnMut(&str) -> bool) -> Result<String> {
    let mut candidate = previous.as_bytes().to_vec();
    loop {
        candidate = successor(&candidate);
        if candidate.len() > max_len {
            return Err(Error::AliasExhausted { max_len });
        }
        if vocabulary.is_reserved(&candidate) {
            continue;
        }

        let alias: String = candidate.iter().map(|&b| b as char).collect();
        if !taken(&alias) {
            return Ok(alias);
        }
    }
}

/// Issues aliases in sequence for one shader file
#[derive(Debug, Clone)]
pub struct AliasAllocator {
    previous: String,
    max_len: usize,
}

impl AliasAllocator {
    pub fn new(max_len: usize) -> Self {
        Self {
            previous: String::new(),
            max_len,
        }
    }

    /// Allocates the next alias that `taken` does not already claim
    pub fn allocate(&mut self, vocabulary: &Vocabulary, taken: impl FnMut(&str) -> bool) -> Result<String> {
        let alias = next_alias(&self.previous, vocabulary, self.max_len, taken)?;
        self.previous.clone_from(&alias);
        Ok(alias)
    }
}

impl Default for AliasAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ALIAS_LEN)
    }
}

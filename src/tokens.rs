//! Anchor token extraction from patterns.
//!
//! The automaton never matches a full pattern; it matches a short *token*
//! (at most [`MAX_TOKEN`] bytes) chosen so that any real match of the
//! pattern must contain the token at a deterministic offset. Each token
//! carries a *backtrack* value: the distance from the token's first byte
//! back to the pattern's first byte, which the scanner uses to position the
//! full-pattern verifier after a hit.
//!
//! Per pattern kind:
//! - Text: the first bytes (ascii), the zero-interleaved first bytes (wide),
//!   or both; `NO_CASE` adds every case permutation of each base token.
//! - Hex: a single token picked from the concrete-byte runs of the mask
//!   stream, preferring runs with many distinct byte values over homogeneous
//!   ones like `00 00 00 00`.
//! - Regex: the literal prefix of the source, or one single-byte token per
//!   possible first byte when the prefix is empty.
//!
//! A pattern that yields no token at all degrades to a root attachment in
//! the automaton; the scanner then re-verifies it at every offset. That is
//! the conservative fallback, never an error.
//!
//! # Invariants
//! - Token length is at most `MAX_TOKEN` bytes.
//! - `backtrack` counts pattern bytes, never alternation-branch bytes.
//! - Hex tokens are case-exact; `NO_CASE` does not apply to them.

use crate::first_bytes::regex_first_bytes;
use crate::pattern::{
    Pattern, PatternFlags, MASK_EXACT_SKIP, MASK_MATCH, MASK_OR, MASK_OR_END, MASK_RANGE_SKIP,
};

/// Maximum anchor token length in bytes.
pub const MAX_TOKEN: usize = 4;

/// Bytes occupied by the `[len][backtrack]` header of one record.
const RECORD_HEADER: usize = 8;

/// Worst-case token buffer size: the regex first-byte fallback can emit one
/// single-byte record per possible first byte. The text worst case
/// (ascii + wide + nocase) is far smaller.
const TOKEN_BUF_CAPACITY: usize = 256 * (RECORD_HEADER + 1) + 4;

/// One decoded token record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    /// Distance from the token's first byte back to the pattern's first byte.
    pub backtrack: u32,
    /// The anchor bytes; never empty for records yielded by [`TokenIter`].
    pub bytes: &'a [u8],
}

/// Flat token record stream:
///
/// ```text
/// [len:u32][backtrack:u32][bytes:len] ... [0:u32]
/// ```
///
/// Little-endian, terminated by a zero length. A record written with
/// `len == 0` doubles as a terminator: iteration stops there, signalling an
/// un-anchorable pattern.
///
/// One buffer is scratch for one `add_pattern` call; it is cleared and
/// refilled per pattern.
#[derive(Debug, Default)]
pub struct TokenBuf {
    buf: Vec<u8>,
}

impl TokenBuf {
    /// Creates a buffer sized for the worst-case token set of one pattern.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(TOKEN_BUF_CAPACITY),
        }
    }

    /// Drops all records.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Appends one `[len][backtrack][bytes]` record.
    pub fn push_record(&mut self, backtrack: u32, bytes: &[u8]) {
        self.buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(&backtrack.to_le_bytes());
        self.buf.extend_from_slice(bytes);
    }

    /// Appends the zero-length terminator.
    pub fn finish(&mut self) {
        self.buf.extend_from_slice(&0u32.to_le_bytes());
    }

    /// Iterates the records up to the terminator.
    #[must_use]
    pub fn records(&self) -> TokenIter<'_> {
        TokenIter {
            buf: &self.buf,
            pos: 0,
        }
    }
}

/// Iterator over the records of a [`TokenBuf`].
pub struct TokenIter<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let len_bytes = self.buf.get(self.pos..self.pos + 4)?;
        let len = u32::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
        if len == 0 {
            return None;
        }
        let bt_bytes = self.buf.get(self.pos + 4..self.pos + 8)?;
        let backtrack = u32::from_le_bytes(bt_bytes.try_into().unwrap());
        let bytes = self.buf.get(self.pos + 8..self.pos + 8 + len)?;
        self.pos += RECORD_HEADER + len;
        Some(Token { backtrack, bytes })
    }
}

/// Generates all tokens for `pattern` into `out` (cleared first).
pub(crate) fn generate(pattern: &Pattern, out: &mut TokenBuf) {
    out.clear();
    if pattern.flags.contains(PatternFlags::HEX) {
        hex_tokens(&pattern.bytes, pattern.mask_stream(), out);
    } else if pattern.flags.contains(PatternFlags::REGEXP) {
        regexp_tokens(pattern, out);
    } else {
        text_tokens(pattern, out);
    }
    out.finish();
}

/// Emits every case permutation of `token`'s ASCII-letter positions except
/// the base token itself, all with the same backtrack.
///
/// Recursion depth is bounded by `MAX_TOKEN`; a token with `k` letter
/// positions expands to `2^k - 1` additional records.
fn push_case_combinations(token: &[u8], offset: usize, backtrack: u32, out: &mut TokenBuf) {
    if offset + 1 < token.len() {
        push_case_combinations(token, offset + 1, backtrack, out);
    }

    let c = token[offset];
    if c.is_ascii_alphabetic() {
        let mut flipped = [0u8; MAX_TOKEN];
        flipped[..token.len()].copy_from_slice(token);
        flipped[offset] ^= 0x20;
        let flipped = &flipped[..token.len()];

        out.push_record(backtrack, flipped);

        if offset + 1 < token.len() {
            push_case_combinations(flipped, offset + 1, backtrack, out);
        }
    }
}

/// Text patterns: ascii and/or wide base token, backtrack 0, plus case
/// permutations under `NO_CASE`.
fn text_tokens(pattern: &Pattern, out: &mut TokenBuf) {
    let nocase = pattern.flags.contains(PatternFlags::NO_CASE);

    if pattern.flags.contains(PatternFlags::ASCII) {
        let len = pattern.bytes.len().min(MAX_TOKEN);
        let token = &pattern.bytes[..len];
        out.push_record(0, token);
        if nocase && len > 0 {
            push_case_combinations(token, 0, 0, out);
        }
    }

    if pattern.flags.contains(PatternFlags::WIDE) {
        let len = (pattern.bytes.len() * 2).min(MAX_TOKEN);
        let mut wide = [0u8; MAX_TOKEN];
        for (i, slot) in wide[..len].iter_mut().enumerate() {
            *slot = if i % 2 == 0 { pattern.bytes[i / 2] } else { 0 };
        }
        let token = &wide[..len];
        out.push_record(0, token);
        if nocase && len > 0 {
            push_case_combinations(token, 0, 0, out);
        }
    }
}

/// Number of distinct values in the candidate window.
///
/// Penalizes homogeneous runs: `00 00 00 00` scores 1, `34 EB 45 97`
/// scores `MAX_TOKEN`.
fn distinct_count(window: &[u8; MAX_TOKEN]) -> usize {
    let mut count = 1;
    for i in 0..MAX_TOKEN - 1 {
        if window[i + 1..].iter().all(|&b| b != window[i]) {
            count += 1;
        }
    }
    count
}

/// Hex patterns: walk the mask stream and emit the single best token.
///
/// The candidate is the run of concrete, non-alternation bytes with the most
/// distinct values, preferring longer runs on ties. Bytes inside alternation
/// branches accumulate into the branch length rather than the backtrack;
/// leaving an alternation adds the (uniform) branch length to the backtrack.
/// Unequal branch lengths, a variable-length skip, or a mask byte with no
/// corresponding pattern byte all end the walk: any token past those points
/// would have a non-deterministic backtrack.
fn hex_tokens(bytes: &[u8], mask: &[u8], out: &mut TokenBuf) {
    let mut inside_or = false;
    let mut token_length: usize = 0;
    let mut backtrack: u32 = 0;
    let mut or_length: u32 = 0;
    let mut previous_or_length: u32 = 0;
    let mut pos: usize = 0;

    let mut last = [0u8; MAX_TOKEN];
    let mut max_unique: usize = 0;
    let mut candidate_pos: usize = 0;
    let mut candidate_len: usize = 0;
    let mut candidate_backtrack: u32 = 0;

    let mut mi = 0;
    while mi < mask.len() {
        let m = mask[mi];

        match m {
            MASK_OR => inside_or = true,
            MASK_OR_END => inside_or = false,
            _ => {}
        }

        if m == MASK_MATCH && !inside_or {
            let Some(&b) = bytes.get(pos) else {
                // Mask promises a concrete byte the pattern does not have;
                // nothing after this point can be anchored.
                break;
            };
            if token_length == 0 {
                last = [b; MAX_TOKEN];
            }
            token_length = (token_length + 1).min(MAX_TOKEN);
            last[pos % MAX_TOKEN] = b;

            let unique = distinct_count(&last);
            if unique > max_unique || token_length > candidate_len {
                max_unique = unique;
                candidate_pos = pos + 1 - token_length;
                candidate_backtrack = backtrack - (token_length as u32 - 1);
                candidate_len = token_length;

                if candidate_len == MAX_TOKEN && max_unique == MAX_TOKEN {
                    break;
                }
            }
        } else {
            token_length = 0;
        }

        if !matches!(m, MASK_OR | MASK_OR_END | MASK_EXACT_SKIP | MASK_RANGE_SKIP) {
            pos += 1;
            if inside_or {
                or_length += 1;
            } else {
                backtrack += 1;
            }
        }

        if m == MASK_EXACT_SKIP {
            mi += 1;
            let Some(&count) = mask.get(mi) else {
                break;
            };
            backtrack += count as u32;
        } else if m == MASK_RANGE_SKIP {
            break;
        } else if m == MASK_OR || m == MASK_OR_END {
            if previous_or_length == 0 {
                previous_or_length = or_length;
            }
            // Branches of different lengths would make every later
            // backtrack depend on which branch matched.
            if or_length != previous_or_length {
                break;
            }
            or_length = 0;
            if m == MASK_OR_END {
                backtrack += previous_or_length;
                previous_or_length = 0;
            }
        }

        mi += 1;
    }

    // A zero-length record acts as the terminator and sends the pattern to
    // the root state.
    out.push_record(
        candidate_backtrack,
        &bytes[candidate_pos..candidate_pos + candidate_len],
    );
}

/// Bytes that stand for themselves in regex source.
fn is_hashable(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b' ' | b'!'
                | b'"'
                | b'#'
                | b'%'
                | b'&'
                | b'\''
                | b','
                | b'-'
                | b'/'
                | b':'
                | b';'
                | b'<'
                | b'='
                | b'>'
                | b'@'
                | b'_'
                | b'`'
                | b'~'
        )
}

/// Metacharacters whose escaped form is the literal byte itself.
///
/// Escapes that name a class (`\d`, `\w`, `\s`, ...) are excluded: they do
/// not pin down a single required byte.
fn is_escapable(b: u8) -> bool {
    matches!(
        b,
        b'\\' | b'^'
            | b'$'
            | b'.'
            | b'|'
            | b'?'
            | b'*'
            | b'+'
            | b'('
            | b')'
            | b'['
            | b']'
            | b'{'
            | b'}'
            | b'-'
            | b'/'
    )
}

/// Regex patterns: literal source prefix, or the first-byte set fallback.
///
/// A hashable character joins the token only when the following character is
/// not `*`, `?`, or `{`: those quantifiers can make it optional (`abc*`,
/// `abc?`, `abc{0,2}`), and an optional byte cannot anchor anything. `+` is
/// deliberately absent from that list; `c+` still requires one `c`.
fn regexp_tokens(pattern: &Pattern, out: &mut TokenBuf) {
    let source = &pattern.bytes;
    let mut token = [0u8; MAX_TOKEN];
    let mut token_length = 0;

    let mut i = usize::from(source.first() == Some(&b'^'));
    while i < source.len() && token_length < MAX_TOKEN {
        let current = source[i];
        let next = source.get(i + 1).copied().unwrap_or(0);

        if current == b'\\' && is_escapable(next) {
            token[token_length] = next;
            token_length += 1;
            i += 2;
        } else if is_hashable(current) && !matches!(next, b'*' | b'{' | b'?') {
            token[token_length] = current;
            token_length += 1;
            i += 1;
        } else {
            break;
        }
    }

    if token_length > 0 {
        let token = &token[..token_length];
        out.push_record(0, token);
        if pattern.flags.contains(PatternFlags::NO_CASE) {
            push_case_combinations(token, 0, 0, out);
        }
    } else if let Some(set) = regex_first_bytes(source) {
        for &b in set.as_slice() {
            out.push_record(0, &[b]);
        }
    }
}

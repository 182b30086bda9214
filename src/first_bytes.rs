//! Possible-first-byte derivation for regular expressions.
//!
//! Fallback anchoring for regexes with no usable literal prefix: if the set
//! of bytes a match can start with is bounded, every member becomes a
//! single-byte anchor token. The derivation walks the `regex-syntax` HIR,
//! which already accounts for flags and case folding, so `(?i:ab)` arrives
//! here as the class `[aA][bB]` with no folding logic of our own.
//!
//! # Soundness
//! The derived set must contain the first byte of *every* possible match;
//! a missing byte means the scanner silently drops real matches. The walk
//! is therefore conservative in one direction only: it may include bytes no
//! match starts with (a never-firing anchor costs a little memory), and it
//! reports "unbounded" rather than guess when the regex can match the empty
//! string or any first byte.

use regex_syntax::hir::{Class, Hir, HirKind};
use regex_syntax::ParserBuilder;

/// A compact set of bytes with O(1) membership checks.
#[derive(Clone, Debug)]
pub struct ByteSet {
    table: [bool; 256],
    bytes: Vec<u8>,
}

impl ByteSet {
    /// Returns the empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            table: [false; 256],
            bytes: Vec::new(),
        }
    }

    fn insert(&mut self, b: u8) {
        if !self.table[b as usize] {
            self.table[b as usize] = true;
            self.bytes.push(b);
        }
    }

    fn insert_range(&mut self, start: u8, end: u8) {
        for b in start..=end {
            self.insert(b);
        }
    }

    fn union(&mut self, other: &ByteSet) {
        for &b in &other.bytes {
            self.insert(b);
        }
    }

    /// Returns true if `b` is a member.
    #[must_use]
    pub fn contains(&self, b: u8) -> bool {
        self.table[b as usize]
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the members in ascending order once finalized.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn finalize(&mut self) {
        self.bytes.sort_unstable();
    }
}

/// First-byte summary for one HIR node.
struct FirstInfo {
    set: ByteSet,
    /// Whether the node can match the empty string; an empty-matchable node
    /// passes first-byte responsibility to whatever follows it.
    matches_empty: bool,
}

/// Derives the set of bytes a match of `source` can start with.
///
/// Returns `None` when no bounded set exists: unparseable source, a regex
/// that can match the empty string (any byte could be "first"), or a set
/// covering all 256 values.
#[must_use]
pub fn regex_first_bytes(source: &[u8]) -> Option<ByteSet> {
    let source = std::str::from_utf8(source).ok()?;
    let hir = ParserBuilder::new().utf8(false).build().parse(source).ok()?;

    let info = first_info(&hir)?;
    if info.matches_empty || info.set.len() == 256 {
        return None;
    }

    let mut set = info.set;
    set.finalize();
    Some(set)
}

/// Leading UTF-8 byte of a scalar value.
fn utf8_lead_byte(c: char) -> u8 {
    let mut buf = [0u8; 4];
    c.encode_utf8(&mut buf);
    buf[0]
}

fn first_info(hir: &Hir) -> Option<FirstInfo> {
    match hir.kind() {
        HirKind::Empty => Some(FirstInfo {
            set: ByteSet::empty(),
            matches_empty: true,
        }),

        HirKind::Literal(lit) => {
            let mut set = ByteSet::empty();
            match lit.0.first() {
                Some(&b) => {
                    set.insert(b);
                    Some(FirstInfo {
                        set,
                        matches_empty: false,
                    })
                }
                None => Some(FirstInfo {
                    set,
                    matches_empty: true,
                }),
            }
        }

        HirKind::Class(class) => {
            let mut set = ByteSet::empty();
            match class {
                Class::Bytes(cls) => {
                    for range in cls.ranges() {
                        set.insert_range(range.start(), range.end());
                    }
                }
                Class::Unicode(cls) => {
                    // The UTF-8 leading byte is monotonic in the scalar
                    // value, so the lead bytes of a scalar range form a
                    // contiguous byte range. This over-approximates for
                    // ranges spanning encoded lengths, which only adds
                    // never-firing anchors.
                    for range in cls.ranges() {
                        set.insert_range(
                            utf8_lead_byte(range.start()),
                            utf8_lead_byte(range.end()),
                        );
                    }
                }
            }
            Some(FirstInfo {
                set,
                matches_empty: false,
            })
        }

        // Zero-width assertions contribute no bytes.
        HirKind::Look(_) => Some(FirstInfo {
            set: ByteSet::empty(),
            matches_empty: true,
        }),

        HirKind::Repetition(rep) => {
            let sub = first_info(&rep.sub)?;
            Some(FirstInfo {
                set: sub.set,
                matches_empty: rep.min == 0 || sub.matches_empty,
            })
        }

        HirKind::Capture(cap) => first_info(&cap.sub),

        HirKind::Concat(subs) => {
            let mut set = ByteSet::empty();
            let mut matches_empty = true;
            for sub in subs {
                let info = first_info(sub)?;
                set.union(&info.set);
                if !info.matches_empty {
                    matches_empty = false;
                    break;
                }
            }
            Some(FirstInfo { set, matches_empty })
        }

        HirKind::Alternation(subs) => {
            let mut set = ByteSet::empty();
            let mut matches_empty = false;
            for sub in subs {
                let info = first_info(sub)?;
                set.union(&info.set);
                matches_empty |= info.matches_empty;
            }
            Some(FirstInfo { set, matches_empty })
        }
    }
}

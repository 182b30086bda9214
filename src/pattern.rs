//! Pattern model: flags, hex mask streams, and identifiers.
//!
//! A [`Pattern`] is the external input to the automaton. Its `bytes` hold
//! literal text, hex pattern bytes, or regex source depending on the flags;
//! hex patterns additionally carry a parallel mask stream describing which
//! bytes are concrete and where wildcards, skips, and alternations sit.
//!
//! # Invariants
//! - `HEX`, `REGEXP`, and text (neither flag) are mutually exclusive kinds.
//! - `ASCII` and `WIDE` are independent; a text pattern may carry either or
//!   both. `NO_CASE` composes with any text or regex pattern.
//! - A hex mask stream is read until [`MASK_END`] or the end of the slice,
//!   whichever comes first.

/// Mask code for a concrete byte that must match exactly.
pub const MASK_MATCH: u8 = 0xFF;
/// Mask code opening each alternation branch, `(aa | bb)`.
pub const MASK_OR: u8 = 0xFA;
/// Mask code closing an alternation.
pub const MASK_OR_END: u8 = 0xFB;
/// Mask code for a fixed-length jump; the following mask byte is the count.
pub const MASK_EXACT_SKIP: u8 = 0xFC;
/// Mask code for a variable-length jump, `[n-m]`.
pub const MASK_RANGE_SKIP: u8 = 0xFD;
/// Mask stream terminator.
pub const MASK_END: u8 = 0xFE;

/// Opaque pattern identifier assigned by [`crate::Automaton::add_pattern`].
///
/// Indexes the automaton's pattern registry; only meaningful for the
/// automaton that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PatternId(pub(crate) u32);

impl PatternId {
    /// Returns the raw registry index.
    #[inline]
    #[must_use]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Pattern kind and modifier flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PatternFlags(u32);

impl PatternFlags {
    /// Hex pattern: `bytes` plus a mask stream.
    pub const HEX: Self = Self(1 << 0);
    /// Regular expression: `bytes` is the regex source.
    pub const REGEXP: Self = Self(1 << 1);
    /// Text pattern matched as raw bytes.
    pub const ASCII: Self = Self(1 << 2);
    /// Text pattern matched with interleaved zero bytes.
    pub const WIDE: Self = Self(1 << 3);
    /// Case-insensitive matching for text and regex patterns.
    pub const NO_CASE: Self = Self(1 << 4);

    /// Returns the empty flag set.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns true if all flags in `other` are set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for PatternFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for PatternFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A signature pattern to be inserted into the automaton.
///
/// The automaton only matches the pattern's anchor token; `identifier` and
/// the raw bytes travel with the match so an external verifier can confirm
/// the full pattern at the backtracked offset.
#[derive(Clone, Debug)]
pub struct Pattern {
    /// Human-readable name, surfaced in diagnostics and match reports.
    pub identifier: String,
    /// Literal bytes, hex pattern bytes, or regex source.
    pub bytes: Vec<u8>,
    /// Hex mask stream; `None` for text and regex patterns.
    pub mask: Option<Vec<u8>>,
    /// Kind and modifier flags.
    pub flags: PatternFlags,
}

impl Pattern {
    /// Creates a text pattern.
    ///
    /// When `flags` names neither `ASCII` nor `WIDE`, `ASCII` is assumed;
    /// a text pattern with no representation would never match anything.
    #[must_use]
    pub fn text(identifier: impl Into<String>, bytes: impl Into<Vec<u8>>, flags: PatternFlags) -> Self {
        let mut flags = flags;
        if !flags.contains(PatternFlags::ASCII) && !flags.contains(PatternFlags::WIDE) {
            flags |= PatternFlags::ASCII;
        }
        Self {
            identifier: identifier.into(),
            bytes: bytes.into(),
            mask: None,
            flags,
        }
    }

    /// Creates a hex pattern from parallel byte and mask streams.
    #[must_use]
    pub fn hex(
        identifier: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        mask: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            bytes: bytes.into(),
            mask: Some(mask.into()),
            flags: PatternFlags::HEX,
        }
    }

    /// Creates a regex pattern from its source text.
    #[must_use]
    pub fn regex(identifier: impl Into<String>, source: impl Into<Vec<u8>>, flags: PatternFlags) -> Self {
        Self {
            identifier: identifier.into(),
            bytes: source.into(),
            mask: None,
            flags: flags | PatternFlags::REGEXP,
        }
    }

    /// Returns the mask stream up to (not including) [`MASK_END`].
    ///
    /// Truncated streams (no terminator) are returned whole; the walk simply
    /// ends at the slice boundary.
    #[must_use]
    pub fn mask_stream(&self) -> &[u8] {
        match &self.mask {
            Some(mask) => {
                let end = mask.iter().position(|&m| m == MASK_END).unwrap_or(mask.len());
                &mask[..end]
            }
            None => &[],
        }
    }
}

//! Multi-pattern anchor automaton for signature scanning.
//!
//! This crate is the matching core of a signature engine: an Aho-Corasick
//! automaton specialized for scanning binary data against large pattern sets.
//! Patterns may be literal byte strings, case-insensitive strings, wide
//! (interleaved-zero) strings, hex patterns with wildcards and alternations,
//! or regular expressions. The automaton does not match full patterns; it
//! matches short *anchor tokens* extracted from each pattern and reports,
//! for every hit, how far back the full pattern begins so an external
//! verifier can confirm the match.
//!
//! Build flow (single automaton):
//! 1) Extract anchor tokens from each pattern (`tokens`).
//! 2) Insert tokens into a shared trie (`Automaton::add_pattern`).
//! 3) Compute failure links and collapsed match lists
//!    (`Automaton::build_failure_links`).
//!
//! Scan flow: a scanner feeds bytes through [`Automaton::step`] (or drives
//! [`Automaton::next_state`] with its own failure-fallback loop) and, at
//! every state, reads [`Automaton::matches`] to obtain `(pattern, backtrack)`
//! pairs for external verification.
//!
//! Full-pattern verification, the scan loop over files, rule compilation,
//! and persistence of the compiled automaton are out of scope.

pub mod arena;
pub mod automaton;
pub mod first_bytes;
pub mod pattern;
pub mod tokens;

pub use automaton::{AddedPattern, AnchorMatch, ArenaLimits, Automaton, CompileError, StateId};
pub use pattern::{Pattern, PatternFlags, PatternId};
pub use tokens::MAX_TOKEN;

#[cfg(feature = "stats")]
pub use automaton::AutomatonStats;

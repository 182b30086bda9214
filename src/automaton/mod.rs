//! The anchor automaton: trie construction, failure links, transitions.
//!
//! Build flow for one automaton:
//! 1. [`Automaton::add_pattern`] extracts anchor tokens from the pattern and
//!    inserts each as a trie path from the root, attaching a match entry
//!    (pattern id + backtrack) at the terminal state. Patterns with no
//!    usable anchor attach to the root instead.
//! 2. [`Automaton::build_failure_links`] runs once, after the last pattern:
//!    a BFS computes each state's failure link and collapses match lists so
//!    the scanner reads matches from the arrived state alone, never walking
//!    failure chains for match discovery.
//!
//! Scan flow: [`Automaton::next_state`] is the pure single-step transition;
//! [`Automaton::step`] adds the failure-fallback loop for callers that do
//! not roll their own. Both are `&self`; a linked automaton is immutable
//! and can be shared across scanner threads without synchronization.
//!
//! # Invariants
//! - Every non-root state's failure link targets a strictly shallower
//!   state; the root's failure link is itself.
//! - After linking, a state's match list is the union of its own matches,
//!   its failure-suffix matches, and the root-attached matches.
//! - Match lists share suffixes across states but never form cycles.

mod state;

pub use state::{StateId, MAX_TABLE_BASED_STATES_DEPTH};

use state::{ChildIter, MatchEntry, MatchId, State, TransitionId, TransitionNode, Transitions};

use crate::arena::Pool;
use crate::pattern::{Pattern, PatternId};
use crate::tokens::{self, TokenBuf, MAX_TOKEN};

use std::collections::VecDeque;
use std::fmt;

/// Capacity limits for the automaton's backing pools.
///
/// Exhausting any pool surfaces [`CompileError::ArenaOverflow`]; the
/// automaton stays well-defined with everything inserted so far intact.
#[derive(Clone, Copy, Debug)]
pub struct ArenaLimits {
    /// Maximum number of states.
    pub max_states: u32,
    /// Maximum number of sparse transition nodes.
    pub max_transitions: u32,
    /// Maximum number of match entries.
    pub max_matches: u32,
}

impl Default for ArenaLimits {
    fn default() -> Self {
        Self {
            max_states: 1 << 20,
            max_transitions: 1 << 21,
            max_matches: 1 << 21,
        }
    }
}

/// Errors surfaced while building an automaton.
///
/// Malformed patterns are deliberately absent: a pattern that yields no
/// usable anchor degrades to a root attachment (scanned at every offset)
/// instead of failing the build.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompileError {
    /// A state, transition, or match pool reached its configured capacity.
    ArenaOverflow,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArenaOverflow => write!(f, "automaton arena at capacity"),
        }
    }
}

impl std::error::Error for CompileError {}

/// Result of inserting one pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddedPattern {
    /// Registry id assigned to the pattern.
    pub pattern: PatternId,
    /// Shortest anchor token emitted for the pattern, in bytes; 0 when the
    /// pattern attached to the root. The scanner uses the minimum across
    /// all patterns to size its scan-window overlap.
    pub min_token_len: u32,
}

/// One entry of a state's collapsed match list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorMatch {
    /// The pattern whose anchor terminated at (or is suffix-reachable from)
    /// the state.
    pub pattern: PatternId,
    /// Distance from the input cursor back to where the full pattern
    /// begins; where the external verifier is replayed.
    pub backtrack: u32,
}

/// Multi-pattern anchor automaton.
pub struct Automaton {
    states: Pool<State>,
    transitions: Pool<TransitionNode>,
    match_entries: Pool<MatchEntry>,
    patterns: Vec<Pattern>,
    root: StateId,
    linked: bool,
}

impl Automaton {
    /// Creates an empty automaton with default pool limits.
    pub fn new() -> Result<Self, CompileError> {
        Self::with_limits(ArenaLimits::default())
    }

    /// Creates an empty automaton with the given pool limits.
    pub fn with_limits(limits: ArenaLimits) -> Result<Self, CompileError> {
        let mut states = Pool::with_capacity(limits.max_states);
        let root = states
            .alloc(State::new(0))
            .map(StateId)
            .ok_or(CompileError::ArenaOverflow)?;

        Ok(Self {
            states,
            transitions: Pool::with_capacity(limits.max_transitions),
            match_entries: Pool::with_capacity(limits.max_matches),
            patterns: Vec::new(),
            root,
            linked: false,
        })
    }

    /// Returns the root state (depth 0).
    #[inline]
    #[must_use]
    pub fn root(&self) -> StateId {
        self.root
    }

    /// Returns true once failure links have been built.
    #[inline]
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Returns the pattern behind an id issued by this automaton.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different automaton.
    #[must_use]
    pub fn pattern(&self, id: PatternId) -> &Pattern {
        &self.patterns[id.0 as usize]
    }

    /// Returns the number of registered patterns.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Extracts anchor tokens from `pattern` and inserts them into the trie.
    ///
    /// Each token becomes a root-to-terminal path; the terminal state gets a
    /// match entry whose backtrack is `terminal depth + token backtrack`. A
    /// pattern with no usable anchor is attached to the root with backtrack
    /// 0: the scanner will re-verify it at every input offset, which is
    /// slow but never wrong.
    ///
    /// On `ArenaOverflow` the automaton keeps everything inserted so far;
    /// earlier patterns are unaffected, and the registry entry for this
    /// pattern is already present so no match entry dangles.
    pub fn add_pattern(&mut self, pattern: Pattern) -> Result<AddedPattern, CompileError> {
        debug_assert!(!self.linked, "add_pattern after build_failure_links");

        let mut buf = TokenBuf::new();
        tokens::generate(&pattern, &mut buf);

        let id = PatternId(self.patterns.len() as u32);
        self.patterns.push(pattern);

        let mut min_token_len = 0u32;
        let mut anchored = false;

        for token in buf.records() {
            if !anchored {
                anchored = true;
                min_token_len = MAX_TOKEN as u32;
            }
            min_token_len = min_token_len.min(token.bytes.len() as u32);

            let mut current = self.root;
            for &input in token.bytes {
                current = match self.next_state(current, input) {
                    Some(next) => next,
                    None => self.create_state(current, input)?,
                };
            }

            let backtrack = self.states.get(current.0).depth + token.backtrack;
            self.prepend_match(current, id, backtrack)?;
        }

        if !anchored {
            self.prepend_match(self.root, id, 0)?;
        }

        Ok(AddedPattern {
            pattern: id,
            min_token_len,
        })
    }

    /// Builds failure links and collapses match lists.
    ///
    /// Must be called exactly once, after the last `add_pattern`. Performs
    /// no allocation and therefore cannot fail.
    ///
    /// # Panics
    ///
    /// Panics on a second call; re-linking a linked automaton is undefined.
    pub fn build_failure_links(&mut self) {
        assert!(
            !self.linked,
            "build_failure_links must be called exactly once"
        );
        self.linked = true;

        let root = self.root;
        let root_head = self.states.get(root.0).matches;
        let root_tail = root_head.map(|head| self.tail_of(head));

        let mut queue: VecDeque<StateId> = VecDeque::new();
        let mut edges: Vec<(u8, StateId)> = Vec::new();

        edges.extend(self.children(root));
        for &(_, child) in &edges {
            self.states.get_mut(child.0).failure = root;
            queue.push_back(child);
        }

        while let Some(current) = queue.pop_front() {
            // Collapse: root-attached patterns must be visible from every
            // state so the scanner never walks failure chains to find them.
            // A chain already ending inside the root list is left alone,
            // which keeps the shared suffixes acyclic.
            match self.states.get(current.0).matches {
                None => self.states.get_mut(current.0).matches = root_head,
                Some(head) => {
                    let tail = self.tail_of(head);
                    if Some(tail) != root_tail {
                        self.match_entries.get_mut(tail.0).next = root_head;
                    }
                }
            }

            edges.clear();
            edges.extend(self.children(current));
            for &(input, child) in &edges {
                queue.push_back(child);

                // Probe the failure chain with the edge byte that led from
                // `current` to this child.
                let mut failure = self.states.get(current.0).failure;
                loop {
                    if let Some(target) = self.next_state(failure, input) {
                        self.states.get_mut(child.0).failure = target;
                        self.merge_matches(child, target);
                        break;
                    }
                    if failure == root {
                        self.states.get_mut(child.0).failure = root;
                        break;
                    }
                    failure = self.states.get(failure.0).failure;
                }
            }
        }
    }

    /// Single-step transition: the state reached from `state` on `input`,
    /// or `None` when no edge exists.
    ///
    /// Pure and side-effect-free; dense states answer by table lookup,
    /// sparse states by a linear list scan.
    #[must_use]
    pub fn next_state(&self, state: StateId, input: u8) -> Option<StateId> {
        match &self.states.get(state.0).transitions {
            Transitions::Table(table) => table[input as usize],
            Transitions::List(head) => {
                let mut cursor = *head;
                while let Some(id) = cursor {
                    let node = self.transitions.get(id.0);
                    if node.input == input {
                        return Some(node.state);
                    }
                    cursor = node.next;
                }
                None
            }
        }
    }

    /// Scanner step: follows failure links until a transition on `input`
    /// exists or the root is reached.
    ///
    /// Only meaningful once failure links are built.
    #[must_use]
    pub fn step(&self, state: StateId, input: u8) -> StateId {
        debug_assert!(self.linked, "step on an unlinked automaton");

        let mut current = state;
        loop {
            if let Some(next) = self.next_state(current, input) {
                return next;
            }
            if current == self.root {
                return self.root;
            }
            current = self.states.get(current.0).failure;
        }
    }

    /// Iterates the match list of `state`.
    ///
    /// After linking this is the collapsed list: the state's own matches,
    /// failure-reachable matches, and root-attached patterns.
    #[must_use]
    pub fn matches(&self, state: StateId) -> MatchIter<'_> {
        MatchIter {
            pool: &self.match_entries,
            cursor: self.states.get(state.0).matches,
        }
    }

    /// Returns the depth of a state.
    #[must_use]
    pub fn depth(&self, state: StateId) -> u32 {
        self.states.get(state.0).depth
    }

    /// Returns the failure target of a state.
    ///
    /// Before linking every state reports the root.
    #[must_use]
    pub fn failure(&self, state: StateId) -> StateId {
        self.states.get(state.0).failure
    }

    /// Writes a depth-first diagnostic dump of the automaton: one line per
    /// state with its depth, failure target, and `identifier:backtrack`
    /// match summaries.
    pub fn dump<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "{:-<56}", "")?;
        self.dump_state(self.root, out)?;
        writeln!(out, "{:-<56}", "")
    }

    fn dump_state<W: fmt::Write>(&self, state: StateId, out: &mut W) -> fmt::Result {
        let s = self.states.get(state.0);
        for _ in 0..s.depth {
            write!(out, " ")?;
        }
        write!(out, "s{} ({}) -> s{}", state.0, s.depth, s.failure.0)?;
        for m in self.matches(state) {
            write!(
                out,
                " {}:{}",
                self.patterns[m.pattern.0 as usize].identifier, m.backtrack
            )?;
        }
        writeln!(out)?;

        for (_, child) in self.children(state) {
            self.dump_state(child, out)?;
        }
        Ok(())
    }

    /// Compiled-automaton statistics for tuning and diagnostics.
    #[cfg(feature = "stats")]
    #[must_use]
    pub fn stats(&self) -> AutomatonStats {
        let mut stats = AutomatonStats {
            patterns: self.patterns.len(),
            states: self.states.len() as usize,
            transition_nodes: self.transitions.len() as usize,
            match_entries: self.match_entries.len() as usize,
            ..AutomatonStats::default()
        };
        for state in self.states.iter() {
            match state.transitions {
                Transitions::Table(_) => stats.dense_states += 1,
                Transitions::List(_) => stats.sparse_states += 1,
            }
            stats.max_depth = stats.max_depth.max(state.depth);
        }
        stats
    }

    fn children(&self, state: StateId) -> ChildIter<'_> {
        ChildIter::new(self.states.get(state.0), &self.transitions)
    }

    /// Allocates a child of `parent` reached on `input`, in the shape
    /// appropriate for its depth, and links it from the parent.
    fn create_state(&mut self, parent: StateId, input: u8) -> Result<StateId, CompileError> {
        let depth = self.states.get(parent.0).depth + 1;
        let child = self
            .states
            .alloc(State::new(depth))
            .map(StateId)
            .ok_or(CompileError::ArenaOverflow)?;

        match &self.states.get(parent.0).transitions {
            Transitions::Table(_) => {
                if let Transitions::Table(table) = &mut self.states.get_mut(parent.0).transitions {
                    table[input as usize] = Some(child);
                }
            }
            Transitions::List(head) => {
                let head = *head;
                let node = self
                    .transitions
                    .alloc(TransitionNode {
                        input,
                        state: child,
                        next: head,
                    })
                    .map(TransitionId)
                    .ok_or(CompileError::ArenaOverflow)?;
                if let Transitions::List(slot) = &mut self.states.get_mut(parent.0).transitions {
                    *slot = Some(node);
                }
            }
        }

        Ok(child)
    }

    /// Prepends a match entry to a state's list.
    fn prepend_match(
        &mut self,
        state: StateId,
        pattern: PatternId,
        backtrack: u32,
    ) -> Result<(), CompileError> {
        let head = self.states.get(state.0).matches;
        let entry = self
            .match_entries
            .alloc(MatchEntry {
                pattern,
                backtrack,
                next: head,
            })
            .map(MatchId)
            .ok_or(CompileError::ArenaOverflow)?;
        self.states.get_mut(state.0).matches = Some(entry);
        Ok(())
    }

    /// Appends `target`'s match list to `child`'s.
    ///
    /// At this point `child`'s list holds only its own insertion-time
    /// entries, so the append point is always an entry `child` owns.
    fn merge_matches(&mut self, child: StateId, target: StateId) {
        let target_head = self.states.get(target.0).matches;
        match self.states.get(child.0).matches {
            None => self.states.get_mut(child.0).matches = target_head,
            Some(head) => {
                if target_head.is_some() {
                    let tail = self.tail_of(head);
                    self.match_entries.get_mut(tail.0).next = target_head;
                }
            }
        }
    }

    fn tail_of(&self, head: MatchId) -> MatchId {
        let mut cursor = head;
        while let Some(next) = self.match_entries.get(cursor.0).next {
            cursor = next;
        }
        cursor
    }
}

/// Iterator over a state's match list.
pub struct MatchIter<'a> {
    pool: &'a Pool<MatchEntry>,
    cursor: Option<MatchId>,
}

impl Iterator for MatchIter<'_> {
    type Item = AnchorMatch;

    fn next(&mut self) -> Option<AnchorMatch> {
        let id = self.cursor?;
        let entry = self.pool.get(id.0);
        self.cursor = entry.next;
        Some(AnchorMatch {
            pattern: entry.pattern,
            backtrack: entry.backtrack,
        })
    }
}

/// Compiled-automaton statistics, behind the `stats` feature.
#[cfg(feature = "stats")]
#[derive(Clone, Copy, Debug, Default)]
pub struct AutomatonStats {
    pub patterns: usize,
    pub states: usize,
    pub dense_states: usize,
    pub sparse_states: usize,
    pub transition_nodes: usize,
    pub match_entries: usize,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{PatternFlags, MASK_END};

    fn ascii(identifier: &str, bytes: &[u8]) -> Pattern {
        Pattern::text(identifier, bytes.to_vec(), PatternFlags::ASCII)
    }

    fn match_set(automaton: &Automaton, state: StateId) -> Vec<(String, u32)> {
        automaton
            .matches(state)
            .map(|m| {
                (
                    automaton.pattern(m.pattern).identifier.clone(),
                    m.backtrack,
                )
            })
            .collect()
    }

    /// Walks `input` from the root through plain transitions, panicking on
    /// a missing edge.
    fn walk(automaton: &Automaton, input: &[u8]) -> StateId {
        let mut state = automaton.root();
        for &b in input {
            state = automaton
                .next_state(state, b)
                .unwrap_or_else(|| panic!("missing edge on {b:#x}"));
        }
        state
    }

    #[test]
    fn ascii_literal_builds_trie_path() {
        let mut automaton = Automaton::new().unwrap();
        let added = automaton.add_pattern(ascii("abc", b"abc")).unwrap();
        assert_eq!(added.min_token_len, 3);

        let terminal = walk(&automaton, b"abc");
        assert_eq!(automaton.depth(terminal), 3);
        assert_eq!(match_set(&automaton, terminal), vec![("abc".into(), 3)]);

        // No other first byte leaves the root.
        for b in 0..=255u8 {
            if b != b'a' {
                assert_eq!(automaton.next_state(automaton.root(), b), None);
            }
        }
    }

    #[test]
    fn state_shapes_switch_at_depth_two() {
        let mut automaton = Automaton::new().unwrap();
        automaton.add_pattern(ascii("abcd", b"abcd")).unwrap();

        let d1 = walk(&automaton, b"a");
        let d2 = walk(&automaton, b"ab");
        assert!(matches!(
            automaton.states.get(d1.0).transitions,
            Transitions::Table(_)
        ));
        assert!(matches!(
            automaton.states.get(d2.0).transitions,
            Transitions::List(_)
        ));

        // Sparse states still transition correctly.
        assert_eq!(automaton.next_state(d2, b'c'), Some(walk(&automaton, b"abc")));
        assert_eq!(automaton.next_state(d2, b'x'), None);
    }

    #[test]
    fn shared_prefixes_share_states() {
        let mut automaton = Automaton::new().unwrap();
        automaton.add_pattern(ascii("p1", b"abcd")).unwrap();
        automaton.add_pattern(ascii("p2", b"abxy")).unwrap();

        // a and ab are shared; 4 + (2 + 2) unique non-root states.
        assert_eq!(automaton.states.len(), 7);
    }

    #[test]
    fn duplicate_pattern_keeps_both_descriptors() {
        let mut automaton = Automaton::new().unwrap();
        automaton.add_pattern(ascii("dup", b"ab")).unwrap();
        automaton.add_pattern(ascii("dup", b"ab")).unwrap();

        let terminal = walk(&automaton, b"ab");
        let entries = match_set(&automaton, terminal);
        assert_eq!(entries, vec![("dup".into(), 2), ("dup".into(), 2)]);
    }

    #[test]
    fn unanchorable_pattern_attaches_to_root() {
        let mut automaton = Automaton::new().unwrap();
        let added = automaton
            .add_pattern(Pattern::hex(
                "wild",
                vec![0x00, 0x00],
                vec![0x00, 0x00, MASK_END],
            ))
            .unwrap();

        assert_eq!(added.min_token_len, 0);
        assert_eq!(match_set(&automaton, automaton.root()), vec![("wild".into(), 0)]);
    }

    #[test]
    fn min_token_len_reports_shortest_token() {
        let mut automaton = Automaton::new().unwrap();
        let added = automaton
            .add_pattern(Pattern::regex(
                "alt",
                b"(foo|bar)".to_vec(),
                PatternFlags::empty(),
            ))
            .unwrap();
        // Fallback emits single-byte first-byte tokens.
        assert_eq!(added.min_token_len, 1);
    }

    #[test]
    fn failure_links_point_to_longest_proper_suffix() {
        let mut automaton = Automaton::new().unwrap();
        automaton.add_pattern(ascii("abc", b"abc")).unwrap();
        automaton.add_pattern(ascii("bc", b"bc")).unwrap();
        automaton.build_failure_links();

        let root = automaton.root();
        assert_eq!(automaton.failure(root), root);

        let a = walk(&automaton, b"a");
        let ab = walk(&automaton, b"ab");
        let abc = walk(&automaton, b"abc");
        let b = walk(&automaton, b"b");
        let bc = walk(&automaton, b"bc");

        assert_eq!(automaton.failure(a), root);
        assert_eq!(automaton.failure(b), root);
        assert_eq!(automaton.failure(ab), b);
        assert_eq!(automaton.failure(abc), bc);
    }

    #[test]
    fn collapsed_lists_include_suffix_matches() {
        let mut automaton = Automaton::new().unwrap();
        automaton.add_pattern(ascii("abc", b"abc")).unwrap();
        automaton.add_pattern(ascii("bc", b"bc")).unwrap();
        automaton.build_failure_links();

        let abc = walk(&automaton, b"abc");
        let entries = match_set(&automaton, abc);
        assert_eq!(entries, vec![("abc".into(), 3), ("bc".into(), 2)]);
    }

    #[test]
    fn collapsed_lists_include_root_matches_everywhere() {
        let mut automaton = Automaton::new().unwrap();
        automaton.add_pattern(ascii("ab", b"ab")).unwrap();
        automaton
            .add_pattern(Pattern::hex(
                "wild",
                vec![0x00],
                vec![0x00, MASK_END],
            ))
            .unwrap();
        automaton.build_failure_links();

        let a = walk(&automaton, b"a");
        let ab = walk(&automaton, b"ab");

        // Interior state: empty own list borrows the root's.
        assert_eq!(match_set(&automaton, a), vec![("wild".into(), 0)]);
        // Terminal state: own list chains the root's on the end.
        assert_eq!(
            match_set(&automaton, ab),
            vec![("ab".into(), 2), ("wild".into(), 0)]
        );
    }

    #[test]
    fn collapse_does_not_duplicate_root_chain() {
        // `abc` inherits `bc`'s list via its failure target; `bc`'s list
        // already ends in the root chain, so the collapse of `abc` must not
        // append it again.
        let mut automaton = Automaton::new().unwrap();
        automaton.add_pattern(ascii("abc", b"abc")).unwrap();
        automaton.add_pattern(ascii("bc", b"bc")).unwrap();
        automaton
            .add_pattern(Pattern::hex("wild", vec![0x00], vec![0x00, MASK_END]))
            .unwrap();
        automaton.build_failure_links();

        let abc = walk(&automaton, b"abc");
        assert_eq!(
            match_set(&automaton, abc),
            vec![("abc".into(), 3), ("bc".into(), 2), ("wild".into(), 0)]
        );
    }

    #[test]
    fn linking_flag_reported() {
        let mut automaton = Automaton::new().unwrap();
        automaton.add_pattern(ascii("a", b"a")).unwrap();
        assert!(!automaton.is_linked());
        automaton.build_failure_links();
        assert!(automaton.is_linked());
    }

    #[test]
    #[should_panic(expected = "exactly once")]
    fn relinking_panics() {
        let mut automaton = Automaton::new().unwrap();
        automaton.add_pattern(ascii("a", b"a")).unwrap();
        automaton.build_failure_links();
        automaton.build_failure_links();
    }

    #[test]
    fn step_follows_failure_chain() {
        let mut automaton = Automaton::new().unwrap();
        automaton.add_pattern(ascii("abab", b"abab")).unwrap();
        automaton.build_failure_links();

        let mut state = automaton.root();
        for &b in b"ababab" {
            state = automaton.step(state, b);
        }
        // After the overlapping repeat the automaton sits on the terminal
        // again, via the `abab` -> `ab` failure link.
        assert_eq!(state, walk(&automaton, b"abab"));

        // A byte with no edge anywhere lands back on the root.
        assert_eq!(automaton.step(state, b'z'), automaton.root());
    }

    #[test]
    fn arena_overflow_surfaces_and_leaves_earlier_patterns_intact() {
        let mut automaton = Automaton::with_limits(ArenaLimits {
            max_states: 4,
            max_transitions: 16,
            max_matches: 16,
        })
        .unwrap();

        automaton.add_pattern(ascii("abc", b"abc")).unwrap();
        let err = automaton.add_pattern(ascii("xyz", b"xyz")).unwrap_err();
        assert_eq!(err, CompileError::ArenaOverflow);

        // The first pattern's path is untouched.
        let terminal = walk(&automaton, b"abc");
        assert_eq!(match_set(&automaton, terminal), vec![("abc".into(), 3)]);
    }

    #[test]
    fn dump_lists_states_and_matches() {
        let mut automaton = Automaton::new().unwrap();
        automaton.add_pattern(ascii("ab", b"ab")).unwrap();
        automaton.build_failure_links();

        let mut out = String::new();
        automaton.dump(&mut out).unwrap();
        assert!(out.contains("s0 (0) -> s0"));
        assert!(out.contains("ab:2"));
    }

    #[cfg(feature = "stats")]
    #[test]
    fn stats_counts_shapes() {
        let mut automaton = Automaton::new().unwrap();
        automaton.add_pattern(ascii("abcd", b"abcd")).unwrap();
        automaton.build_failure_links();

        let stats = automaton.stats();
        assert_eq!(stats.states, 5);
        assert_eq!(stats.dense_states, 2); // root + depth 1
        assert_eq!(stats.sparse_states, 3);
        assert_eq!(stats.max_depth, 4);
        assert_eq!(stats.patterns, 1);
    }
}

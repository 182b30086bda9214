//! Property-based invariant checks for the automaton.
//!
//! Patterns are drawn from a tiny alphabet with lengths at most `MAX_TOKEN`,
//! so every pattern is its own anchor token and a naive suffix oracle can
//! predict the collapsed match lists exactly.
//!
//! Run with: `cargo test --test automaton_properties`

use proptest::prelude::*;
use sigmatch_rs::{Automaton, Pattern, PatternFlags, StateId};
use std::collections::{HashSet, VecDeque};

const ALPHABET: &[u8] = b"abcd";

fn pattern_bytes() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        proptest::sample::select(ALPHABET.to_vec()),
        1..=sigmatch_rs::MAX_TOKEN,
    )
}

fn pattern_sets() -> impl Strategy<Value = Vec<Vec<u8>>> {
    proptest::collection::vec(pattern_bytes(), 1..12)
}

fn build(patterns: &[Vec<u8>]) -> Automaton {
    let mut automaton = Automaton::new().unwrap();
    for (i, bytes) in patterns.iter().enumerate() {
        automaton
            .add_pattern(Pattern::text(
                format!("p{i}"),
                bytes.clone(),
                PatternFlags::ASCII,
            ))
            .unwrap();
    }
    automaton.build_failure_links();
    automaton
}

/// Enumerates every reachable state with its (unique) trie path.
fn enumerate_states(automaton: &Automaton) -> Vec<(StateId, Vec<u8>)> {
    let mut out = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back((automaton.root(), Vec::new()));

    while let Some((state, path)) = queue.pop_front() {
        for b in 0..=255u8 {
            if let Some(child) = automaton.next_state(state, b) {
                let mut child_path = path.clone();
                child_path.push(b);
                queue.push_back((child, child_path));
            }
        }
        out.push((state, path));
    }
    out
}

fn match_pattern_set(automaton: &Automaton, state: StateId) -> HashSet<u32> {
    automaton.matches(state).map(|m| m.pattern.index()).collect()
}

proptest! {
    /// Failure links always target a strictly shallower state; the root
    /// points to itself.
    #[test]
    fn failure_depth_strictly_decreases(patterns in pattern_sets()) {
        let automaton = build(&patterns);
        let root = automaton.root();
        prop_assert_eq!(automaton.failure(root), root);

        for (state, _) in enumerate_states(&automaton) {
            if state != root {
                prop_assert!(
                    automaton.depth(automaton.failure(state)) < automaton.depth(state)
                );
            }
        }
    }

    /// The failure link targets the state of the longest proper suffix of
    /// the state's path that exists in the trie.
    #[test]
    fn failure_targets_longest_proper_suffix(patterns in pattern_sets()) {
        let automaton = build(&patterns);
        let states = enumerate_states(&automaton);

        for (state, path) in &states {
            if *state == automaton.root() {
                continue;
            }
            let expected = (1..=path.len())
                .map(|skip| &path[skip..])
                .find_map(|suffix| {
                    let mut s = automaton.root();
                    for &b in suffix {
                        s = automaton.next_state(s, b)?;
                    }
                    Some(s)
                })
                .unwrap_or(automaton.root());
            prop_assert_eq!(automaton.failure(*state), expected);
        }
    }

    /// After linking, the match list at the state reached by `w` names
    /// exactly the patterns whose token is a suffix of `w`.
    #[test]
    fn collapsed_lists_equal_suffix_oracle(patterns in pattern_sets()) {
        let automaton = build(&patterns);

        for (state, path) in enumerate_states(&automaton) {
            let expected: HashSet<u32> = patterns
                .iter()
                .enumerate()
                .filter(|(_, p)| path.ends_with(p))
                .map(|(i, _)| i as u32)
                .collect();
            prop_assert_eq!(match_pattern_set(&automaton, state), expected);
        }
    }

    /// An un-anchorable pattern shows up in every state's collapsed list.
    #[test]
    fn root_attached_pattern_is_visible_everywhere(patterns in pattern_sets()) {
        let mut automaton = Automaton::new().unwrap();
        for (i, bytes) in patterns.iter().enumerate() {
            automaton
                .add_pattern(Pattern::text(format!("p{i}"), bytes.clone(), PatternFlags::ASCII))
                .unwrap();
        }
        let wild = automaton
            .add_pattern(Pattern::regex("wild", b".*".to_vec(), PatternFlags::empty()))
            .unwrap();
        prop_assert_eq!(wild.min_token_len, 0);
        automaton.build_failure_links();

        for (state, path) in enumerate_states(&automaton) {
            let set = match_pattern_set(&automaton, state);
            prop_assert!(set.contains(&wild.pattern.index()), "missing at {path:?}");
        }
    }

    /// For whole-pattern tokens every match entry's backtrack is exactly
    /// the pattern length.
    #[test]
    fn backtrack_equals_token_length_for_literal_patterns(patterns in pattern_sets()) {
        let automaton = build(&patterns);

        for (state, _) in enumerate_states(&automaton) {
            for m in automaton.matches(state) {
                let len = automaton.pattern(m.pattern).bytes.len() as u32;
                prop_assert_eq!(m.backtrack, len);
            }
        }
    }

    /// `next_state` answers the same transition the same way every time.
    #[test]
    fn next_state_is_deterministic(patterns in pattern_sets()) {
        let automaton = build(&patterns);

        for (state, _) in enumerate_states(&automaton) {
            for b in 0..=255u8 {
                prop_assert_eq!(
                    automaton.next_state(state, b),
                    automaton.next_state(state, b)
                );
            }
        }
    }

    /// Scanning with the failure-fallback step finds exactly the literal
    /// occurrences a naive substring search finds.
    #[test]
    fn scan_agrees_with_naive_substring_search(
        patterns in pattern_sets(),
        haystack in proptest::collection::vec(proptest::sample::select(ALPHABET.to_vec()), 0..64),
    ) {
        let automaton = build(&patterns);

        let mut found: HashSet<(u32, usize)> = HashSet::new();
        let mut state = automaton.root();
        for (i, &b) in haystack.iter().enumerate() {
            state = automaton.step(state, b);
            let cursor = i + 1;
            for m in automaton.matches(state) {
                prop_assert!(cursor >= m.backtrack as usize);
                found.insert((m.pattern.index(), cursor - m.backtrack as usize));
            }
        }

        let mut expected: HashSet<(u32, usize)> = HashSet::new();
        for (i, pattern) in patterns.iter().enumerate() {
            for start in 0..haystack.len().saturating_sub(pattern.len() - 1) {
                if haystack[start..].starts_with(pattern) {
                    expected.insert((i as u32, start));
                }
            }
        }

        prop_assert_eq!(found, expected);
    }

    /// Inserting the same pattern twice yields two descriptors on the same
    /// terminal state, and both fire.
    #[test]
    fn duplicate_patterns_both_fire(bytes in pattern_bytes()) {
        let mut automaton = Automaton::new().unwrap();
        automaton
            .add_pattern(Pattern::text("first", bytes.clone(), PatternFlags::ASCII))
            .unwrap();
        automaton
            .add_pattern(Pattern::text("second", bytes.clone(), PatternFlags::ASCII))
            .unwrap();
        automaton.build_failure_links();

        let mut state = automaton.root();
        for &b in &bytes {
            state = automaton.step(state, b);
        }
        let ids: Vec<u32> = automaton.matches(state).map(|m| m.pattern.index()).collect();
        prop_assert_eq!(ids, vec![1, 0]);
    }
}

//! Hybrid automaton states.
//!
//! Two physical shapes share one logical header (depth, failure link, match
//! list head). States at depth 0 and 1 carry a dense 256-slot transition
//! table: near the root the fan-out is high (any first byte is possible
//! across the whole pattern set) and the O(1) lookup matters. Deeper states
//! carry a singly linked transition list: fan-out collapses to a handful of
//! children and the list saves 256 slots per node.
//!
//! # Invariants
//! - `depth <= MAX_TABLE_BASED_STATES_DEPTH` iff the state is table-based.
//! - Transition list nodes are prepended; order carries no meaning.
//! - `failure` of the root is the root itself; every other state's failure
//!   points to a strictly shallower state once links are built.

use crate::arena::Pool;
use crate::pattern::PatternId;

/// Depth up to which states use a dense transition table.
pub const MAX_TABLE_BASED_STATES_DEPTH: u32 = 1;

/// Opaque state handle into the automaton's state pool.
///
/// Only meaningful for the automaton that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) u32);

impl StateId {
    /// Returns the raw pool index.
    #[inline]
    #[must_use]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Handle to a transition list node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TransitionId(pub(crate) u32);

/// Handle to a match entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MatchId(pub(crate) u32);

/// Outgoing transitions, in the shape appropriate for the state's depth.
pub(crate) enum Transitions {
    /// Dense: slot per input byte.
    Table(Box<[Option<StateId>; 256]>),
    /// Sparse: head of a linked list of [`TransitionNode`]s.
    List(Option<TransitionId>),
}

/// One automaton state.
pub(crate) struct State {
    pub depth: u32,
    pub failure: StateId,
    pub matches: Option<MatchId>,
    pub transitions: Transitions,
}

impl State {
    /// Creates an empty state of the shape dictated by `depth`, with the
    /// failure link parked on the root.
    pub fn new(depth: u32) -> Self {
        let transitions = if depth <= MAX_TABLE_BASED_STATES_DEPTH {
            Transitions::Table(Box::new([None; 256]))
        } else {
            Transitions::List(None)
        };
        Self {
            depth,
            failure: StateId(0),
            matches: None,
            transitions,
        }
    }
}

/// Sparse transition list node: `(input byte, target state)` plus list link.
pub(crate) struct TransitionNode {
    pub input: u8,
    pub state: StateId,
    pub next: Option<TransitionId>,
}

/// Match descriptor attached to the state where an anchor token terminates.
///
/// `backtrack` is the distance from the input cursor (after the token's
/// last byte) back to where the full pattern begins.
pub(crate) struct MatchEntry {
    pub pattern: PatternId,
    pub backtrack: u32,
    pub next: Option<MatchId>,
}

/// Iterator over a state's `(input byte, child)` edges, hiding the dense /
/// sparse representation difference.
pub(crate) enum ChildIter<'a> {
    Table {
        slots: &'a [Option<StateId>; 256],
        next: usize,
    },
    List {
        pool: &'a Pool<TransitionNode>,
        cursor: Option<TransitionId>,
    },
}

impl<'a> ChildIter<'a> {
    pub fn new(state: &'a State, pool: &'a Pool<TransitionNode>) -> Self {
        match &state.transitions {
            Transitions::Table(slots) => Self::Table {
                slots: &**slots,
                next: 0,
            },
            Transitions::List(head) => Self::List {
                pool,
                cursor: *head,
            },
        }
    }
}

impl Iterator for ChildIter<'_> {
    type Item = (u8, StateId);

    fn next(&mut self) -> Option<(u8, StateId)> {
        match self {
            Self::Table { slots, next } => {
                while *next < 256 {
                    let idx = *next;
                    *next += 1;
                    if let Some(child) = slots[idx] {
                        return Some((idx as u8, child));
                    }
                }
                None
            }
            Self::List { pool, cursor } => {
                let id = (*cursor)?;
                let node = pool.get(id.0);
                *cursor = node.next;
                Some((node.input, node.state))
            }
        }
    }
}

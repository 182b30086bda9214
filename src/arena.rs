//! Capacity-bounded index pools backing the automaton.
//!
//! States, transition nodes, and match entries are all allocated from pools
//! and addressed by `u32` handles instead of pointers. Handles survive pool
//! growth (the backing `Vec` may reallocate, handles are indices), so the
//! relocation fix-up protocol a pointer-based arena would need simply does
//! not exist here.
//!
//! # Design
//! - Append-only: entries are never removed, so handles remain valid for the
//!   pool's lifetime.
//! - `capacity` is a hard limit; `alloc` reports exhaustion instead of
//!   growing past it.
//! - No deduplication; callers own whatever sharing structure they build on
//!   top of the handles.
//!
//! # Complexity
//! - `alloc` is amortized `O(1)`.
//! - `get`/`get_mut` are `O(1)`.

/// Append-only storage with `u32` handles and a hard capacity.
///
/// # Invariants
/// - Entry count never exceeds `capacity`.
/// - A handle returned by `alloc` is valid for the pool's lifetime.
pub struct Pool<T> {
    items: Vec<T>,
    capacity: u32,
}

impl<T> Pool<T> {
    /// Maximum number of entries reserved eagerly.
    const PREALLOC_MAX_ITEMS: u32 = 4096;

    /// Creates a pool with the given maximum entry count.
    ///
    /// The eager reservation is capped so large limits do not translate into
    /// large upfront allocations.
    #[must_use]
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            items: Vec::with_capacity(capacity.min(Self::PREALLOC_MAX_ITEMS) as usize),
            capacity,
        }
    }

    /// Appends an entry, returning its handle.
    ///
    /// Returns `None` when the pool is at capacity.
    pub fn alloc(&mut self, value: T) -> Option<u32> {
        let idx = self.items.len() as u32;
        if idx >= self.capacity {
            return None;
        }
        self.items.push(value);
        Some(idx)
    }

    /// Returns the entry for a handle.
    ///
    /// # Panics
    ///
    /// Panics if `idx` was not returned by this pool's `alloc`.
    #[inline]
    #[must_use]
    pub fn get(&self, idx: u32) -> &T {
        &self.items[idx as usize]
    }

    /// Returns the entry for a handle, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `idx` was not returned by this pool's `alloc`.
    #[inline]
    pub fn get_mut(&mut self, idx: u32) -> &mut T {
        &mut self.items[idx as usize]
    }

    /// Returns the number of allocated entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> u32 {
        self.items.len() as u32
    }

    /// Returns true if nothing has been allocated.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns remaining capacity in entries.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.items.len() as u32)
    }

    /// Returns the maximum entry count.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Iterates over all allocated entries.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

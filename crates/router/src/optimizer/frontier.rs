//! Best-first frontier with out-of-order removal.
//!
//! Entries live in an insertion-ordered map; the heap only holds
//! `(priority, handle)` keys. Removing an entry leaves its key behind as a
//! tombstone that [`Frontier::pop`] skips.
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use mim_core::Ticks;

/// Stable identifier of a frontier entry.
pub(crate) type Handle = u64;

#[derive(Debug)]
pub(crate) struct Frontier<T> {
    heap: BinaryHeap<Reverse<(Ticks, Handle)>>,
    live: BTreeMap<Handle, T>,
    next_handle: Handle,
    stale_skips: u64,
}

impl<T> Frontier<T> {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: BTreeMap::new(),
            next_handle: 0,
            stale_skips: 0,
        }
    }

    /// Inserts `item`. Equal priorities pop in insertion order.
    pub(crate) fn push(&mut self, priority: Ticks, item: T) -> Handle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.heap.push(Reverse((priority, handle)));
        self.live.insert(handle, item);
        handle
    }

    /// Removes and returns the entry with the lowest priority.
    pub(crate) fn pop(&mut self) -> Option<(Handle, T)> {
        while let Some(Reverse((_, handle))) = self.heap.pop() {
            match self.live.remove(&handle) {
                Some(item) => return Some((handle, item)),
                None => self.stale_skips += 1,
            }
        }
        None
    }

    /// Removes an entry regardless of its priority. `None` if it already left.
    pub(crate) fn remove(&mut self, handle: Handle) -> Option<T> {
        self.live.remove(&handle)
    }

    /// Live entries in insertion order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.live.iter().map(|(handle, item)| (*handle, item))
    }

    pub(crate) fn len(&self) -> usize {
        self.live.len()
    }

    /// Tombstones skipped by [`Frontier::pop`] so far.
    pub(crate) fn stale_skips(&self) -> u64 {
        self.stale_skips
    }
}

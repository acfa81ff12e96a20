//! Binary min-heap of [`NodeId`]s with arbitrary removal.
//!
//! Entries are ordered by `(key, insertion sequence)`: the lowest key comes
//! out first and equal keys come out in insertion order. A position index
//! keyed by node handle makes [`contains`](IndexedHeap::contains) O(1) and
//! [`remove`](IndexedHeap::remove) O(log n).

use crate::node::NodeId;

const ABSENT: usize = usize::MAX;

#[derive(Clone, Copy, Debug)]
struct Entry {
    id: NodeId,
    key: i32,
    seq: u64,
}

/// Min-heap of node handles keyed by total cost.
#[derive(Default)]
pub struct IndexedHeap {
    entries: Vec<Entry>,
    /// Heap slot of each node handle, or `ABSENT`.
    positions: Vec<usize>,
    seq: u64,
}

impl IndexedHeap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is currently queued.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// The key `id` is queued with, if any.
    #[inline]
    pub fn key_of(&self, id: NodeId) -> Option<i32> {
        self.slot(id).map(|i| self.entries[i].key)
    }

    /// Queue `id` at priority `key`.
    ///
    /// `id` must not already be queued; remove it first to change its key.
    pub fn push(&mut self, id: NodeId, key: i32) {
        debug_assert!(!self.contains(id), "node {id:?} pushed twice");
        if id.0 >= self.positions.len() {
            self.positions.resize(id.0 + 1, ABSENT);
        }
        let seq = self.seq;
        self.seq += 1;
        let at = self.entries.len();
        self.entries.push(Entry { id, key, seq });
        self.positions[id.0] = at;
        self.sift_up(at);
    }

    /// The lowest-key entry without removing it.
    #[inline]
    pub fn peek_min(&self) -> Option<(NodeId, i32)> {
        self.entries.first().map(|e| (e.id, e.key))
    }

    /// Remove and return the lowest-key node.
    ///
    /// Callers are expected to check [`len`](Self::len) first; an empty heap
    /// yields `None`.
    pub fn pop_min(&mut self) -> Option<NodeId> {
        if self.entries.is_empty() {
            return None;
        }
        let id = self.entries[0].id;
        self.remove_at(0);
        Some(id)
    }

    /// Remove `id` wherever it sits in the heap. Returns whether it was queued.
    pub fn remove(&mut self, id: NodeId) -> bool {
        match self.slot(id) {
            Some(i) => {
                self.remove_at(i);
                true
            }
            None => false,
        }
    }

    /// Empty the heap, keeping its allocations.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
        self.seq = 0;
    }

    #[inline]
    fn slot(&self, id: NodeId) -> Option<usize> {
        match self.positions.get(id.0) {
            Some(&i) if i != ABSENT => Some(i),
            _ => None,
        }
    }

    fn remove_at(&mut self, i: usize) {
        let last = self.entries.len() - 1;
        self.swap(i, last);
        if let Some(removed) = self.entries.pop() {
            self.positions[removed.id.0] = ABSENT;
        }
        if i < self.entries.len() {
            // The moved-in entry may belong above or below slot `i`.
            self.sift_down(i);
            self.sift_up(i);
        }
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        let (x, y) = (&self.entries[a], &self.entries[b]);
        (x.key, x.seq) < (y.key, y.seq)
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        self.positions[self.entries[a].id.0] = a;
        self.positions[self.entries[b].id.0] = b;
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.less(i, parent) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }
}

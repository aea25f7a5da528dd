//! Append-only, FIFO-evicting history buffer.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Ordered buffer that keeps at most `capacity` items, evicting the oldest
/// first. Items are never re-sorted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append one item, returning how many were evicted.
    pub fn push(&mut self, item: T) -> usize {
        self.items.push_back(item);
        self.evict()
    }

    /// Append items in order, returning how many were evicted.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize {
        self.items.extend(items);
        self.evict()
    }

    fn evict(&mut self) -> usize {
        let overflow = self.items.len().saturating_sub(self.capacity);
        self.items.drain(..overflow);
        overflow
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    /// The most recent `n` items, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &T> {
        let start = self.items.len().saturating_sub(n);
        self.items.range(start..)
    }

    /// Items in `[start, end)` by position.
    pub fn range(&self, start: usize, end: usize) -> impl Iterator<Item = &T> {
        let end = end.min(self.items.len());
        let start = start.min(end);
        self.items.range(start..end)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Clone> BoundedHistory<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

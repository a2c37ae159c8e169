//! Bounded most-recent-first buffer.
//!
//! Backs both the overlay box list and the event log:
//! - Insertion is always at the head
//! - Length never exceeds the configured capacity
//! - The oldest entry is evicted first

use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct RecentBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RecentBuffer<T> {
    /// A zero capacity is raised to one so the newest entry is always retained.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push to the head, evicting from the tail when full.
    ///
    /// Returns the evicted entry, if any.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() >= self.capacity {
            self.items.pop_back()
        } else {
            None
        };
        self.items.push_front(item);
        evicted
    }

    /// Newest entry.
    pub fn latest(&self) -> Option<&T> {
        self.items.front()
    }

    /// Entries newest-first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enforces_capacity_newest_first() {
        let mut buf = RecentBuffer::new(5);
        for i in 0..12 {
            buf.push(i);
        }
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.to_vec(), vec![11, 10, 9, 8, 7]);
        assert_eq!(buf.latest(), Some(&11));
    }

    #[test]
    fn push_reports_eviction() {
        let mut buf = RecentBuffer::new(2);
        assert_eq!(buf.push('a'), None);
        assert_eq!(buf.push('b'), None);
        assert_eq!(buf.push('c'), Some('a'));
    }

    #[test]
    fn zero_capacity_keeps_latest() {
        let mut buf = RecentBuffer::new(0);
        buf.push(1);
        buf.push(2);
        assert_eq!(buf.capacity(), 1);
        assert_eq!(buf.to_vec(), vec![2]);
    }
}

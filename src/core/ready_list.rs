//! Ready list: pending task ids ordered by priority, FIFO within a priority.

use std::collections::VecDeque;

use crate::util::serde::{Priority, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    id: TaskId,
    priority: Priority,
}

/// Ordered backlog of task ids eligible for dispatch.
///
/// Insertion scans from the front and places the id immediately before the
/// first entry with a numerically greater priority, so equal priorities keep
/// their enqueue order. Insertion is O(n); popping the front is O(1).
#[derive(Debug, Default)]
pub struct ReadyList {
    entries: VecDeque<Entry>,
}

impl ReadyList {
    /// Create an empty ready list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task id at its stable priority position.
    pub fn insert(&mut self, id: TaskId, priority: Priority) {
        let entry = Entry { id, priority };
        match self.entries.iter().position(|e| e.priority > priority) {
            Some(idx) => self.entries.insert(idx, entry),
            None => self.entries.push_back(entry),
        }
    }

    /// Remove and return the id at the front.
    pub fn pop_front(&mut self) -> Option<TaskId> {
        self.entries.pop_front().map(|e| e.id)
    }

    /// Keep only the ids for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(TaskId) -> bool) {
        self.entries.retain(|e| keep(e.id));
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Ids in dispatch order.
    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    /// Number of queued ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(v: i64) -> Priority {
        Priority::new(v).unwrap()
    }

    #[test]
    fn test_priority_ordering() {
        let mut list = ReadyList::new();

        list.insert(1, p(5));
        list.insert(2, p(1));
        list.insert(3, p(3));
        list.insert(4, p(2));

        assert_eq!(list.ids().collect::<Vec<_>>(), vec![2, 4, 3, 1]);
    }

    #[test]
    fn test_fifo_within_priority() {
        let mut list = ReadyList::new();

        list.insert(1, p(3));
        list.insert(2, p(3));
        list.insert(3, p(1));
        list.insert(4, p(3));

        assert_eq!(list.pop_front(), Some(3));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_front(), Some(2));
        assert_eq!(list.pop_front(), Some(4));
        assert_eq!(list.pop_front(), None);
    }

    #[test]
    fn test_reinsert_goes_behind_equal_priority() {
        let mut list = ReadyList::new();
        list.insert(1, p(2));
        list.insert(2, p(2));
        let head = list.pop_front().unwrap();

        // a retried task re-enters behind its peers, not at its old position
        list.insert(head, p(2));
        assert_eq!(list.ids().collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_retain() {
        let mut list = ReadyList::new();
        for id in 1..=5 {
            list.insert(id, p(3));
        }
        list.retain(|id| id % 2 == 1);
        assert_eq!(list.len(), 3);
        assert_eq!(list.ids().collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_empty_list() {
        let mut list = ReadyList::new();
        assert!(list.is_empty());
        assert_eq!(list.pop_front(), None);
        list.insert(9, p(4));
        list.clear();
        assert!(list.is_empty());
    }
}

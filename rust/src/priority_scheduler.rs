//! Fixed-capacity binary max-heap for urgency ranking.

use thiserror::Error;

use crate::config::CoreConfig;
use crate::{log_checks, log_debug};

/// An entry in the scheduler: an ordered priority plus an opaque payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorityItem<P, T> {
    pub priority: P,
    pub payload: T,
}

impl<P, T> PriorityItem<P, T> {
    pub fn new(priority: P, payload: T) -> Self {
        Self { priority, payload }
    }
}

/// Errors that can occur when scheduling items.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError<I> {
    /// The heap already holds `capacity` items; the rejected item is handed back.
    #[error("Scheduler capacity exceeded (capacity {capacity})")]
    CapacityExceeded { capacity: usize, rejected: I },
}

/// Array-backed max-heap with a hard capacity limit.
///
/// Invariant: `priority(parent(i)) >= priority(i)` for every `i > 0` between
/// operations. Equal priorities come out in no particular order; use
/// [`sorted_snapshot`](Self::sorted_snapshot) when a deterministic order is needed.
#[derive(Clone, Debug)]
pub struct PriorityScheduler<P, T> {
    items: Vec<PriorityItem<P, T>>,
    capacity: usize,
    verbosity: u8,
}

impl<P: Ord, T> PriorityScheduler<P, T> {
    /// Create an empty scheduler holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            verbosity: 0,
        }
    }

    pub fn with_config(config: &CoreConfig) -> Self {
        let mut scheduler = Self::new(config.scheduler_capacity);
        scheduler.verbosity = config.verbosity;
        scheduler
    }

    /// Add an item, failing without side effects when the heap is full.
    pub fn insert(
        &mut self,
        item: PriorityItem<P, T>,
    ) -> Result<(), SchedulerError<PriorityItem<P, T>>> {
        if self.items.len() >= self.capacity {
            log_checks!(
                self.verbosity,
                "Scheduler full ({} items), rejecting insert",
                self.capacity
            );
            return Err(SchedulerError::CapacityExceeded {
                capacity: self.capacity,
                rejected: item,
            });
        }
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
        Ok(())
    }

    /// Convenience wrapper around [`insert`](Self::insert).
    pub fn push(
        &mut self,
        priority: P,
        payload: T,
    ) -> Result<(), SchedulerError<PriorityItem<P, T>>> {
        self.insert(PriorityItem::new(priority, payload))
    }

    pub fn peek_max(&self) -> Option<&PriorityItem<P, T>> {
        self.items.first()
    }

    /// Remove and return a maximum-priority item.
    pub fn extract_max(&mut self) -> Option<PriorityItem<P, T>> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let top = self.items.pop();
        self.sift_down(0);
        top
    }

    /// Snapshot ordered by descending priority.
    ///
    /// The sort is stable over the current heap array, so equal priorities keep
    /// a deterministic relative order. The heap itself is not touched.
    pub fn sorted_snapshot(&self) -> Vec<&PriorityItem<P, T>> {
        let mut snapshot: Vec<&PriorityItem<P, T>> = self.items.iter().collect();
        snapshot.sort_by(|a, b| b.priority.cmp(&a.priority));
        snapshot
    }

    /// Items in heap-array order (root first).
    pub fn iter(&self) -> std::slice::Iter<'_, PriorityItem<P, T>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.items[parent].priority >= self.items[index].priority {
                break;
            }
            self.items.swap(parent, index);
            index = parent;
        }
        log_debug!(self.verbosity, "Heap sift-up settled at index {}", index);
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut largest = index;
            if left < len && self.items[left].priority > self.items[largest].priority {
                largest = left;
            }
            if right < len && self.items[right].priority > self.items[largest].priority {
                largest = right;
            }
            if largest == index {
                break;
            }
            self.items.swap(largest, index);
            index = largest;
        }
    }
}

#[cfg(test)]
impl<P: Ord, T> PriorityScheduler<P, T> {
    fn satisfies_heap_property(&self) -> bool {
        (1..self.items.len()).all(|i| self.items[(i - 1) / 2].priority >= self.items[i].priority)
    }
}

//! Open-addressed string-keyed store with triangular probing and automatic growth.
//!
//! The hash is the sum of the key's character codes modulo the table size, so
//! anagrams always share a home slot. Collisions are resolved by advancing
//! 1, 2, 3, ... slots in turn, which puts the i-th retry at a triangular-number
//! offset from home. The table is rebuilt at the next prime at least twice the
//! current size before an insert would bring the load factor to the threshold.

use thiserror::Error;

use crate::config::{CoreConfig, DEFAULT_HASH_CAPACITY, DEFAULT_MAX_LOAD_FACTOR};
use crate::{log_changes, log_debug};

/// Errors for callers that want a lookup miss as a `Result`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Key not found: {0}")]
    NotFound(String),
}

/// Trial division up to the square root.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// Smallest prime `>= n`.
pub fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

fn home_slot(key: &str, capacity: usize) -> usize {
    let sum: u64 = key.chars().map(|c| c as u64).sum();
    (sum % capacity as u64) as usize
}

#[derive(Clone, Debug)]
struct Slot<V> {
    key: String,
    value: V,
}

enum Probe {
    /// Slot already holding the key
    Found(usize),
    /// First empty slot on the probe sequence
    Vacant(usize),
    /// Gave up after `capacity` retries without finding either
    Exhausted,
}

/// Amortized constant-time key -> value store that grows on demand.
#[derive(Clone, Debug)]
pub struct ResizableHashStore<V> {
    slots: Vec<Option<Slot<V>>>,
    occupied: usize,
    max_load_factor: f64,
    rehashes: usize,
    verbosity: u8,
}

impl<V> Default for ResizableHashStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ResizableHashStore<V> {
    /// Create a store with 53 slots and a 0.7 load-factor threshold.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HASH_CAPACITY)
    }

    /// Create a store with at least `capacity` slots (rounded up to a prime).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: empty_slots(next_prime(capacity)),
            occupied: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            rehashes: 0,
            verbosity: 0,
        }
    }

    pub fn with_config(config: &CoreConfig) -> Self {
        let mut store = Self::with_capacity(config.hash_initial_capacity);
        // Thresholds outside (0, 1] would either rehash on every insert or let
        // the table fill completely
        if config.hash_max_load_factor > 0.0 && config.hash_max_load_factor <= 1.0 {
            store.max_load_factor = config.hash_max_load_factor;
        }
        store.verbosity = config.verbosity;
        store
    }

    /// Insert `value` under `key`, replacing any previous value for that key.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let mut slot = Slot {
            key: key.into(),
            value,
        };

        if (self.occupied + 1) as f64 / self.capacity() as f64 >= self.max_load_factor {
            self.rebuild(next_prime(self.capacity() * 2));
        }

        loop {
            match self.place(slot) {
                Ok(()) => return,
                Err(rejected) => {
                    tracing::warn!(
                        key = %rejected.key,
                        capacity = self.capacity(),
                        "Probe sequence exhausted, forcing rehash"
                    );
                    slot = rejected;
                    self.rebuild(next_prime(self.capacity() * 2));
                }
            }
        }
    }

    /// Find the value stored under `key`.
    pub fn lookup(&self, key: &str) -> Option<&V> {
        match self.probe(key) {
            Probe::Found(index) => self.slots[index].as_ref().map(|slot| &slot.value),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Like [`lookup`](Self::lookup), with a miss reported as `StoreError::NotFound`.
    pub fn get_or_err(&self, key: &str) -> Result<&V, StoreError> {
        self.lookup(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Number of occupied slots.
    pub fn size(&self) -> usize {
        self.occupied
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    pub fn load_factor(&self) -> f64 {
        self.occupied as f64 / self.capacity() as f64
    }

    /// How many times the table has been rebuilt.
    pub fn rehash_count(&self) -> usize {
        self.rehashes
    }

    /// Occupied entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.slots
            .iter()
            .flatten()
            .map(|slot| (slot.key.as_str(), &slot.value))
    }

    fn probe(&self, key: &str) -> Probe {
        let capacity = self.capacity();
        let mut index = home_slot(key, capacity);
        let mut step = 1;
        for _ in 0..=capacity {
            match &self.slots[index] {
                None => return Probe::Vacant(index),
                Some(slot) if slot.key == key => return Probe::Found(index),
                Some(_) => {
                    log_debug!(self.verbosity, "Probe collision for {:?} at slot {}", key, index);
                    index = (index + step) % capacity;
                    step += 1;
                }
            }
        }
        Probe::Exhausted
    }

    /// Store `slot` at its probe position; hands it back if no position was found.
    fn place(&mut self, slot: Slot<V>) -> Result<(), Slot<V>> {
        match self.probe(&slot.key) {
            Probe::Found(index) => {
                self.slots[index] = Some(slot);
                Ok(())
            }
            Probe::Vacant(index) => {
                self.slots[index] = Some(slot);
                self.occupied += 1;
                Ok(())
            }
            Probe::Exhausted => Err(slot),
        }
    }

    /// Reinsert every entry into a fresh table of `capacity` slots, growing
    /// further if some entry cannot be placed.
    fn rebuild(&mut self, mut capacity: usize) {
        let mut entries: Vec<Slot<V>> = std::mem::take(&mut self.slots)
            .into_iter()
            .flatten()
            .collect();

        loop {
            self.slots = empty_slots(capacity);
            self.occupied = 0;

            let mut remaining = entries.into_iter();
            let mut overflow = None;
            for slot in remaining.by_ref() {
                if let Err(rejected) = self.place(slot) {
                    overflow = Some(rejected);
                    break;
                }
            }

            match overflow {
                None => break,
                Some(rejected) => {
                    entries = std::mem::take(&mut self.slots)
                        .into_iter()
                        .flatten()
                        .chain(std::iter::once(rejected))
                        .chain(remaining)
                        .collect();
                    capacity = next_prime(capacity * 2);
                }
            }
        }

        self.rehashes += 1;
        log_changes!(self.verbosity, "Hash table resized to {}", capacity);
    }
}

fn empty_slots<V>(capacity: usize) -> Vec<Option<Slot<V>>> {
    (0..capacity).map(|_| None).collect()
}

#[cfg(test)]
impl<V> ResizableHashStore<V> {
    fn slot_of(&self, key: &str) -> Option<usize> {
        match self.probe(key) {
            Probe::Found(index) => Some(index),
            _ => None,
        }
    }
}

//! Configuration types for the core components.

use pyo3::prelude::*;

/// Default fixed capacity of a priority scheduler.
pub const DEFAULT_SCHEDULER_CAPACITY: usize = 300;
/// Default starting slot count of a hash store (prime).
pub const DEFAULT_HASH_CAPACITY: usize = 53;
/// Load factor that must never be reached after an insert completes.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;

/// Construction parameters shared by the core components.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct CoreConfig {
    /// Maximum number of items a priority scheduler may hold
    #[pyo3(get, set)]
    pub scheduler_capacity: usize,
    /// Starting slot count of a hash store (rounded up to a prime)
    #[pyo3(get, set)]
    pub hash_initial_capacity: usize,
    /// Rehash threshold for `(occupied + 1) / capacity`
    #[pyo3(get, set)]
    pub hash_max_load_factor: f64,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            scheduler_capacity: DEFAULT_SCHEDULER_CAPACITY,
            hash_initial_capacity: DEFAULT_HASH_CAPACITY,
            hash_max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            verbosity: 0,
        }
    }
}

#[pymethods]
impl CoreConfig {
    #[new]
    #[pyo3(signature = (
        scheduler_capacity=None,
        hash_initial_capacity=None,
        hash_max_load_factor=None,
        verbosity=None
    ))]
    fn new(
        scheduler_capacity: Option<usize>,
        hash_initial_capacity: Option<usize>,
        hash_max_load_factor: Option<f64>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            scheduler_capacity: scheduler_capacity.unwrap_or(defaults.scheduler_capacity),
            hash_initial_capacity: hash_initial_capacity.unwrap_or(defaults.hash_initial_capacity),
            hash_max_load_factor: hash_max_load_factor.unwrap_or(defaults.hash_max_load_factor),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "CoreConfig(scheduler_capacity={}, hash_initial_capacity={}, hash_max_load_factor={}, verbosity={})",
            self.scheduler_capacity,
            self.hash_initial_capacity,
            self.hash_max_load_factor,
            self.verbosity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.scheduler_capacity, 300);
        assert_eq!(config.hash_initial_capacity, 53);
        assert!((config.hash_max_load_factor - 0.7).abs() < 1e-9);
        assert_eq!(config.verbosity, 0);
    }

    #[test]
    fn test_new_falls_back_to_defaults() {
        let config = CoreConfig::new(Some(10), None, None, Some(2));
        assert_eq!(config.scheduler_capacity, 10);
        assert_eq!(config.hash_initial_capacity, DEFAULT_HASH_CAPACITY);
        assert_eq!(config.verbosity, 2);
    }
}

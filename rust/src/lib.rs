//! In-memory indexing, scheduling and routing core for restaurant operations.
//!
//! Four independent components, each owned by the calling business layer:
//! - [`BalancedIndex`]: AVL tree for customer lookup by id
//! - [`PriorityScheduler`]: fixed-capacity max-heap for order urgency
//! - [`ResizableHashStore`]: open-addressed store for inventory lookup
//! - [`GraphEngine`]: weighted graph for delivery planning
//!
//! None of them calls into another. The same types are exported to Python as
//! the `tableside.rust` extension module.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

pub mod balanced_index;
mod bindings;
mod config;
pub mod graph;
pub mod hash_store;
pub mod logging;
pub mod priority_scheduler;

pub use balanced_index::{BalancedIndex, InOrder, IndexError, IndexKey};
pub use config::{
    CoreConfig, DEFAULT_HASH_CAPACITY, DEFAULT_MAX_LOAD_FACTOR, DEFAULT_SCHEDULER_CAPACITY,
};
pub use graph::{
    Bfs, Dfs, Distance, GraphEngine, GraphError, Leg, ShortestPaths, SpanningTree, Tour, Vertex,
    Weight,
};
pub use hash_store::{ResizableHashStore, StoreError};
pub use logging::{init_logging, LoggingError};
pub use priority_scheduler::{PriorityItem, PriorityScheduler, SchedulerError};

/// The tableside.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Config types
    m.add_class::<CoreConfig>()?;

    // Components
    m.add_class::<bindings::PyBalancedIndex>()?;
    m.add_class::<bindings::PyPriorityScheduler>()?;
    m.add_class::<bindings::PyHashStore>()?;
    m.add_class::<bindings::PyGraphEngine>()?;

    // Result types
    m.add_class::<bindings::PySpanningTree>()?;
    m.add_class::<bindings::PyTour>()?;

    // Logging
    m.add_function(wrap_pyfunction!(bindings::init_logging, m)?)?;

    Ok(())
}

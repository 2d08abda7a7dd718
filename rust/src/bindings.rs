//! PyO3 wrappers exposing the core components to Python callers.
//!
//! Values and payloads are arbitrary Python objects. Results are copied out
//! as plain Python lists/tuples so no Rust borrow escapes a method call.

use pyo3::exceptions::{PyIndexError, PyMemoryError, PyOverflowError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::balanced_index::BalancedIndex;
use crate::config::CoreConfig;
use crate::graph::{Distance, GraphEngine, GraphError, Vertex, Weight};
use crate::hash_store::ResizableHashStore;
use crate::logging::{self, LoggingError};
use crate::priority_scheduler::{PriorityItem, PriorityScheduler, SchedulerError};

impl From<GraphError> for PyErr {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::OutOfRange { .. } => PyIndexError::new_err(err.to_string()),
            GraphError::Unreachable { .. } => PyValueError::new_err(err.to_string()),
            GraphError::TooManyVertices { .. } => PyMemoryError::new_err(err.to_string()),
        }
    }
}

/// Send log records to stderr, filtered by `level` ("info", "warn", ...).
#[pyfunction]
#[pyo3(signature = (level="info"))]
pub fn init_logging(level: &str) -> PyResult<()> {
    logging::init_logging(level).map_err(|err| match err {
        LoggingError::InvalidFilter(_) => PyValueError::new_err(err.to_string()),
        LoggingError::AlreadyInitialized => PyRuntimeError::new_err(err.to_string()),
    })
}

fn item_to_py(py: Python<'_>, item: &PriorityItem<i64, PyObject>) -> (i64, PyObject) {
    (item.priority, item.payload.clone_ref(py))
}

/// Customer index keyed by integer id.
#[pyclass(name = "BalancedIndex")]
pub struct PyBalancedIndex {
    inner: BalancedIndex<PyObject>,
}

#[pymethods]
impl PyBalancedIndex {
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<CoreConfig>) -> Self {
        Self {
            inner: BalancedIndex::with_config(&config.unwrap_or_default()),
        }
    }

    /// Returns False (and keeps the old value) if the key already exists.
    fn insert(&mut self, key: i64, value: PyObject) -> bool {
        self.inner.insert(key, value)
    }

    fn search(&self, py: Python<'_>, key: i64) -> Option<PyObject> {
        self.inner.search(key).map(|v| v.clone_ref(py))
    }

    /// Ascending (key, value) pairs.
    fn traverse(&self, py: Python<'_>) -> Vec<(i64, PyObject)> {
        self.inner
            .traverse()
            .map(|(k, v)| (k, v.clone_ref(py)))
            .collect()
    }

    fn height(&self) -> usize {
        self.inner.height()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __contains__(&self, key: i64) -> bool {
        self.inner.contains(key)
    }
}

/// Fixed-capacity max-priority order queue.
#[pyclass(name = "PriorityScheduler")]
pub struct PyPriorityScheduler {
    inner: PriorityScheduler<i64, PyObject>,
}

#[pymethods]
impl PyPriorityScheduler {
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<CoreConfig>) -> Self {
        Self {
            inner: PriorityScheduler::with_config(&config.unwrap_or_default()),
        }
    }

    /// Raises OverflowError when the scheduler is full.
    fn insert(&mut self, priority: i64, payload: PyObject) -> PyResult<()> {
        self.inner
            .push(priority, payload)
            .map_err(|err| match err {
                SchedulerError::CapacityExceeded { .. } => PyOverflowError::new_err(err.to_string()),
            })
    }

    fn peek_max(&self, py: Python<'_>) -> Option<(i64, PyObject)> {
        self.inner.peek_max().map(|item| item_to_py(py, item))
    }

    fn extract_max(&mut self) -> Option<(i64, PyObject)> {
        self.inner
            .extract_max()
            .map(|item| (item.priority, item.payload))
    }

    /// Stable descending-priority snapshot; the queue is left untouched.
    fn sorted_snapshot(&self, py: Python<'_>) -> Vec<(i64, PyObject)> {
        self.inner
            .sorted_snapshot()
            .into_iter()
            .map(|item| item_to_py(py, item))
            .collect()
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

/// Inventory store keyed by item name.
#[pyclass(name = "HashStore")]
pub struct PyHashStore {
    inner: ResizableHashStore<PyObject>,
}

#[pymethods]
impl PyHashStore {
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<CoreConfig>) -> Self {
        Self {
            inner: ResizableHashStore::with_config(&config.unwrap_or_default()),
        }
    }

    fn insert(&mut self, key: String, value: PyObject) {
        self.inner.insert(key, value);
    }

    fn lookup(&self, py: Python<'_>, key: &str) -> Option<PyObject> {
        self.inner.lookup(key).map(|v| v.clone_ref(py))
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn load_factor(&self) -> f64 {
        self.inner.load_factor()
    }

    /// Occupied (key, value) pairs in slot order.
    fn items(&self, py: Python<'_>) -> Vec<(String, PyObject)> {
        self.inner
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone_ref(py)))
            .collect()
    }

    fn __len__(&self) -> usize {
        self.inner.size()
    }

    fn __contains__(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }
}

/// Minimum spanning tree summary.
#[pyclass(name = "SpanningTree", get_all)]
#[derive(Clone, Debug)]
pub struct PySpanningTree {
    /// (parent, child, weight) per tree edge
    pub edges: Vec<(Vertex, Vertex, Weight)>,
    pub total_weight: Weight,
    /// Vertices not connected to vertex 0
    pub unreached: Vec<Vertex>,
}

#[pymethods]
impl PySpanningTree {
    fn is_spanning(&self) -> bool {
        self.unreached.is_empty()
    }

    fn __repr__(&self) -> String {
        format!(
            "SpanningTree(edges={}, total_weight={}, unreached={:?})",
            self.edges.len(),
            self.total_weight,
            self.unreached
        )
    }
}

/// Nearest-neighbour tour; `None` marks a leg with no direct edge.
#[pyclass(name = "Tour", get_all)]
#[derive(Clone, Debug)]
pub struct PyTour {
    pub route: Vec<Vertex>,
    pub leg_distances: Vec<Option<Weight>>,
    pub total: Option<Weight>,
}

#[pymethods]
impl PyTour {
    fn __repr__(&self) -> String {
        format!("Tour(route={:?}, total={:?})", self.route, self.total)
    }
}

/// Delivery graph.
#[pyclass(name = "GraphEngine")]
pub struct PyGraphEngine {
    inner: GraphEngine,
}

#[pymethods]
impl PyGraphEngine {
    #[new]
    #[pyo3(signature = (n, config=None))]
    fn new(n: usize, config: Option<CoreConfig>) -> PyResult<Self> {
        Ok(Self {
            inner: GraphEngine::with_config(n, &config.unwrap_or_default())?,
        })
    }

    fn init(&mut self, n: usize) -> PyResult<()> {
        Ok(self.inner.init(n)?)
    }

    fn add_edge(&mut self, u: Vertex, v: Vertex, w: Weight) -> PyResult<()> {
        Ok(self.inner.add_edge(u, v, w)?)
    }

    fn bfs(&self, start: Vertex) -> PyResult<Vec<Vertex>> {
        Ok(self.inner.bfs(start)?.collect())
    }

    fn dfs(&self, start: Vertex) -> PyResult<Vec<Vertex>> {
        Ok(self.inner.dfs(start)?.collect())
    }

    /// Distance per vertex; `None` when unreachable.
    fn shortest_paths(&self, source: Vertex) -> PyResult<Vec<Option<Weight>>> {
        let paths = self.inner.shortest_paths(source)?;
        Ok(paths.distances().iter().map(|d| d.finite()).collect())
    }

    /// Vertices on a shortest route; raises ValueError when there is none.
    fn shortest_path(&self, source: Vertex, target: Vertex) -> PyResult<Vec<Vertex>> {
        Ok(self.inner.shortest_paths(source)?.path_to(target)?)
    }

    fn minimum_spanning_tree(&self) -> PySpanningTree {
        let tree = self.inner.minimum_spanning_tree();
        PySpanningTree {
            edges: tree.edges(),
            total_weight: tree.total_weight(),
            unreached: tree.unreached().to_vec(),
        }
    }

    fn approximate_tour(&self, start: Vertex) -> PyResult<PyTour> {
        let tour = self.inner.approximate_tour(start)?;
        Ok(PyTour {
            route: tour.route().to_vec(),
            leg_distances: tour.legs().iter().map(|leg| leg.distance.finite()).collect(),
            total: tour.total().finite(),
        })
    }

    fn weight(&self, u: Vertex, v: Vertex) -> PyResult<Option<Weight>> {
        Ok(self.inner.weight(u, v).map(Distance::finite)?)
    }

    fn vertex_count(&self) -> usize {
        self.inner.vertex_count()
    }

    fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }
}

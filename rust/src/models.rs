//! Core data types exchanged with the workflow/resource loader.

use pyo3::prelude::*;
use std::collections::HashMap;

// Note: We use std HashMap here for PyO3 interface compatibility

/// Whether a data file is consumed or produced by its owning task.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileDirection {
    Input,
    Output,
}

/// A data file attached to a task.
#[pyclass]
#[derive(Clone, Debug)]
pub struct DataFile {
    #[pyo3(get, set)]
    pub name: String,
    /// Size in bytes.
    #[pyo3(get, set)]
    pub size: f64,
    #[pyo3(get, set)]
    pub direction: FileDirection,
}

#[pymethods]
impl DataFile {
    #[new]
    fn new(name: String, size: f64, direction: FileDirection) -> Self {
        Self {
            name,
            size,
            direction,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "DataFile(name={:?}, size={}, direction={:?})",
            self.name, self.size, self.direction
        )
    }
}

/// A workflow task as handed over by the loader.
///
/// `parents` lists the identifiers of the tasks that must finish first. The
/// task list passed to the planner must already be topologically ordered.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Task {
    #[pyo3(get, set)]
    pub id: String,
    /// Work length; also the resource-independent planning duration.
    #[pyo3(get, set)]
    pub length: f64,
    #[pyo3(get, set)]
    pub cores: u32,
    /// Topological level. Computed from the parents when left unset.
    #[pyo3(get, set)]
    pub depth: Option<u32>,
    #[pyo3(get, set)]
    pub parents: Vec<String>,
    #[pyo3(get, set)]
    pub files: Vec<DataFile>,
}

#[pymethods]
impl Task {
    #[new]
    #[pyo3(signature = (id, length, cores=1, parents=Vec::new(), depth=None, files=Vec::new()))]
    fn new(
        id: String,
        length: f64,
        cores: u32,
        parents: Vec<String>,
        depth: Option<u32>,
        files: Vec<DataFile>,
    ) -> Self {
        Self {
            id,
            length,
            cores,
            depth,
            parents,
            files,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={:?}, length={}, cores={}, parents={})",
            self.id,
            self.length,
            self.cores,
            self.parents.len()
        )
    }
}

/// A compute resource tasks can be bound to.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Resource {
    #[pyo3(get, set)]
    pub id: String,
    /// Work units processed per time unit.
    #[pyo3(get, set)]
    pub throughput: f64,
    #[pyo3(get, set)]
    pub cores: u32,
    /// Network bandwidth in Mb per time unit.
    #[pyo3(get, set)]
    pub bandwidth: f64,
}

#[pymethods]
impl Resource {
    #[new]
    #[pyo3(signature = (id, throughput, cores=1, bandwidth=0.0))]
    fn new(id: String, throughput: f64, cores: u32, bandwidth: f64) -> Self {
        Self {
            id,
            throughput,
            cores,
            bandwidth,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Resource(id={:?}, throughput={}, cores={}, bandwidth={})",
            self.id, self.throughput, self.cores, self.bandwidth
        )
    }
}

/// A task annotated by a planning run.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedTask {
    #[pyo3(get, set)]
    pub task_id: String,
    #[pyo3(get, set)]
    pub depth: u32,
    #[pyo3(get, set)]
    pub earliest_start: f64,
    #[pyo3(get, set)]
    pub earliest_finish: f64,
    #[pyo3(get, set)]
    pub latest_start: f64,
    #[pyo3(get, set)]
    pub latest_finish: f64,
    #[pyo3(get, set)]
    pub slack: f64,
    #[pyo3(get, set)]
    pub is_critical: bool,
    /// `None` means the task could not be placed on any resource.
    #[pyo3(get, set)]
    pub resource_id: Option<String>,
    #[pyo3(get, set)]
    pub cost: Option<f64>,
}

#[pymethods]
impl PlannedTask {
    fn __repr__(&self) -> String {
        format!(
            "PlannedTask(task_id={:?}, critical={}, slack={}, resource={:?})",
            self.task_id, self.is_critical, self.slack, self.resource_id
        )
    }
}

/// Result of a planning run.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanResult {
    /// Planned tasks in input order.
    #[pyo3(get, set)]
    pub planned_tasks: Vec<PlannedTask>,
    #[pyo3(get, set)]
    pub total_cost: f64,
    #[pyo3(get, set)]
    pub algorithm_metadata: HashMap<String, String>,
}

#[pymethods]
impl PlanResult {
    /// Identifiers of tasks left without a resource.
    pub fn unassigned_task_ids(&self) -> Vec<String> {
        self.planned_tasks
            .iter()
            .filter(|t| t.resource_id.is_none())
            .map(|t| t.task_id.clone())
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "PlanResult(planned_tasks={}, total_cost={}, metadata_keys={})",
            self.planned_tasks.len(),
            self.total_cost,
            self.algorithm_metadata.len()
        )
    }
}

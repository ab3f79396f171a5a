//! Static critical-path planner for DAG workflows on heterogeneous resources.
//!
//! Every task is bound to a resource before execution: timing bounds come
//! from a forward and backward pass, critical tasks take their cheapest
//! feasible resource, and tasks with slack are spread across the others
//! under per-depth deadlines.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

mod config;
pub mod logging;
mod models;
pub mod planning;
pub mod workflow;

pub use config::{PlannerConfig, STRATEGY_CRITICAL_PATH, STRATEGY_ENHANCED_CPM};
pub use models::{DataFile, FileDirection, PlanResult, PlannedTask, Resource, Task};
pub use planning::{plan, PlanError, PlanReport, PlanningStrategy, StrategyRegistry};
pub use workflow::{Assignment, TaskId, TaskNode, Workflow, WorkflowError};

/// Plan a workflow and return the annotated tasks.
///
/// # Arguments
/// * `tasks` - Tasks in topological order (parents before children)
/// * `resources` - Resources to bind tasks to; list order breaks cost ties
/// * `config` - Strategy and cost-model options (defaults if omitted)
///
/// # Returns
/// * PlanResult with timing, criticality and the chosen resource per task
///
/// # Raises
/// * ValueError on malformed input or an unknown strategy
#[pyfunction]
#[pyo3(signature = (tasks, resources, config=None))]
fn plan_workflow(
    tasks: Vec<Task>,
    resources: Vec<Resource>,
    config: Option<PlannerConfig>,
) -> PyResult<PlanResult> {
    let config = config.unwrap_or_default();

    match plan(&tasks, &resources, &config) {
        Ok((result, _report)) => Ok(result),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// Names of the available planning strategies.
#[pyfunction]
fn available_strategies() -> Vec<String> {
    StrategyRegistry::with_defaults()
        .names()
        .into_iter()
        .map(String::from)
        .collect()
}

/// The workflow_planner Python module.
#[pymodule]
fn workflow_planner(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<FileDirection>()?;
    m.add_class::<DataFile>()?;
    m.add_class::<Task>()?;
    m.add_class::<Resource>()?;
    m.add_class::<PlannedTask>()?;
    m.add_class::<PlanResult>()?;

    // Config types
    m.add_class::<PlannerConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(plan_workflow, m)?)?;
    m.add_function(wrap_pyfunction!(available_strategies, m)?)?;

    Ok(())
}

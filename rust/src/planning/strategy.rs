//! Planning strategies and the name-keyed registry that selects them.

use rustc_hash::FxHashMap;
use std::collections::HashMap;
use thiserror::Error;

use crate::config::{PlannerConfig, STRATEGY_CRITICAL_PATH, STRATEGY_ENHANCED_CPM};
use crate::log_changes;
use crate::models::{PlanResult, Resource, Task};
use crate::workflow::{TaskId, Workflow, WorkflowError};

use super::assignment::{assign_cheapest, assign_resources, AssignmentOutcome};
use super::cost::estimate_costs;
use super::criticality::{classify_criticality, CriticalitySummary};
use super::deadline::propagate_deadlines;
use super::timing::analyze_timing;
use super::transfer::incoming_transfer_costs;
use super::types::{CostTable, PlanReport};

/// Errors that abort a planning run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error("No resources available for planning")]
    NoResources,
    #[error("Resource {id} has invalid throughput {throughput}")]
    InvalidThroughput { id: String, throughput: f64 },
    #[error("Unknown planning strategy: {0}")]
    UnknownStrategy(String),
    #[error("Mean bandwidth {0} cannot price data transfers; it must be positive and finite")]
    InvalidBandwidth(f64),
}

/// A planning algorithm: annotates the workflow in place and reports.
pub trait PlanningStrategy {
    /// Registry key of this strategy.
    fn name(&self) -> &'static str;

    /// Run the strategy over the whole workflow once.
    fn plan(
        &self,
        workflow: &mut Workflow,
        resources: &[Resource],
        config: &PlannerConfig,
    ) -> Result<PlanReport, PlanError>;
}

/// Output of the stages every strategy shares.
struct Analysis {
    summary: CriticalitySummary,
    makespan: f64,
    costs: CostTable,
}

/// Timing, criticality and cost estimation.
fn analyze(
    workflow: &mut Workflow,
    resources: &[Resource],
    config: &PlannerConfig,
) -> Result<Analysis, PlanError> {
    validate_resources(resources)?;
    let verbosity = config.verbosity;

    let makespan = analyze_timing(workflow, verbosity);
    let summary = classify_criticality(workflow, verbosity);
    let transfer_terms = if config.include_transfer_cost {
        Some(incoming_transfer_costs(workflow, resources)?)
    } else {
        None
    };
    let costs = estimate_costs(workflow, resources, transfer_terms.as_deref(), verbosity);

    Ok(Analysis {
        summary,
        makespan,
        costs,
    })
}

fn validate_resources(resources: &[Resource]) -> Result<(), PlanError> {
    if resources.is_empty() {
        return Err(PlanError::NoResources);
    }
    for resource in resources {
        if !resource.throughput.is_finite() || resource.throughput <= 0.0 {
            return Err(PlanError::InvalidThroughput {
                id: resource.id.clone(),
                throughput: resource.throughput,
            });
        }
    }
    Ok(())
}

fn task_names(workflow: &Workflow, ids: &[TaskId]) -> Vec<String> {
    ids.iter().map(|&id| workflow.node(id).id.clone()).collect()
}

fn build_report(
    name: &str,
    workflow: &Workflow,
    analysis: &Analysis,
    deadlines: Vec<(u32, f64)>,
    outcome: &AssignmentOutcome,
) -> PlanReport {
    PlanReport {
        strategy: name.to_string(),
        critical_count: analysis.summary.critical,
        non_critical_count: analysis.summary.non_critical,
        makespan: analysis.makespan,
        deadlines,
        total_cost: outcome.total_cost,
        unassigned: task_names(workflow, &outcome.unassigned),
        overruns: task_names(workflow, &outcome.overruns),
    }
}

/// Deadline-aware critical-path planning with load spreading.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnhancedCpmStrategy;

impl PlanningStrategy for EnhancedCpmStrategy {
    fn name(&self) -> &'static str {
        STRATEGY_ENHANCED_CPM
    }

    fn plan(
        &self,
        workflow: &mut Workflow,
        resources: &[Resource],
        config: &PlannerConfig,
    ) -> Result<PlanReport, PlanError> {
        let analysis = analyze(workflow, resources, config)?;
        let deadlines = propagate_deadlines(workflow, &analysis.costs, config.verbosity);
        let outcome = assign_resources(
            workflow,
            resources,
            &analysis.costs,
            &deadlines,
            config.noncritical_start_index,
            config.verbosity,
        );
        let deadlines = deadlines.into_iter().collect();
        Ok(build_report(
            self.name(),
            workflow,
            &analysis,
            deadlines,
            &outcome,
        ))
    }
}

/// Every task on its cheapest feasible resource.
#[derive(Clone, Copy, Debug, Default)]
pub struct CriticalPathStrategy;

impl PlanningStrategy for CriticalPathStrategy {
    fn name(&self) -> &'static str {
        STRATEGY_CRITICAL_PATH
    }

    fn plan(
        &self,
        workflow: &mut Workflow,
        resources: &[Resource],
        config: &PlannerConfig,
    ) -> Result<PlanReport, PlanError> {
        let analysis = analyze(workflow, resources, config)?;
        let outcome = assign_cheapest(workflow, resources, &analysis.costs, config.verbosity);
        Ok(build_report(
            self.name(),
            workflow,
            &analysis,
            Vec::new(),
            &outcome,
        ))
    }
}

/// Lookup table of strategies keyed by their configuration name.
pub struct StrategyRegistry {
    strategies: FxHashMap<&'static str, Box<dyn PlanningStrategy>>,
}

impl StrategyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            strategies: FxHashMap::default(),
        }
    }

    /// A registry holding the built-in strategies.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(EnhancedCpmStrategy));
        registry.register(Box::new(CriticalPathStrategy));
        registry
    }

    /// Add a strategy, replacing any with the same name.
    pub fn register(&mut self, strategy: Box<dyn PlanningStrategy>) {
        self.strategies.insert(strategy.name(), strategy);
    }

    pub fn get(&self, name: &str) -> Result<&dyn PlanningStrategy, PlanError> {
        self.strategies
            .get(name)
            .map(|s| s.as_ref())
            .ok_or_else(|| PlanError::UnknownStrategy(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.strategies.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Plan a workflow with the strategy named in `config`.
///
/// `tasks` must be topologically ordered. Returns the annotated tasks in
/// input order together with the run diagnostics. Only malformed input
/// fails; tasks without a feasible resource come back unassigned.
pub fn plan(
    tasks: &[Task],
    resources: &[Resource],
    config: &PlannerConfig,
) -> Result<(PlanResult, PlanReport), PlanError> {
    let registry = StrategyRegistry::with_defaults();
    let strategy = registry.get(&config.strategy)?;
    let mut workflow = Workflow::from_tasks(tasks)?;

    log_changes!(
        config.verbosity,
        "Planning {} tasks on {} resources with {}",
        workflow.len(),
        resources.len(),
        strategy.name()
    );
    let report = strategy.plan(&mut workflow, resources, config)?;
    log_changes!(config.verbosity, "Total cost: {}", report.total_cost);

    let mut metadata = HashMap::new();
    metadata.insert("algorithm".to_string(), report.strategy.clone());
    metadata.insert("critical_tasks".to_string(), report.critical_count.to_string());
    metadata.insert(
        "non_critical_tasks".to_string(),
        report.non_critical_count.to_string(),
    );
    metadata.insert("makespan".to_string(), report.makespan.to_string());
    metadata.insert("unassigned".to_string(), report.unassigned.len().to_string());
    metadata.insert("overruns".to_string(), report.overruns.len().to_string());

    let result = PlanResult {
        planned_tasks: workflow.to_planned_tasks(resources),
        total_cost: report.total_cost,
        algorithm_metadata: metadata,
    };
    Ok((result, report))
}

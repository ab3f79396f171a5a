//! Types shared by the planning stages.

use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Index of a resource in the slice handed to the planner.
///
/// Construction order doubles as the tie-break order between equal costs.
pub type ResourceId = usize;

/// Allowed cost per depth level, iterated in ascending depth.
pub type DeadlineTable = BTreeMap<u32, f64>;

/// Per-task timing information from the forward and backward passes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TaskTiming {
    /// Earliest possible start time (from forward pass).
    pub earliest_start: f64,
    /// Earliest possible finish time (from forward pass).
    pub earliest_finish: f64,
    /// Latest allowable start time (from backward pass).
    pub latest_start: f64,
    /// Latest allowable finish time (from backward pass).
    pub latest_finish: f64,
    /// Slack = latest_finish - earliest_finish.
    pub slack: f64,
}

/// A feasible resource for a task together with its estimated cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub resource: ResourceId,
    pub cost: f64,
}

/// Order candidates by cost, then by resource construction order.
fn cmp_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    a.cost
        .partial_cmp(&b.cost)
        .unwrap_or(Ordering::Equal)
        .then(a.resource.cmp(&b.resource))
}

/// Feasible resources of one task and their estimated completion costs.
#[derive(Clone, Debug, Default)]
pub struct CostMap {
    costs: FxHashMap<ResourceId, f64>,
}

impl CostMap {
    pub fn insert(&mut self, resource: ResourceId, cost: f64) {
        self.costs.insert(resource, cost);
    }

    pub fn get(&self, resource: ResourceId) -> Option<f64> {
        self.costs.get(&resource).copied()
    }

    pub fn contains(&self, resource: ResourceId) -> bool {
        self.costs.contains_key(&resource)
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Candidates sorted ascending by cost; equal costs keep resource order.
    pub fn sorted(&self) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .costs
            .iter()
            .map(|(&resource, &cost)| Candidate { resource, cost })
            .collect();
        candidates.sort_by(cmp_candidates);
        candidates
    }

    /// The first entry of the sorted map, if any.
    pub fn cheapest(&self) -> Option<Candidate> {
        self.costs
            .iter()
            .map(|(&resource, &cost)| Candidate { resource, cost })
            .min_by(cmp_candidates)
    }
}

/// Cost maps for every task, indexed by task id. Discarded after assignment.
pub type CostTable = Vec<CostMap>;

/// Diagnostics from one planning run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanReport {
    /// Name of the strategy that produced the plan.
    pub strategy: String,
    pub critical_count: usize,
    pub non_critical_count: usize,
    /// Largest earliest finish time over all tasks.
    pub makespan: f64,
    /// Depth deadlines in ascending depth order (empty for strategies without them).
    pub deadlines: Vec<(u32, f64)>,
    /// Sum of the costs of all assigned tasks.
    pub total_cost: f64,
    /// Tasks with no feasible resource.
    pub unassigned: Vec<String>,
    /// Non-critical tasks placed although no candidate met the depth deadline.
    pub overruns: Vec<String>,
}

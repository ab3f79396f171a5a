//! Feasibility filtering and per-resource cost estimation.

use crate::models::Resource;
use crate::workflow::Workflow;
use crate::{log_checks, log_debug};

use super::types::{CostMap, CostTable};

/// Build the cost map of every task.
///
/// A resource is a candidate for a task when it has at least as many cores
/// as the task requires and its estimated cost fits the task's window:
/// the duration for critical tasks, duration plus slack otherwise. The cost
/// is `length / throughput`, plus the task's entry in `transfer_terms` when
/// given. Pairs outside the window are dropped, so a task may end up with
/// an empty map.
pub fn estimate_costs(
    workflow: &Workflow,
    resources: &[Resource],
    transfer_terms: Option<&[f64]>,
    verbosity: u8,
) -> CostTable {
    let mut table: CostTable = Vec::with_capacity(workflow.len());

    for (id, node) in workflow.nodes().iter().enumerate() {
        let window = if node.is_critical {
            node.duration()
        } else {
            node.duration() + node.timing.slack
        };
        let transfer = transfer_terms.map(|terms| terms[id]).unwrap_or(0.0);

        let mut costs = CostMap::default();
        for (resource_id, resource) in resources.iter().enumerate() {
            if resource.cores < node.cores {
                continue;
            }
            let cost = node.length / resource.throughput + transfer;
            if cost <= window {
                costs.insert(resource_id, cost);
            }
        }

        if costs.is_empty() {
            log_checks!(verbosity, "  No resource matches task {}", node.id);
        } else {
            log_checks!(
                verbosity,
                "  Resources matching task {}: {}",
                node.id,
                costs.len()
            );
            log_debug!(
                verbosity,
                "    Candidates: {}",
                costs
                    .sorted()
                    .iter()
                    .map(|c| format!("{}={:.3}", resources[c.resource].id, c.cost))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        table.push(costs);
    }

    table
}

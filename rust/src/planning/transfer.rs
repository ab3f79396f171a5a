//! Projected data transfer time between dependent tasks.
//!
//! File sizes are in bytes and bandwidth in megabits per time unit, so the
//! matched bytes are converted to megabytes and then to megabits.

use crate::models::{FileDirection, Resource};
use crate::workflow::{TaskNode, Workflow};

use super::strategy::PlanError;

const BYTES_PER_MEGABYTE: f64 = 1_000_000.0;
const BITS_PER_BYTE: f64 = 8.0;

/// Mean bandwidth over all resources (0 when the list is empty).
pub fn mean_bandwidth(resources: &[Resource]) -> f64 {
    if resources.is_empty() {
        return 0.0;
    }
    resources.iter().map(|r| r.bandwidth).sum::<f64>() / resources.len() as f64
}

/// Bytes a child reads from its parent's outputs.
///
/// Each parent output counts once, matched by name against the child's
/// inputs; the child's declared size is used.
fn matched_bytes(parent: &TaskNode, child: &TaskNode) -> f64 {
    parent
        .files
        .iter()
        .filter(|f| f.direction == FileDirection::Output)
        .filter_map(|out| {
            child
                .files
                .iter()
                .find(|f| f.direction == FileDirection::Input && f.name == out.name)
                .map(|f| f.size)
        })
        .sum()
}

fn megabits(bytes: f64) -> f64 {
    bytes / BYTES_PER_MEGABYTE * BITS_PER_BYTE
}

fn usable_bandwidth(bandwidth: f64) -> bool {
    bandwidth.is_finite() && bandwidth > 0.0
}

/// Time to move the parent's outputs that the child consumes.
///
/// A bandwidth that is not positive and finite yields infinity unless
/// nothing is transferred.
pub fn transfer_cost(parent: &TaskNode, child: &TaskNode, mean_bandwidth: f64) -> f64 {
    let bits = megabits(matched_bytes(parent, child));
    if bits == 0.0 {
        0.0
    } else if !usable_bandwidth(mean_bandwidth) {
        f64::INFINITY
    } else {
        bits / mean_bandwidth
    }
}

/// Incoming transfer time for every task: the sum over its parents.
///
/// Fails when some data has to move but the mean bandwidth is not positive
/// and finite.
pub fn incoming_transfer_costs(
    workflow: &Workflow,
    resources: &[Resource],
) -> Result<Vec<f64>, PlanError> {
    let bandwidth = mean_bandwidth(resources);
    let usable = usable_bandwidth(bandwidth);
    let nodes = workflow.nodes();

    nodes
        .iter()
        .map(|child| {
            let total: f64 = child
                .parents
                .iter()
                .map(|&p| transfer_cost(&nodes[p], child, bandwidth))
                .sum();
            if total > 0.0 && !usable {
                Err(PlanError::InvalidBandwidth(bandwidth))
            } else {
                Ok(total)
            }
        })
        .collect()
}

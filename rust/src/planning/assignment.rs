//! Resource assignment heuristics.
//!
//! `assign_resources` is the deadline-aware heuristic: critical tasks take
//! their cheapest candidate, non-critical tasks rotate through their
//! candidates under the depth deadline. `assign_cheapest` gives every task
//! its cheapest candidate.

use crate::models::Resource;
use crate::workflow::{Assignment, TaskId, Workflow};
use crate::{log_changes, log_checks, log_debug};

use super::types::{Candidate, CostTable, DeadlineTable};

/// What an assignment pass did besides binding resources.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssignmentOutcome {
    /// Sum of the costs of all assigned tasks.
    pub total_cost: f64,
    /// Tasks whose cost map was empty.
    pub unassigned: Vec<TaskId>,
    /// Non-critical tasks bound although no candidate met the deadline.
    pub overruns: Vec<TaskId>,
}

/// Pick a candidate for a non-critical task from the rotating cursor.
///
/// The cursor wraps to 0 when it points past the end of `sorted`. If the
/// candidate under it exceeds `deadline`, the cursor steps forward once
/// (wrapping) and that candidate is taken regardless. Returns the chosen
/// candidate and whether it is within the deadline. The cursor is left on
/// the returned candidate.
fn rotate(sorted: &[Candidate], cursor: &mut usize, deadline: f64) -> (Candidate, bool) {
    let len = sorted.len();
    let mut index = if *cursor >= len { 0 } else { *cursor };

    if deadline - sorted[index].cost < 0.0 {
        index = (index + 1) % len;
    }

    *cursor = index;
    let picked = sorted[index];
    (picked, deadline - picked.cost >= 0.0)
}

struct Assigner<'a> {
    workflow: &'a mut Workflow,
    resources: &'a [Resource],
    outcome: AssignmentOutcome,
    verbosity: u8,
}

impl Assigner<'_> {
    fn bind(&mut self, id: TaskId, candidate: Candidate) {
        let node = &mut self.workflow.nodes_mut()[id];
        node.assignment = Assignment::Assigned {
            resource: candidate.resource,
            cost: candidate.cost,
        };
        self.outcome.total_cost += candidate.cost;
        log_changes!(
            self.verbosity,
            "  Assigned task {} to {} (cost {:.3})",
            node.id,
            self.resources[candidate.resource].id,
            candidate.cost
        );
    }

    fn leave_unassigned(&mut self, id: TaskId) {
        let node = &mut self.workflow.nodes_mut()[id];
        node.assignment = Assignment::Unassigned;
        self.outcome.unassigned.push(id);
        log_checks!(
            self.verbosity,
            "  No feasible resource for task {}; left unassigned",
            node.id
        );
    }
}

/// Bind tasks to resources depth by depth.
///
/// Depths with a deadline are processed first, in ascending order. Within
/// a depth, tasks go in list order: a critical task gets its cheapest
/// candidate; a non-critical task gets the candidate chosen by a cursor
/// shared by the whole depth, starting at `start_index` so the cheapest
/// resource stays free for critical work (see [`rotate`]).
///
/// Depths without a deadline hold only non-critical tasks (or critical
/// tasks with no candidates). They are processed afterwards, also in
/// ascending order, and each task gets its cheapest candidate.
///
/// A task with an empty cost map is marked [`Assignment::Unassigned`].
pub fn assign_resources(
    workflow: &mut Workflow,
    resources: &[Resource],
    costs: &CostTable,
    deadlines: &DeadlineTable,
    start_index: usize,
    verbosity: u8,
) -> AssignmentOutcome {
    let levels = workflow.tasks_by_depth();
    let mut assigner = Assigner {
        workflow,
        resources,
        outcome: AssignmentOutcome::default(),
        verbosity,
    };

    for (depth, &deadline) in deadlines {
        let Some(task_ids) = levels.get(depth) else {
            continue;
        };
        log_checks!(
            verbosity,
            "Depth {}: {} tasks, deadline {:.3}",
            depth,
            task_ids.len(),
            deadline
        );

        let mut cursor = start_index;
        for &id in task_ids {
            let sorted = costs[id].sorted();
            if sorted.is_empty() {
                assigner.leave_unassigned(id);
                continue;
            }

            if assigner.workflow.node(id).is_critical {
                assigner.bind(id, sorted[0]);
                continue;
            }

            let (candidate, within_deadline) = rotate(&sorted, &mut cursor, deadline);
            log_debug!(
                verbosity,
                "  Cursor for task {} at {} of {}",
                assigner.workflow.node(id).id,
                cursor,
                sorted.len()
            );
            if !within_deadline {
                log_checks!(
                    verbosity,
                    "  Task {} exceeds deadline {:.3} after one cursor step; assigned anyway",
                    assigner.workflow.node(id).id,
                    deadline
                );
                assigner.outcome.overruns.push(id);
            }
            assigner.bind(id, candidate);
        }
    }

    for (depth, task_ids) in &levels {
        if deadlines.contains_key(depth) {
            continue;
        }
        log_checks!(
            verbosity,
            "Depth {}: {} tasks, no deadline (first fit)",
            depth,
            task_ids.len()
        );
        for &id in task_ids {
            match costs[id].cheapest() {
                Some(candidate) => assigner.bind(id, candidate),
                None => assigner.leave_unassigned(id),
            }
        }
    }

    assigner.outcome
}

/// Bind every task, in list order, to its cheapest candidate.
pub fn assign_cheapest(
    workflow: &mut Workflow,
    resources: &[Resource],
    costs: &CostTable,
    verbosity: u8,
) -> AssignmentOutcome {
    let count = workflow.len();
    let mut assigner = Assigner {
        workflow,
        resources,
        outcome: AssignmentOutcome::default(),
        verbosity,
    };

    for id in 0..count {
        match costs[id].cheapest() {
            Some(candidate) => assigner.bind(id, candidate),
            None => assigner.leave_unassigned(id),
        }
    }

    assigner.outcome
}

//! Per-depth deadlines derived from critical tasks.

use crate::log_changes;
use crate::workflow::Workflow;

use super::types::{CostTable, DeadlineTable};

/// Derive the allowed cost of every depth level that holds a critical task.
///
/// The deadline of a depth is the largest cheapest-feasible cost among its
/// critical tasks: every task at that level has to fit inside the budget of
/// the slowest critical sibling. Critical tasks with an empty cost map do
/// not contribute, and depths without a contributing critical task get no
/// entry.
pub fn propagate_deadlines(
    workflow: &Workflow,
    costs: &CostTable,
    verbosity: u8,
) -> DeadlineTable {
    let mut deadlines = DeadlineTable::new();

    for (id, node) in workflow.nodes().iter().enumerate() {
        if !node.is_critical {
            continue;
        }
        let Some(cheapest) = costs[id].cheapest() else {
            continue;
        };
        deadlines
            .entry(node.depth)
            .and_modify(|d| *d = d.max(cheapest.cost))
            .or_insert(cheapest.cost);
    }

    for (depth, deadline) in &deadlines {
        log_changes!(verbosity, "Deadline for depth {}: {:.3}", depth, deadline);
    }
    deadlines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Resource, Task};
    use crate::planning::cost::estimate_costs;
    use crate::planning::criticality::classify_criticality;
    use crate::planning::timing::analyze_timing;

    fn make_task(id: &str, length: f64, parents: Vec<&str>) -> Task {
        Task {
            id: id.to_string(),
            length,
            cores: 1,
            depth: None,
            parents: parents.into_iter().map(String::from).collect(),
            files: vec![],
        }
    }

    fn make_resource(id: &str, throughput: f64) -> Resource {
        Resource {
            id: id.to_string(),
            throughput,
            cores: 1,
            bandwidth: 100.0,
        }
    }

    fn deadlines_for(tasks: Vec<Task>, resources: &[Resource]) -> DeadlineTable {
        let mut workflow = Workflow::from_tasks(&tasks).unwrap();
        analyze_timing(&mut workflow, 0);
        classify_criticality(&mut workflow, 0);
        let costs = estimate_costs(&workflow, resources, None, 0);
        propagate_deadlines(&workflow, &costs, 0)
    }

    #[test]
    fn test_max_over_critical_siblings() {
        // Two independent critical chains share depths 0 and 1
        let resources = vec![make_resource("fast", 4.0), make_resource("slow", 2.0)];
        let deadlines = deadlines_for(
            vec![
                make_task("a", 4.0, vec![]),
                make_task("b", 8.0, vec!["a"]),
                make_task("x", 8.0, vec![]),
                make_task("y", 4.0, vec!["x"]),
            ],
            &resources,
        );

        // depth 0: max(4/4, 8/4) = 2; depth 1: max(8/4, 4/4) = 2
        assert_eq!(deadlines.get(&0), Some(&2.0));
        assert_eq!(deadlines.get(&1), Some(&2.0));
    }

    #[test]
    fn test_noncritical_only_depth_has_no_entry() {
        // a -> b -> d is critical; c (slack 2) is placed alone at depth 5,
        // which pushes d to depth 6
        let mut c = make_task("c", 1.0, vec!["a"]);
        c.depth = Some(5);
        let resources = vec![make_resource("r0", 1.0)];
        let deadlines = deadlines_for(
            vec![
                make_task("a", 1.0, vec![]),
                make_task("b", 3.0, vec!["a"]),
                c,
                make_task("d", 1.0, vec!["b", "c"]),
            ],
            &resources,
        );

        assert_eq!(deadlines.keys().copied().collect::<Vec<_>>(), vec![0, 1, 6]);
        assert!(deadlines.get(&5).is_none());
    }

    #[test]
    fn test_critical_without_candidates_contributes_nothing() {
        // Throughput below 1 puts every critical task over its window
        let resources = vec![make_resource("slow", 0.5)];
        let deadlines = deadlines_for(
            vec![make_task("a", 2.0, vec![]), make_task("b", 2.0, vec!["a"])],
            &resources,
        );
        assert!(deadlines.is_empty());
    }

    #[test]
    fn test_depths_iterate_ascending() {
        let resources = vec![make_resource("r0", 1.0)];
        let mut late = make_task("late", 1.0, vec![]);
        late.depth = Some(9);
        let mut early = make_task("early", 1.0, vec![]);
        early.depth = Some(2);
        let deadlines = deadlines_for(vec![late, early], &resources);
        assert_eq!(deadlines.keys().copied().collect::<Vec<_>>(), vec![2, 9]);
    }
}

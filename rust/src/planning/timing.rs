//! Graph timing analysis using forward and backward passes.

use crate::log_debug;
use crate::workflow::Workflow;

/// Compute earliest and latest start/finish times for every task.
///
/// The arena must be in topological order (parents before children). This
/// is not verified: out-of-order input produces wrong times, not a panic.
///
/// Each sink anchors its own latest finish at its earliest finish, so a
/// workflow with several sinks has no single global deadline.
///
/// Returns the makespan (largest earliest finish).
pub fn analyze_timing(workflow: &mut Workflow, verbosity: u8) -> f64 {
    let nodes = workflow.nodes_mut();

    // Forward pass: earliest start = max finish of all parents
    for id in 0..nodes.len() {
        let earliest_start = nodes[id]
            .parents
            .iter()
            .map(|&p| nodes[p].timing.earliest_finish)
            .fold(0.0, f64::max);

        let node = &mut nodes[id];
        node.timing.earliest_start = earliest_start;
        node.timing.earliest_finish = earliest_start + node.duration();
    }

    // Backward pass: latest finish = min latest start of all children
    for id in (0..nodes.len()).rev() {
        let latest_finish = if nodes[id].children.is_empty() {
            nodes[id].timing.earliest_finish
        } else {
            nodes[id]
                .children
                .iter()
                .map(|&c| nodes[c].timing.latest_start)
                .fold(f64::INFINITY, f64::min)
        };

        let node = &mut nodes[id];
        node.timing.latest_finish = latest_finish;
        node.timing.latest_start = latest_finish - node.duration();

        log_debug!(
            verbosity,
            "  Timing {}: ES={} EF={} LS={} LF={}",
            node.id,
            node.timing.earliest_start,
            node.timing.earliest_finish,
            node.timing.latest_start,
            node.timing.latest_finish
        );
    }

    nodes
        .iter()
        .map(|n| n.timing.earliest_finish)
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

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

    fn analyzed(tasks: Vec<Task>) -> (Workflow, f64) {
        let mut workflow = Workflow::from_tasks(&tasks).unwrap();
        let makespan = analyze_timing(&mut workflow, 0);
        (workflow, makespan)
    }

    #[test]
    fn test_chain_timing() {
        // a -> b -> c
        let (workflow, makespan) = analyzed(vec![
            make_task("a", 2.0, vec![]),
            make_task("b", 3.0, vec!["a"]),
            make_task("c", 4.0, vec!["b"]),
        ]);

        assert_eq!(makespan, 9.0);
        let c = workflow.get("c").unwrap().timing;
        assert_eq!(c.earliest_start, 5.0);
        assert_eq!(c.earliest_finish, 9.0);
        let a = workflow.get("a").unwrap().timing;
        assert_eq!(a.latest_start, 0.0);
        assert_eq!(a.latest_finish, 2.0);
    }

    #[test]
    fn test_diamond_timing() {
        // a -> b -> d
        // a -> c -> d
        let (workflow, makespan) = analyzed(vec![
            make_task("a", 1.0, vec![]),
            make_task("b", 5.0, vec!["a"]),
            make_task("c", 2.0, vec!["a"]),
            make_task("d", 1.0, vec!["b", "c"]),
        ]);

        assert_eq!(makespan, 7.0);
        assert_eq!(workflow.get("a").unwrap().timing.earliest_finish, 1.0);
        assert_eq!(workflow.get("b").unwrap().timing.earliest_finish, 6.0);
        assert_eq!(workflow.get("c").unwrap().timing.earliest_finish, 3.0);
        assert_eq!(workflow.get("d").unwrap().timing.earliest_start, 6.0);

        // c may finish as late as d's latest start
        let c = workflow.get("c").unwrap().timing;
        assert_eq!(c.latest_finish, 6.0);
        assert_eq!(c.latest_start, 4.0);
    }

    #[test]
    fn test_each_sink_anchors_itself() {
        // a -> long (10), a -> short (1); both are sinks
        let (workflow, _) = analyzed(vec![
            make_task("a", 1.0, vec![]),
            make_task("long", 10.0, vec!["a"]),
            make_task("short", 1.0, vec!["a"]),
        ]);

        let short = workflow.get("short").unwrap().timing;
        assert_eq!(short.latest_finish, short.earliest_finish);
        assert_eq!(short.latest_finish, 2.0);
    }

    #[test]
    fn test_earliest_finish_is_start_plus_duration() {
        let (workflow, _) = analyzed(vec![
            make_task("a", 1.5, vec![]),
            make_task("b", 0.25, vec!["a"]),
            make_task("c", 3.0, vec![]),
            make_task("d", 2.0, vec!["b", "c"]),
        ]);

        for node in workflow.nodes() {
            assert_eq!(
                node.timing.earliest_finish,
                node.timing.earliest_start + node.duration()
            );
        }
    }

    #[test]
    fn test_empty_workflow() {
        let (workflow, makespan) = analyzed(vec![]);
        assert!(workflow.is_empty());
        assert_eq!(makespan, 0.0);
    }
}

//! Slack and critical-path classification.

use crate::workflow::Workflow;
use crate::{log_changes, log_checks};

/// Slack magnitudes below this are treated as zero.
pub const SLACK_EPSILON: f64 = 1e-9;

/// Critical versus non-critical task counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CriticalitySummary {
    pub critical: usize,
    pub non_critical: usize,
}

/// Derive slack and critical-path membership from the timing fields.
///
/// Slack is `latest_finish - earliest_finish`. Values within
/// [`SLACK_EPSILON`] of zero, and negative values (only possible when the
/// input was not topologically ordered), are stored as exactly 0 so that
/// `is_critical` holds iff `slack == 0.0`.
pub fn classify_criticality(workflow: &mut Workflow, verbosity: u8) -> CriticalitySummary {
    let mut summary = CriticalitySummary::default();

    for node in workflow.nodes_mut() {
        let raw = node.timing.latest_finish - node.timing.earliest_finish;
        if raw < -SLACK_EPSILON {
            log_checks!(
                verbosity,
                "  Negative slack {} on task {} (input not in topological order?)",
                raw,
                node.id
            );
        }
        let slack = if raw < SLACK_EPSILON { 0.0 } else { raw };

        node.timing.slack = slack;
        node.is_critical = slack == 0.0;
        if node.is_critical {
            summary.critical += 1;
        } else {
            summary.non_critical += 1;
        }
    }

    log_changes!(
        verbosity,
        "Critical tasks: {} Non-critical tasks: {}",
        summary.critical,
        summary.non_critical
    );
    summary
}

//! Static critical-path planning.
//!
//! The pipeline runs once per workflow, in order:
//! 1. timing analysis (forward and backward pass)
//! 2. criticality classification (slack, critical flag)
//! 3. cost estimation (feasible resources per task, optional transfer term)
//! 4. deadline propagation (per-depth cost ceilings)
//! 5. resource assignment
//!
//! Each stage is a free function over a [`Workflow`](crate::workflow::Workflow)
//! borrowed exclusively for the run. Strategies in [`strategy`] compose them.

mod assignment;
mod cost;
mod criticality;
mod deadline;
pub mod strategy;
mod timing;
mod transfer;
pub mod types;

pub use assignment::{assign_cheapest, assign_resources, AssignmentOutcome};
pub use cost::estimate_costs;
pub use criticality::{classify_criticality, CriticalitySummary, SLACK_EPSILON};
pub use deadline::propagate_deadlines;
pub use strategy::{
    plan, CriticalPathStrategy, EnhancedCpmStrategy, PlanError, PlanningStrategy,
    StrategyRegistry,
};
pub use timing::analyze_timing;
pub use transfer::{incoming_transfer_costs, mean_bandwidth, transfer_cost};
pub use types::{Candidate, CostMap, CostTable, DeadlineTable, PlanReport, ResourceId, TaskTiming};

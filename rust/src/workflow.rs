//! Arena representation of a workflow for one planning run.
//!
//! Tasks are stored in loader order and addressed by integer index. Each
//! node keeps explicit parent and child index lists instead of references
//! to other nodes.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{DataFile, PlannedTask, Resource, Task};
use crate::planning::types::{ResourceId, TaskTiming};

/// Index of a task in the arena (its position in the loader's list).
pub type TaskId = usize;

/// Errors raised while building the arena from loader input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("Duplicate task id: {0}")]
    DuplicateTask(String),
    #[error("Task {task} depends on unknown task {parent}")]
    UnknownParent { task: String, parent: String },
    #[error("Task {task} has invalid length {length}")]
    InvalidLength { task: String, length: f64 },
}

/// Resource binding state of a task.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Assignment {
    /// Not processed by an assignment stage yet.
    #[default]
    Pending,
    Assigned { resource: ResourceId, cost: f64 },
    /// No resource satisfied the core and time constraints.
    Unassigned,
}

impl Assignment {
    pub fn resource(&self) -> Option<ResourceId> {
        match self {
            Assignment::Assigned { resource, .. } => Some(*resource),
            _ => None,
        }
    }
}

/// A task plus the annotations the planning stages write.
#[derive(Clone, Debug)]
pub struct TaskNode {
    pub id: String,
    pub length: f64,
    pub cores: u32,
    pub depth: u32,
    pub parents: Vec<TaskId>,
    pub children: Vec<TaskId>,
    pub files: Vec<DataFile>,
    pub timing: TaskTiming,
    pub is_critical: bool,
    pub assignment: Assignment,
}

impl TaskNode {
    /// Resource-independent planning duration.
    pub fn duration(&self) -> f64 {
        self.length
    }
}

/// Task arena for a single planning run.
#[derive(Clone, Debug, Default)]
pub struct Workflow {
    nodes: Vec<TaskNode>,
    index: FxHashMap<String, TaskId>,
}

impl Workflow {
    /// Build the arena from a topologically ordered task list.
    ///
    /// Parent identifiers are resolved to indices and child lists are
    /// derived from them. Tasks without an explicit depth get
    /// `1 + max(parent depth)`, or 0 for roots. The ordering itself is not
    /// checked.
    pub fn from_tasks(tasks: &[Task]) -> Result<Self, WorkflowError> {
        let mut index: FxHashMap<String, TaskId> =
            FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());
        for (id, task) in tasks.iter().enumerate() {
            if !task.length.is_finite() || task.length < 0.0 {
                return Err(WorkflowError::InvalidLength {
                    task: task.id.clone(),
                    length: task.length,
                });
            }
            if index.insert(task.id.clone(), id).is_some() {
                return Err(WorkflowError::DuplicateTask(task.id.clone()));
            }
        }

        let mut parents: Vec<Vec<TaskId>> = vec![Vec::new(); tasks.len()];
        let mut children: Vec<Vec<TaskId>> = vec![Vec::new(); tasks.len()];
        for (id, task) in tasks.iter().enumerate() {
            for parent_id in &task.parents {
                let Some(&parent) = index.get(parent_id) else {
                    return Err(WorkflowError::UnknownParent {
                        task: task.id.clone(),
                        parent: parent_id.clone(),
                    });
                };
                // Parents form a set; repeated edges are ignored
                if parents[id].contains(&parent) {
                    continue;
                }
                parents[id].push(parent);
                children[parent].push(id);
            }
        }

        let mut depths: Vec<u32> = tasks.iter().map(|t| t.depth.unwrap_or(0)).collect();
        for (id, task) in tasks.iter().enumerate() {
            if task.depth.is_none() {
                let depth = parents[id]
                    .iter()
                    .map(|&p| depths[p] + 1)
                    .max()
                    .unwrap_or(0);
                depths[id] = depth;
            }
        }

        let nodes = tasks
            .iter()
            .zip(parents)
            .zip(children)
            .zip(depths)
            .map(|(((task, parents), children), depth)| TaskNode {
                id: task.id.clone(),
                length: task.length,
                cores: task.cores,
                depth,
                parents,
                children,
                files: task.files.clone(),
                timing: TaskTiming::default(),
                is_critical: false,
                assignment: Assignment::Pending,
            })
            .collect();

        Ok(Self { nodes, index })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[TaskNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [TaskNode] {
        &mut self.nodes
    }

    pub fn node(&self, id: TaskId) -> &TaskNode {
        &self.nodes[id]
    }

    /// Look up a task by its string identifier.
    pub fn get(&self, task_id: &str) -> Option<&TaskNode> {
        self.index.get(task_id).map(|&id| &self.nodes[id])
    }

    pub fn get_id(&self, task_id: &str) -> Option<TaskId> {
        self.index.get(task_id).copied()
    }

    /// Task ids grouped by depth, ascending; each group keeps list order.
    pub fn tasks_by_depth(&self) -> BTreeMap<u32, Vec<TaskId>> {
        let mut levels: BTreeMap<u32, Vec<TaskId>> = BTreeMap::new();
        for (id, node) in self.nodes.iter().enumerate() {
            levels.entry(node.depth).or_default().push(id);
        }
        levels
    }

    /// Export the annotations in input order.
    pub fn to_planned_tasks(&self, resources: &[Resource]) -> Vec<PlannedTask> {
        self.nodes
            .iter()
            .map(|node| {
                let (resource_id, cost) = match node.assignment {
                    Assignment::Assigned { resource, cost } => {
                        (resources.get(resource).map(|r| r.id.clone()), Some(cost))
                    }
                    Assignment::Pending | Assignment::Unassigned => (None, None),
                };
                PlannedTask {
                    task_id: node.id.clone(),
                    depth: node.depth,
                    earliest_start: node.timing.earliest_start,
                    earliest_finish: node.timing.earliest_finish,
                    latest_start: node.timing.latest_start,
                    latest_finish: node.timing.latest_finish,
                    slack: node.timing.slack,
                    is_critical: node.is_critical,
                    resource_id,
                    cost,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_adjacency_lists_built_from_parents() {
        let tasks = vec![
            make_task("a", 1.0, vec![]),
            make_task("b", 5.0, vec!["a"]),
            make_task("c", 2.0, vec!["a"]),
            make_task("d", 1.0, vec!["b", "c"]),
        ];
        let workflow = Workflow::from_tasks(&tasks).unwrap();

        assert_eq!(workflow.len(), 4);
        assert_eq!(workflow.node(0).children, vec![1, 2]);
        assert_eq!(workflow.node(3).parents, vec![1, 2]);
        assert!(workflow.node(3).children.is_empty());
        assert_eq!(workflow.get_id("c"), Some(2));
        assert_eq!(workflow.get("d").map(|n| n.length), Some(1.0));
    }

    #[test]
    fn test_depth_computed_when_missing() {
        // d sits one level below its deepest parent
        let tasks = vec![
            make_task("a", 1.0, vec![]),
            make_task("b", 1.0, vec!["a"]),
            make_task("c", 1.0, vec!["b"]),
            make_task("d", 1.0, vec!["a", "c"]),
        ];
        let workflow = Workflow::from_tasks(&tasks).unwrap();
        let depths: Vec<u32> = workflow.nodes().iter().map(|n| n.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_explicit_depth_is_kept() {
        let mut b = make_task("b", 1.0, vec!["a"]);
        b.depth = Some(7);
        let tasks = vec![make_task("a", 1.0, vec![]), b];
        let workflow = Workflow::from_tasks(&tasks).unwrap();
        assert_eq!(workflow.node(1).depth, 7);
    }

    #[test]
    fn test_duplicate_parent_edge_ignored() {
        let tasks = vec![make_task("a", 1.0, vec![]), make_task("b", 1.0, vec!["a", "a"])];
        let workflow = Workflow::from_tasks(&tasks).unwrap();
        assert_eq!(workflow.node(1).parents, vec![0]);
        assert_eq!(workflow.node(0).children, vec![1]);
    }

    #[test]
    fn test_duplicate_task_rejected() {
        let tasks = vec![make_task("a", 1.0, vec![]), make_task("a", 2.0, vec![])];
        assert_eq!(
            Workflow::from_tasks(&tasks).unwrap_err(),
            WorkflowError::DuplicateTask("a".to_string())
        );
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let tasks = vec![make_task("b", 1.0, vec!["missing"])];
        let err = Workflow::from_tasks(&tasks).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::UnknownParent {
                task: "b".to_string(),
                parent: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_negative_length_rejected() {
        let tasks = vec![make_task("a", -1.0, vec![])];
        assert!(matches!(
            Workflow::from_tasks(&tasks),
            Err(WorkflowError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_tasks_by_depth_keeps_list_order() {
        let tasks = vec![
            make_task("a", 1.0, vec![]),
            make_task("b", 1.0, vec!["a"]),
            make_task("x", 1.0, vec![]),
            make_task("c", 1.0, vec!["a"]),
        ];
        let workflow = Workflow::from_tasks(&tasks).unwrap();
        let levels = workflow.tasks_by_depth();
        assert_eq!(levels.get(&0), Some(&vec![0, 2]));
        assert_eq!(levels.get(&1), Some(&vec![1, 3]));
    }

    #[test]
    fn test_planned_tasks_report_assignment() {
        let tasks = vec![make_task("a", 1.0, vec![]), make_task("b", 1.0, vec![])];
        let resources = vec![Resource {
            id: "vm0".to_string(),
            throughput: 1.0,
            cores: 1,
            bandwidth: 0.0,
        }];
        let mut workflow = Workflow::from_tasks(&tasks).unwrap();
        workflow.nodes_mut()[0].assignment = Assignment::Assigned {
            resource: 0,
            cost: 1.0,
        };
        workflow.nodes_mut()[1].assignment = Assignment::Unassigned;

        let planned = workflow.to_planned_tasks(&resources);
        assert_eq!(planned[0].resource_id.as_deref(), Some("vm0"));
        assert_eq!(planned[0].cost, Some(1.0));
        assert_eq!(planned[1].resource_id, None);
        assert_eq!(planned[1].cost, None);
    }
}

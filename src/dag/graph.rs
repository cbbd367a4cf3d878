// src/dag/graph.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::dag::registry::Dependencies;
use crate::engine::TaskName;
use crate::errors::{Result, StyledagError};

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone)]
struct DagNode {
    /// Direct dependencies: tasks that must finish before this one runs.
    deps: Vec<TaskName>,
    /// Direct dependents: tasks that list this one as a dependency.
    dependents: Vec<TaskName>,
}

/// Adjacency view of the task registry, keyed by task name.
///
/// Used for validation (unknown names, cycles) and for `--dry-run` output.
#[derive(Debug, Clone)]
pub struct DagGraph {
    nodes: BTreeMap<TaskName, DagNode>,
}

impl DagGraph {
    /// Build the graph from `(name, dependencies)` pairs.
    ///
    /// Fails on dependencies that name no task, on self-dependencies and on
    /// cycles.
    pub fn build<'a>(
        tasks: impl IntoIterator<Item = (&'a TaskName, &'a Dependencies)>,
    ) -> Result<Self> {
        let mut nodes: BTreeMap<TaskName, DagNode> = BTreeMap::new();

        // First pass: create nodes with their dependency lists.
        for (name, deps) in tasks {
            nodes.insert(
                name.clone(),
                DagNode {
                    deps: deps.names().to_vec(),
                    dependents: Vec::new(),
                },
            );
        }

        // Second pass: check references and populate dependents.
        let edges: Vec<(TaskName, TaskName)> = nodes
            .iter()
            .flat_map(|(name, node)| node.deps.iter().map(move |d| (d.clone(), name.clone())))
            .collect();

        for (dep, task) in &edges {
            if dep == task {
                return Err(StyledagError::ConfigError(format!(
                    "task '{task}' cannot depend on itself"
                )));
            }
            match nodes.get_mut(dep) {
                Some(dep_node) => dep_node.dependents.push(task.clone()),
                None => {
                    return Err(StyledagError::ConfigError(format!(
                        "task '{task}' has unknown dependency '{dep}'"
                    )));
                }
            }
        }

        let graph = Self { nodes };
        graph.check_acyclic()?;
        Ok(graph)
    }

    fn check_acyclic(&self) -> Result<()> {
        // Edge direction: dep -> task
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for name in self.nodes.keys() {
            graph.add_node(name.as_str());
        }

        for (name, node) in &self.nodes {
            for dep in &node.deps {
                graph.add_edge(dep.as_str(), name.as_str(), ());
            }
        }

        // A topological sort will fail if there is a cycle.
        match toposort(&graph, None) {
            Ok(_order) => Ok(()),
            Err(cycle) => Err(StyledagError::DagCycle(format!(
                "cycle detected in task graph involving task '{}'",
                cycle.node_id()
            ))),
        }
    }

    /// Immediate dependents of a task.
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }
}

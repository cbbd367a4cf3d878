// src/dag/registry.rs

//! Explicit task registry: name → (dependencies, action).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::dag::graph::DagGraph;
use crate::engine::TaskName;
use crate::errors::{Result, StyledagError};
use crate::tasks::{NoopAction, TaskAction};

/// Tasks that must finish before a task's own action runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dependencies {
    #[default]
    None,
    /// Run one after another; each starts only once the previous finished.
    Sequence(Vec<TaskName>),
    /// Start all at once and wait for all. No ordering between them.
    Parallel(Vec<TaskName>),
}

impl Dependencies {
    pub fn sequence<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskName>,
    {
        Dependencies::Sequence(names.into_iter().map(Into::into).collect())
    }

    pub fn parallel<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskName>,
    {
        Dependencies::Parallel(names.into_iter().map(Into::into).collect())
    }

    pub fn names(&self) -> &[TaskName] {
        match self {
            Dependencies::None => &[],
            Dependencies::Sequence(names) | Dependencies::Parallel(names) => names,
        }
    }
}

impl fmt::Display for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependencies::None => f.write_str("-"),
            Dependencies::Sequence(names) => write!(f, "sequence [{}]", names.join(" -> ")),
            Dependencies::Parallel(names) => write!(f, "parallel [{}]", names.join(", ")),
        }
    }
}

/// A registered task.
#[derive(Clone)]
pub struct TaskEntry {
    name: TaskName,
    deps: Dependencies,
    action: Arc<dyn TaskAction>,
}

impl TaskEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.deps
    }

    pub fn action(&self) -> &Arc<dyn TaskAction> {
        &self.action
    }
}

impl fmt::Debug for TaskEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskEntry")
            .field("name", &self.name)
            .field("deps", &self.deps)
            .finish_non_exhaustive()
    }
}

/// Immutable, validated set of tasks.
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    tasks: BTreeMap<TaskName, TaskEntry>,
    graph: DagGraph,
}

impl TaskRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&TaskEntry> {
        self.tasks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Task names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(|s| s.as_str())
    }

    pub fn dependencies_of(&self, name: &str) -> Option<&Dependencies> {
        self.tasks.get(name).map(|t| &t.deps)
    }

    pub fn graph(&self) -> &DagGraph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Collects task definitions and validates them as a whole in [`build`].
///
/// [`build`]: RegistryBuilder::build
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<TaskEntry>,
}

impl RegistryBuilder {
    /// Register a task with its own action.
    pub fn task(
        mut self,
        name: impl Into<TaskName>,
        deps: Dependencies,
        action: Arc<dyn TaskAction>,
    ) -> Self {
        self.entries.push(TaskEntry {
            name: name.into(),
            deps,
            action,
        });
        self
    }

    /// Register a task that only runs its dependencies.
    pub fn alias(self, name: impl Into<TaskName>, deps: Dependencies) -> Self {
        self.task(name, deps, Arc::new(NoopAction))
    }

    /// Validate and freeze the registry.
    ///
    /// - names must be unique and non-empty;
    /// - every dependency must name a registered task;
    /// - the dependency graph must be acyclic.
    pub fn build(self) -> Result<TaskRegistry> {
        let mut tasks: BTreeMap<TaskName, TaskEntry> = BTreeMap::new();

        for entry in self.entries {
            if entry.name.trim().is_empty() {
                return Err(StyledagError::ConfigError(
                    "task names must not be empty".to_string(),
                ));
            }
            if tasks.contains_key(&entry.name) {
                return Err(StyledagError::ConfigError(format!(
                    "task '{}' is registered more than once",
                    entry.name
                )));
            }
            tasks.insert(entry.name.clone(), entry);
        }

        let graph = DagGraph::build(tasks.iter().map(|(name, t)| (name, &t.deps)))?;

        Ok(TaskRegistry { tasks, graph })
    }
}

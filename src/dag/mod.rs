// src/dag/mod.rs

//! Task registry and its dependency graph.
//!
//! - [`registry`] maps task names to their action and dependency list.
//! - [`graph`] is the adjacency view used for validation and diagnostics.

pub mod graph;
pub mod registry;

pub use graph::DagGraph;
pub use registry::{Dependencies, RegistryBuilder, TaskEntry, TaskRegistry};

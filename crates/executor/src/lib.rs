//! Task-graph construction and execution for parlay layout.
//!
//! [`TaskGraph::build`] walks a box tree once, emitting two schedulable units
//! per node (pre and post) with precedence edges mirroring the tree.
//! [`GraphExecutor`] runs the graph on a fixed-size worker pool, repeatedly
//! for benchmarking; [`run_serial`] is the single-threaded reference path the
//! parallel runs are validated against.

use parlay_layout::LayoutError;
use thiserror::Error;

mod builder;
mod runner;

pub use builder::{Phase, Task, TaskGraph, TaskHandle};
pub use runner::{GraphExecutor, run_serial};

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Task id {0:#08x} is already taken; ids must be unique within one build")]
    DuplicateTaskId(u32),
    #[error("Failed to build worker pool: {0}")]
    Pool(String),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

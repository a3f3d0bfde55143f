//! Worker-pool execution of a task graph.
//!
//! Scheduling is countdown based: every task carries an atomic indegree, and
//! the worker that decrements a successor to zero submits it. Tasks touch
//! node state through the tree's pass accessors; the graph's edges are the
//! only synchronization, which is exactly the contract the tree's node cells
//! document. Two runs over the same tree never overlap because `run` drives
//! repetitions back to back and a scope drains fully before the next starts.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parlay_layout::{LayoutEnvironment, LayoutError, LayoutTree, NodeId};
use rayon::Scope;

use crate::GraphError;
use crate::builder::{Phase, TaskGraph, TaskHandle};

/// Shared state for one graph execution.
struct RunState<'a> {
    tree: &'a LayoutTree,
    graph: &'a TaskGraph,
    env: &'a LayoutEnvironment,
    pending: Vec<AtomicUsize>,
    failure: Mutex<Option<LayoutError>>,
}

/// A fixed-size worker pool executing task graphs.
pub struct GraphExecutor {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl GraphExecutor {
    /// Builds a pool with exactly `workers` threads.
    pub fn new(workers: usize) -> Result<Self, GraphError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("parlay-worker-{index}"))
            .build()
            .map_err(|err| GraphError::Pool(err.to_string()))?;
        Ok(Self { pool, workers })
    }

    /// One worker per available core.
    pub fn with_default_workers() -> Result<Self, GraphError> {
        Self::new(num_cpus::get())
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Executes the graph `repetitions` times over the same tree and returns
    /// the total wall time. Timing accumulators are reset per repetition;
    /// geometry is fully recomputed, so repeated runs are idempotent.
    pub fn run(
        &self,
        tree: &LayoutTree,
        graph: &TaskGraph,
        env: &LayoutEnvironment,
        repetitions: u32,
    ) -> Result<Duration, GraphError> {
        log::debug!(
            "running {} tasks ({} edges) x{repetitions} on {} workers",
            graph.len(),
            graph.edge_count(),
            self.workers
        );
        let started = Instant::now();
        for _ in 0..repetitions {
            tree.reset_timings();
            self.execute_once(tree, graph, env)?;
        }
        Ok(started.elapsed())
    }

    fn execute_once(
        &self,
        tree: &LayoutTree,
        graph: &TaskGraph,
        env: &LayoutEnvironment,
    ) -> Result<(), GraphError> {
        let state = RunState {
            tree,
            graph,
            env,
            pending: graph
                .indegrees()
                .iter()
                .map(|&degree| AtomicUsize::new(degree))
                .collect(),
            failure: Mutex::new(None),
        };

        self.pool.scope(|scope| {
            for source in graph.sources() {
                submit(&state, source, scope);
            }
        });

        match state.failure.into_inner() {
            Ok(Some(err)) => Err(err.into()),
            _ => Ok(()),
        }
    }
}

fn submit<'s>(state: &'s RunState<'s>, handle: TaskHandle, scope: &Scope<'s>) {
    scope.spawn(move |scope| {
        // A recorded failure stops the frontier from advancing; the scope
        // drains whatever was already submitted.
        if state.failure.lock().map(|slot| slot.is_some()).unwrap_or(true) {
            return;
        }

        let task = state.graph.task(handle);
        let result = match task.phase {
            Phase::Pre { recurse } => state.tree.pre_layout(task.node, recurse, state.env),
            Phase::Post => state.tree.post_layout(task.node),
            Phase::Barrier => Ok(()),
        };

        match result {
            Ok(()) => {
                for &successor in state.graph.successors(handle) {
                    // The last finished predecessor hands the successor over;
                    // AcqRel publishes its writes to whoever runs it.
                    if state.pending[successor].fetch_sub(1, Ordering::AcqRel) == 1 {
                        submit(state, successor, scope);
                    }
                }
            }
            Err(err) => {
                if let Ok(mut slot) = state.failure.lock() {
                    slot.get_or_insert(err);
                }
            }
        }
    });
}

/// The single-threaded reference path: fully recursive pre passes driven from
/// the root, repeated like [`GraphExecutor::run`].
pub fn run_serial(
    tree: &LayoutTree,
    root: NodeId,
    env: &LayoutEnvironment,
    repetitions: u32,
) -> Result<Duration, GraphError> {
    let started = Instant::now();
    for _ in 0..repetitions {
        tree.reset_timings();
        tree.pre_layout(root, true, env)?;
    }
    Ok(started.elapsed())
}

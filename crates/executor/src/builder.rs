//! Recursive translation of a box tree into a precedence DAG.
//!
//! Default rule: a node gets a `pre` task (constraint propagation only) and a
//! `post` task (size fold), with `pre -> child.pre` and `child.post -> post`
//! for every structural child. Leaves, flattened subtrees, and Stack nodes
//! collapse instead: one serial `pre` task drives the whole subtree and the
//! `post` task degrades to a barrier, so any node's (pre, post) pair wires
//! uniformly into its parent regardless of how its subtree was scheduled.
//!
//! Row/Column gate flex children behind the container's own `post` (Phase B
//! assigns their intervals there). A flex child's `post` is deliberately not
//! wired back into the container's `post`: the container's size is final
//! after Phase B, so awaiting the child would only serialize. Consumers that
//! read flex-child geometry before the whole run drains can observe stale
//! values; this relaxation is part of the scheduling contract.

use std::collections::{HashMap, HashSet};

use parlay_layout::{BoxKind, LayoutTree, NodeId};

use crate::GraphError;

/// Index of a task in its graph.
pub type TaskHandle = usize;

/// What a task executes against its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Run the pre pass. With `recurse`, the task drives the entire subtree
    /// serially, including the node's own post pass.
    Pre { recurse: bool },
    /// Run the post pass.
    Post,
    /// No-op placeholder standing in for the post of a collapsed subtree.
    Barrier,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub node: NodeId,
    pub task_id: u32,
    pub phase: Phase,
}

/// An acyclic precedence graph over layout tasks, adjacency stored as
/// successor lists.
#[derive(Debug, Default)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    successors: Vec<Vec<TaskHandle>>,
    indegree: Vec<usize>,
    pairs: HashMap<NodeId, (TaskHandle, TaskHandle)>,
}

impl TaskGraph {
    /// Walks the tree rooted at `root` and emits the full graph.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateTaskId`] when two nodes in the subtree share a
    /// task id, including nodes inside collapsed subtrees that never get
    /// scheduled individually.
    pub fn build(tree: &LayoutTree, root: NodeId) -> Result<Self, GraphError> {
        let mut seen_ids = HashSet::new();
        let mut frontier = vec![root];
        while let Some(id) = frontier.pop() {
            let node = tree.node(id);
            if !seen_ids.insert(node.task_id) {
                return Err(GraphError::DuplicateTaskId(node.task_id));
            }
            frontier.extend(node.child_ids());
        }

        let mut graph = TaskGraph::default();
        graph.build_node(tree, root);
        Ok(graph)
    }

    fn build_node(&mut self, tree: &LayoutTree, id: NodeId) -> (TaskHandle, TaskHandle) {
        let node = tree.node(id);
        let children = node.child_ids();
        // Stack layout is inherently serial; its subtree always collapses.
        let collapse =
            node.flatten || children.is_empty() || matches!(node.kind, BoxKind::Stack { .. });

        if collapse {
            let pre = self.push_task(id, node.task_id, Phase::Pre { recurse: true });
            let post = self.push_task(id, node.task_id, Phase::Barrier);
            self.add_edge(pre, post);
            self.pairs.insert(id, (pre, post));
            return (pre, post);
        }

        let pre = self.push_task(id, node.task_id, Phase::Pre { recurse: false });
        let post = self.push_task(id, node.task_id, Phase::Post);
        // Within one node, pre always precedes post even when no child path
        // connects them.
        self.add_edge(pre, post);
        self.pairs.insert(id, (pre, post));

        let gates_flex = matches!(node.kind, BoxKind::Row { .. } | BoxKind::Column { .. });
        for child_id in children {
            let (child_pre, child_post) = self.build_node(tree, child_id);
            if gates_flex && tree.node(child_id).flex > 0.0 {
                // Flex intervals come out of this node's Phase B; the child's
                // own post is left unawaited.
                self.add_edge(post, child_pre);
            } else {
                self.add_edge(pre, child_pre);
                self.add_edge(child_post, post);
            }
        }

        (pre, post)
    }

    fn push_task(&mut self, node: NodeId, task_id: u32, phase: Phase) -> TaskHandle {
        self.tasks.push(Task {
            node,
            task_id,
            phase,
        });
        self.successors.push(Vec::new());
        self.indegree.push(0);
        self.tasks.len() - 1
    }

    fn add_edge(&mut self, from: TaskHandle, to: TaskHandle) {
        self.successors[from].push(to);
        self.indegree[to] += 1;
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    pub fn task(&self, handle: TaskHandle) -> &Task {
        &self.tasks[handle]
    }

    pub fn successors(&self, handle: TaskHandle) -> &[TaskHandle] {
        &self.successors[handle]
    }

    /// Indegree per task, the scheduling countdowns for one run.
    pub fn indegrees(&self) -> &[usize] {
        &self.indegree
    }

    /// Tasks with no predecessors; a run starts by submitting these.
    pub fn sources(&self) -> impl Iterator<Item = TaskHandle> + '_ {
        self.indegree
            .iter()
            .enumerate()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(handle, _)| handle)
    }

    /// The (pre, post) pair scheduled for a node, if it was not swallowed by
    /// a collapsed ancestor.
    pub fn pair(&self, node: NodeId) -> Option<(TaskHandle, TaskHandle)> {
        self.pairs.get(&node).copied()
    }

    pub fn contains_edge(&self, from: TaskHandle, to: TaskHandle) -> bool {
        self.successors[from].contains(&to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlay_layout::{BoxNode, EdgeInsets, StackChild};

    #[test]
    fn test_leaf_collapses_to_pre_and_barrier() {
        let mut tree = LayoutTree::new();
        let a = tree.push(BoxNode::sized(1.0, 1.0));
        tree.assign_task_ids();

        let graph = TaskGraph::build(&tree, a).unwrap();
        assert_eq!(graph.len(), 2);

        let (pre, post) = graph.pair(a).unwrap();
        assert_eq!(graph.task(pre).phase, Phase::Pre { recurse: true });
        assert_eq!(graph.task(post).phase, Phase::Barrier);
        assert!(graph.contains_edge(pre, post));
    }

    #[test]
    fn test_wrapper_chain_wires_child_between_pre_and_post() {
        let mut tree = LayoutTree::new();
        let inner = tree.push(BoxNode::sized(1.0, 1.0));
        let pad = tree.push(BoxNode::padding(Some(inner), EdgeInsets::uniform(2.0)));
        tree.assign_task_ids();

        let graph = TaskGraph::build(&tree, pad).unwrap();
        let (pad_pre, pad_post) = graph.pair(pad).unwrap();
        let (inner_pre, inner_post) = graph.pair(inner).unwrap();

        assert_eq!(graph.task(pad_pre).phase, Phase::Pre { recurse: false });
        assert_eq!(graph.task(pad_post).phase, Phase::Post);
        assert!(graph.contains_edge(pad_pre, inner_pre));
        assert!(graph.contains_edge(inner_post, pad_post));
    }

    #[test]
    fn test_flatten_collapses_a_whole_subtree() {
        let mut tree = LayoutTree::new();
        let inner = tree.push(BoxNode::sized(1.0, 1.0));
        let pad =
            tree.push(BoxNode::padding(Some(inner), EdgeInsets::uniform(2.0)).with_flatten(true));
        tree.assign_task_ids();

        let graph = TaskGraph::build(&tree, pad).unwrap();
        // Only the flattened root is scheduled.
        assert_eq!(graph.len(), 2);
        assert!(graph.pair(inner).is_none());
        let (pre, _) = graph.pair(pad).unwrap();
        assert_eq!(graph.task(pre).phase, Phase::Pre { recurse: true });
    }

    #[test]
    fn test_stack_always_collapses() {
        let mut tree = LayoutTree::new();
        let a = tree.push(BoxNode::sized(1.0, 1.0));
        let stack = tree.push(BoxNode::stack(vec![StackChild::new(a, 0.0, 0.0)]));
        tree.assign_task_ids();

        let graph = TaskGraph::build(&tree, stack).unwrap();
        assert_eq!(graph.len(), 2);
        assert!(graph.pair(a).is_none());
    }

    #[test]
    fn test_row_gates_flex_children_behind_its_post() {
        let mut tree = LayoutTree::new();
        let fixed = tree.push(BoxNode::sized(10.0, 10.0));
        let flex = tree.push(BoxNode::sized(0.0, 0.0).with_flex(1.0));
        let row = tree.push(BoxNode::row(vec![fixed, flex]));
        tree.assign_task_ids();

        let graph = TaskGraph::build(&tree, row).unwrap();
        let (row_pre, row_post) = graph.pair(row).unwrap();
        let (fixed_pre, fixed_post) = graph.pair(fixed).unwrap();
        let (flex_pre, flex_post) = graph.pair(flex).unwrap();

        assert!(graph.contains_edge(row_pre, fixed_pre));
        assert!(graph.contains_edge(fixed_post, row_post));
        assert!(graph.contains_edge(row_post, flex_pre));
        // The relaxation: the flex child's post never feeds back.
        assert!(!graph.contains_edge(flex_post, row_post));
    }

    #[test]
    fn test_duplicate_task_ids_fail_construction() {
        let mut tree = LayoutTree::new();
        let a = tree.push(BoxNode::sized(1.0, 1.0).with_task_id(7));
        let b = tree.push(BoxNode::sized(2.0, 2.0).with_task_id(7));
        let row = tree.push(BoxNode::row(vec![a, b]).with_task_id(1));

        let err = TaskGraph::build(&tree, row).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateTaskId(7)));
    }

    #[test]
    fn test_duplicate_ids_inside_collapsed_subtrees_rejected() {
        let mut tree = LayoutTree::new();
        let inner = tree.push(BoxNode::sized(1.0, 1.0).with_task_id(5));
        let pad = tree.push(
            BoxNode::padding(Some(inner), EdgeInsets::uniform(2.0))
                .with_flatten(true)
                .with_task_id(1),
        );
        let root = tree.push(BoxNode::padding(Some(pad), EdgeInsets::zero()).with_task_id(5));

        // `inner` is swallowed by the flattened wrapper and never scheduled,
        // yet its id still counts against the root's.
        let err = TaskGraph::build(&tree, root).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateTaskId(5)));
    }

    #[test]
    fn test_sources_start_at_the_root_pre() {
        let mut tree = LayoutTree::new();
        let inner = tree.push(BoxNode::sized(1.0, 1.0));
        let pad = tree.push(BoxNode::padding(Some(inner), EdgeInsets::uniform(2.0)));
        tree.assign_task_ids();

        let graph = TaskGraph::build(&tree, pad).unwrap();
        let sources: Vec<_> = graph.sources().collect();
        let (pad_pre, _) = graph.pair(pad).unwrap();
        assert_eq!(sources, vec![pad_pre]);
    }
}

//! Arena-backed box tree.
//!
//! Nodes live in a flat arena and reference their children by index, so
//! traversal is strictly top-down and no back-references exist. Structural
//! ownership is exclusive: a node index appears in at most one child list.
//! The layout passes mutate nodes through per-node cells; exclusivity of
//! access is guaranteed by the task graph's precedence edges (or by plain
//! single-threaded traversal), never by locks.

use std::cell::UnsafeCell;
use std::time::Duration;

use parlay_traits::FontSpec;
use parlay_types::{BoxConstraints, EdgeInsets, Size};

/// Index of a node in its [`LayoutTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A Stack child together with its two unclamped alignment scalars.
#[derive(Debug, Clone, Copy)]
pub struct StackChild {
    pub node: NodeId,
    pub align_x: f32,
    pub align_y: f32,
}

impl StackChild {
    pub fn new(node: NodeId, align_x: f32, align_y: f32) -> Self {
        Self {
            node,
            align_x,
            align_y,
        }
    }
}

/// The closed set of node kinds, one record per kind.
#[derive(Debug, Clone)]
pub enum BoxKind {
    /// A box with fixed intrinsic dimensions.
    Sized { width: f32, height: f32 },
    /// A box sized from an image's intrinsic dimensions.
    Image { src: String },
    /// A box sized from wrapped text.
    Text { content: String, font: FontSpec },
    /// A single child inset by padding.
    Padding {
        child: Option<NodeId>,
        padding: EdgeInsets,
    },
    /// A single child inset by padding and margin. The root container
    /// expands to the viewport regardless of its content.
    Container {
        child: Option<NodeId>,
        padding: EdgeInsets,
        margin: EdgeInsets,
        is_root: bool,
    },
    /// Overlapping children, each sized against the container's own interval.
    Stack { children: Vec<StackChild> },
    /// Children laid out horizontally with proportional flex shares.
    Row { children: Vec<NodeId> },
    /// Children laid out vertically with proportional flex shares.
    Column { children: Vec<NodeId> },
}

impl BoxKind {
    pub fn name(&self) -> &'static str {
        match self {
            BoxKind::Sized { .. } => "sized",
            BoxKind::Image { .. } => "image",
            BoxKind::Text { .. } => "text",
            BoxKind::Padding { .. } => "padding",
            BoxKind::Container { .. } => "container",
            BoxKind::Stack { .. } => "stack",
            BoxKind::Row { .. } => "row",
            BoxKind::Column { .. } => "column",
        }
    }
}

/// Trusted geometry supplied by an external oracle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReferenceGeometry {
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
}

/// One element of the layout tree.
#[derive(Debug, Clone)]
pub struct BoxNode {
    pub kind: BoxKind,
    /// Own interval; tightened against the parent interval on every pre pass.
    pub constraints: BoxConstraints,
    /// Interval imposed by the parent (or the viewport, for the root).
    /// Unconstrained until a parent or the harness stores one.
    pub parent_constraints: BoxConstraints,
    /// Resolved size, fully overwritten by each pass.
    pub size: Size,
    pub x: f32,
    pub y: f32,
    /// Proportional weight for Row/Column distribution; 0 marks a fixed child.
    pub flex: f32,
    /// Collapse this subtree into one serial task during graph construction.
    pub flatten: bool,
    /// Short-circuit every layout entry point with the reference geometry.
    pub debug: bool,
    /// Unique key for this node's tasks within one graph build.
    pub task_id: u32,
    pub reference: ReferenceGeometry,
    /// Accumulated resolve time for this node; reset once per run.
    pub elapsed: Duration,
}

impl BoxNode {
    pub fn new(kind: BoxKind) -> Self {
        Self {
            kind,
            constraints: BoxConstraints::default(),
            parent_constraints: BoxConstraints::default(),
            size: Size::zero(),
            x: 0.0,
            y: 0.0,
            flex: 0.0,
            flatten: false,
            debug: false,
            task_id: 0,
            reference: ReferenceGeometry::default(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(BoxKind::Sized { width, height })
    }

    pub fn image(src: impl Into<String>) -> Self {
        Self::new(BoxKind::Image { src: src.into() })
    }

    pub fn text(content: impl Into<String>, font: FontSpec) -> Self {
        Self::new(BoxKind::Text {
            content: content.into(),
            font,
        })
    }

    pub fn padding(child: Option<NodeId>, padding: EdgeInsets) -> Self {
        Self::new(BoxKind::Padding { child, padding })
    }

    pub fn container(child: Option<NodeId>, padding: EdgeInsets, margin: EdgeInsets) -> Self {
        Self::new(BoxKind::Container {
            child,
            padding,
            margin,
            is_root: false,
        })
    }

    /// A container that expands to the parent-given minimum (the viewport).
    pub fn root_container(child: Option<NodeId>) -> Self {
        Self::new(BoxKind::Container {
            child,
            padding: EdgeInsets::zero(),
            margin: EdgeInsets::zero(),
            is_root: true,
        })
    }

    pub fn stack(children: Vec<StackChild>) -> Self {
        Self::new(BoxKind::Stack { children })
    }

    pub fn row(children: Vec<NodeId>) -> Self {
        Self::new(BoxKind::Row { children })
    }

    pub fn column(children: Vec<NodeId>) -> Self {
        Self::new(BoxKind::Column { children })
    }

    pub fn with_flex(mut self, flex: f32) -> Self {
        self.flex = flex;
        self
    }

    pub fn with_task_id(mut self, task_id: u32) -> Self {
        self.task_id = task_id;
        self
    }

    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    /// Child indices in stored order, regardless of kind.
    pub fn child_ids(&self) -> Vec<NodeId> {
        match &self.kind {
            BoxKind::Sized { .. } | BoxKind::Image { .. } | BoxKind::Text { .. } => Vec::new(),
            BoxKind::Padding { child, .. } | BoxKind::Container { child, .. } => {
                child.iter().copied().collect()
            }
            BoxKind::Stack { children } => children.iter().map(|c| c.node).collect(),
            BoxKind::Row { children } | BoxKind::Column { children } => children.clone(),
        }
    }
}

/// Interior-mutable node slot.
///
/// A node is only written by its own pre/post tasks, which the task graph
/// orders on a single path between the parent's pre and post; the runner's
/// atomic indegree handoff publishes those writes before any successor
/// starts. Serial traversal trivially satisfies the same contract.
struct NodeCell(UnsafeCell<BoxNode>);

// SAFETY: see the exclusivity contract above; the cell itself adds no
// synchronization.
unsafe impl Sync for NodeCell {}

/// The arena holding one experiment's box tree.
#[derive(Default)]
pub struct LayoutTree {
    nodes: Vec<NodeCell>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its index. Children must already be in the
    /// arena, so trees are built leaves-first and stay acyclic.
    pub fn push(&mut self, node: BoxNode) -> NodeId {
        debug_assert!(
            node.child_ids().iter().all(|c| c.0 < self.nodes.len()),
            "child indices must precede their parent in the arena"
        );
        self.nodes.push(NodeCell(UnsafeCell::new(node)));
        NodeId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Shared view of a node. Must not be held across a layout pass that
    /// mutates the same node.
    pub fn node(&self, id: NodeId) -> &BoxNode {
        // SAFETY: callers only read between passes or from a task ordered
        // after the writes they observe (see NodeCell).
        unsafe { &*self.nodes[id.0].0.get() }
    }

    /// Exclusive view for tree setup between runs.
    pub fn node_mut(&mut self, id: NodeId) -> &mut BoxNode {
        self.nodes[id.0].0.get_mut()
    }

    /// Exclusive view used by the passes. The task graph (or serial
    /// recursion) guarantees no other borrow of this node exists.
    pub(crate) fn pass_node_mut(&self, id: NodeId) -> &mut BoxNode {
        // SAFETY: pass exclusivity per NodeCell's contract.
        unsafe { &mut *self.nodes[id.0].0.get() }
    }

    /// Child indices of `id` in stored order.
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).child_ids()
    }

    /// Stores the parent-imposed interval for `id`. The caller must supply
    /// min <= max on both axes.
    pub fn set_constraints(&self, id: NodeId, interval: BoxConstraints) {
        self.pass_node_mut(id).parent_constraints = interval;
    }

    /// Assigns sequential task ids (the arena index). Call before graph
    /// construction unless ids were chosen explicitly.
    pub fn assign_task_ids(&mut self) {
        for index in 0..self.nodes.len() {
            self.node_mut(NodeId(index)).task_id = index as u32;
        }
    }

    /// Clears every node's elapsed-time accumulator. Runs once per
    /// repetition; geometry needs no such reset because it is fully
    /// recomputed.
    pub fn reset_timings(&self) {
        for index in 0..self.nodes.len() {
            self.pass_node_mut(NodeId(index)).elapsed = Duration::ZERO;
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }
}

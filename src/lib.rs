//! Parlay: a research engine for parallelizing recursive box layout.
//!
//! Layout is the classic two-phase constraint walk over a tree of boxes.
//! Parlay decomposes that walk into a task-dependency graph (two tasks per
//! node, precedence edges mirroring the tree) and runs it on a fixed-size
//! worker pool, so independent subtrees resolve concurrently. A serial
//! reference path and a gold/error validation mode keep the parallel
//! schedule honest.
//!
//! ## Crates
//!
//! - `parlay-types`: geometry primitives (sizes, insets, constraint
//!   intervals)
//! - `parlay-traits`: measurement collaborators (text metrics, image
//!   dimensions) and the shared word-wrap law
//! - `parlay-layout`: the box tree, the pre/post constraint resolver,
//!   positioning, validation, and export
//! - `parlay-executor`: task-graph construction and the worker-pool runner
//!
//! ## Example
//!
//! ```
//! use parlay::{
//!     BoxConstraints, BoxNode, GraphExecutor, LayoutEnvironment, LayoutTree, Size, TaskGraph,
//! };
//!
//! let mut tree = LayoutTree::new();
//! let a = tree.push(BoxNode::sized(0.0, 0.0).with_flex(1.0));
//! let b = tree.push(BoxNode::sized(0.0, 0.0).with_flex(1.0));
//! let row = tree.push(BoxNode::row(vec![a, b]));
//! let root = tree.push(BoxNode::root_container(Some(row)));
//! tree.assign_task_ids();
//! tree.set_constraints(root, BoxConstraints::tight(Size::new(1262.0, 684.0)));
//!
//! let graph = TaskGraph::build(&tree, root).unwrap();
//! let executor = GraphExecutor::new(4).unwrap();
//! let env = LayoutEnvironment::default();
//! let wall = executor.run(&tree, &graph, &env, 100).unwrap();
//! tree.set_position(root, 0.0, 0.0);
//!
//! assert_eq!(tree.node(root).size, Size::new(1262.0, 684.0));
//! assert_eq!(tree.node(a).size.width, 631.0);
//! println!("100 runs in {wall:?}");
//! ```

pub use parlay_types::{BoxConstraints, EdgeInsets, Point, Size};

pub use parlay_traits::{
    FixedAdvanceMeasurer, FontSpec, ImageProbe, InMemoryImageProbe, MeasureError, TextMeasurer,
    TextMetrics,
};

pub use parlay_layout::{
    BoxKind, BoxNode, FontLibrary, FsImageProbe, LayoutEnvironment, LayoutError, LayoutTree,
    MASK_HEIGHT, MASK_WIDTH, MASK_X, MASK_Y, NodeId, NodeRepr, ReferenceGeometry,
    ShapedTextMeasurer, StackChild,
};

pub use parlay_executor::{GraphError, GraphExecutor, Phase, Task, TaskGraph, TaskHandle, run_serial};

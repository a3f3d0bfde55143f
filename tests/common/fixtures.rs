//! Shared tree builders for the integration tests.

use parlay::{
    BoxConstraints, BoxNode, EdgeInsets, FontSpec, LayoutTree, NodeId, Size, StackChild,
};

/// The viewport used by the reference experiments.
pub const VIEWPORT: Size = Size {
    width: 1262.0,
    height: 684.0,
};

pub fn tight_viewport(tree: &LayoutTree, root: NodeId) {
    tree.set_constraints(root, BoxConstraints::tight(VIEWPORT));
}

/// Full geometry snapshot, arena order.
pub fn geometry(tree: &LayoutTree) -> Vec<(Size, f32, f32)> {
    tree.ids()
        .map(|id| {
            let node = tree.node(id);
            (node.size, node.x, node.y)
        })
        .collect()
}

/// A row of `count` equally flexible childless containers under the
/// viewport root.
pub fn flex_row_tree(count: usize) -> (LayoutTree, NodeId, Vec<NodeId>) {
    let mut tree = LayoutTree::new();
    let children: Vec<NodeId> = (0..count)
        .map(|_| {
            tree.push(
                BoxNode::container(None, EdgeInsets::zero(), EdgeInsets::zero()).with_flex(1.0),
            )
        })
        .collect();
    let row = tree.push(BoxNode::row(children.clone()));
    let root = tree.push(BoxNode::root_container(Some(row)));
    tree.assign_task_ids();
    tight_viewport(&tree, root);
    (tree, root, children)
}

/// The nested padding chain: root -> Padding(16) -> Padding(8) ->
/// Padding(4) -> Container -> Sized(24, 24).
pub fn nested_padding_tree() -> (LayoutTree, NodeId, [NodeId; 5]) {
    let mut tree = LayoutTree::new();
    let sized = tree.push(BoxNode::sized(24.0, 24.0));
    let container = tree.push(BoxNode::container(
        Some(sized),
        EdgeInsets::zero(),
        EdgeInsets::zero(),
    ));
    let p4 = tree.push(BoxNode::padding(Some(container), EdgeInsets::uniform(4.0)));
    let p8 = tree.push(BoxNode::padding(Some(p4), EdgeInsets::uniform(8.0)));
    let p16 = tree.push(BoxNode::padding(Some(p8), EdgeInsets::uniform(16.0)));
    let root = tree.push(BoxNode::root_container(Some(p16)));
    tree.assign_task_ids();
    tight_viewport(&tree, root);
    (tree, root, [sized, container, p4, p8, p16])
}

/// A tree exercising every node kind: a row of fixed and flex children, a
/// padded text box, a stack, and a flexible filler, in a column under the
/// viewport root.
pub fn mixed_tree() -> (LayoutTree, NodeId) {
    let mut tree = LayoutTree::new();
    let fixed = tree.push(BoxNode::sized(40.0, 20.0));
    let narrow =
        tree.push(BoxNode::container(None, EdgeInsets::zero(), EdgeInsets::zero()).with_flex(1.0));
    let wide =
        tree.push(BoxNode::container(None, EdgeInsets::zero(), EdgeInsets::zero()).with_flex(2.0));
    let row = tree.push(BoxNode::row(vec![fixed, narrow, wide]));
    tree.node_mut(row).constraints = BoxConstraints::new(0.0, VIEWPORT.width, 0.0, 60.0);

    let text = tree.push(BoxNode::text(
        "a moderately long line of placeholder text",
        FontSpec::new("any", 12.0, 1.2),
    ));
    let pad = tree.push(BoxNode::padding(Some(text), EdgeInsets::uniform(8.0)));

    let stacked = tree.push(BoxNode::sized(30.0, 30.0));
    let stack = tree.push(BoxNode::stack(vec![StackChild::new(stacked, 0.5, 0.0)]));

    let filler =
        tree.push(BoxNode::container(None, EdgeInsets::zero(), EdgeInsets::zero()).with_flex(1.0));
    let column = tree.push(BoxNode::column(vec![row, pad, stack, filler]));
    let root = tree.push(BoxNode::root_container(Some(column)));
    tree.assign_task_ids();
    tight_viewport(&tree, root);
    (tree, root)
}

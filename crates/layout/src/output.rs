//! Read-only export of resolved geometry.

use serde::{Deserialize, Serialize};

use crate::tree::{BoxKind, LayoutTree, NodeId};

/// Serializable snapshot of one node and its subtree, children in stored
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRepr {
    /// Task id rendered as `#%06x`, matching the oracle's node keys.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
    /// Error mask against the reference geometry; zero means agreement.
    pub error: u8,
    /// Accumulated resolve time in nanoseconds.
    pub time_ns: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<NodeRepr>,
}

impl LayoutTree {
    /// Builds the export representation rooted at `id`.
    pub fn to_repr(&self, id: NodeId) -> NodeRepr {
        let node = self.node(id);
        NodeRepr {
            id: format!("#{:06x}", node.task_id),
            kind: node.kind.name().to_string(),
            width: node.size.width,
            height: node.size.height,
            x: node.x,
            y: node.y,
            error: node.error_mask(),
            time_ns: node.elapsed.as_nanos() as u64,
            content: match &node.kind {
                BoxKind::Text { content, .. } => Some(content.clone()),
                _ => None,
            },
            children: node
                .child_ids()
                .into_iter()
                .map(|child| self.to_repr(child))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::LayoutEnvironment;
    use crate::tree::BoxNode;
    use parlay_types::{BoxConstraints, EdgeInsets, Size};

    #[test]
    fn test_repr_preserves_structure_and_order() {
        let env = LayoutEnvironment::default();
        let mut tree = LayoutTree::new();
        let a = tree.push(BoxNode::sized(0.0, 0.0).with_flex(1.0));
        let b = tree.push(BoxNode::sized(0.0, 0.0).with_flex(2.0));
        let row = tree.push(BoxNode::row(vec![a, b]));
        tree.assign_task_ids();
        tree.set_constraints(row, BoxConstraints::new(0.0, 300.0, 0.0, 30.0));
        tree.pre_layout(row, true, &env).unwrap();
        tree.set_position(row, 0.0, 0.0);

        let repr = tree.to_repr(row);
        assert_eq!(repr.kind, "row");
        assert_eq!(repr.id, "#000002");
        assert_eq!(repr.children.len(), 2);
        assert_eq!(repr.children[0].id, "#000000");
        assert_eq!(repr.children[0].width, 100.0);
        assert_eq!(repr.children[1].width, 200.0);
        assert_eq!(repr.children[1].x, 100.0);
    }

    #[test]
    fn test_repr_serializes_to_json() {
        let env = LayoutEnvironment::default();
        let mut tree = LayoutTree::new();
        let inner = tree.push(BoxNode::sized(24.0, 24.0));
        let pad = tree.push(BoxNode::padding(Some(inner), EdgeInsets::uniform(8.0)));
        tree.assign_task_ids();
        tree.set_constraints(pad, BoxConstraints::loose(Size::new(640.0, 480.0)));
        tree.pre_layout(pad, true, &env).unwrap();
        tree.set_position(pad, 0.0, 0.0);

        let json = serde_json::to_value(tree.to_repr(pad)).unwrap();
        assert_eq!(json["type"], "padding");
        assert_eq!(json["width"], 40.0);
        assert_eq!(json["children"][0]["width"], 24.0);
        // Leaves carry no children key at all.
        assert!(json["children"][0].get("children").is_none());
    }
}

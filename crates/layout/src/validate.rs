//! Gold/error validation.
//!
//! Nodes may carry trusted reference geometry from an external oracle. With a
//! node's debug flag set, every layout entry point copies that geometry
//! verbatim instead of computing; the error mask then reports per-field
//! disagreement between computed and reference values. Mismatches are test
//! signals, never errors.

use crate::tree::{BoxNode, LayoutTree, NodeId, ReferenceGeometry};

pub const MASK_X: u8 = 1 << 0;
pub const MASK_Y: u8 = 1 << 1;
pub const MASK_HEIGHT: u8 = 1 << 2;
pub const MASK_WIDTH: u8 = 1 << 3;

impl BoxNode {
    /// Overwrites computed geometry with the reference values.
    pub fn apply_reference(&mut self) {
        self.size.width = self.reference.width;
        self.size.height = self.reference.height;
        self.x = self.reference.x;
        self.y = self.reference.y;
    }

    /// Bitwise comparison of computed against reference geometry. Exact
    /// equality per field; agreement is all-zeros.
    pub fn error_mask(&self) -> u8 {
        let mut mask = 0;
        if self.x != self.reference.x {
            mask |= MASK_X;
        }
        if self.y != self.reference.y {
            mask |= MASK_Y;
        }
        if self.size.height != self.reference.height {
            mask |= MASK_HEIGHT;
        }
        if self.size.width != self.reference.width {
            mask |= MASK_WIDTH;
        }
        mask
    }
}

impl LayoutTree {
    /// Snapshots every node's computed geometry into its reference fields.
    /// Turns a trusted run into the oracle for subsequent runs.
    pub fn capture_reference(&mut self) {
        for index in 0..self.len() {
            let node = self.node_mut(NodeId(index));
            node.reference = ReferenceGeometry {
                width: node.size.width,
                height: node.size.height,
                x: node.x,
                y: node.y,
            };
        }
    }

    /// Sets or clears the debug flag on every node.
    pub fn set_debug_all(&mut self, debug: bool) {
        for index in 0..self.len() {
            self.node_mut(NodeId(index)).debug = debug;
        }
    }

    /// OR of every node's error mask; zero means full agreement.
    pub fn total_error_mask(&self) -> u8 {
        self.ids().fold(0, |mask, id| mask | self.node(id).error_mask())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::BoxNode;
    use parlay_types::Size;

    fn node_with_geometry(size: Size, x: f32, y: f32) -> BoxNode {
        let mut node = BoxNode::sized(0.0, 0.0);
        node.size = size;
        node.x = x;
        node.y = y;
        node
    }

    #[test]
    fn test_error_mask_zero_on_agreement() {
        let mut node = node_with_geometry(Size::new(10.0, 20.0), 3.0, 4.0);
        node.reference = ReferenceGeometry {
            width: 10.0,
            height: 20.0,
            x: 3.0,
            y: 4.0,
        };
        assert_eq!(node.error_mask(), 0);
    }

    #[test]
    fn test_error_mask_flags_each_field() {
        let mut node = node_with_geometry(Size::new(10.0, 20.0), 3.0, 4.0);
        node.reference = ReferenceGeometry {
            width: 11.0,
            height: 21.0,
            x: 3.5,
            y: 4.5,
        };
        assert_eq!(
            node.error_mask(),
            MASK_X | MASK_Y | MASK_HEIGHT | MASK_WIDTH
        );

        node.reference.x = 3.0;
        node.reference.height = 20.0;
        assert_eq!(node.error_mask(), MASK_Y | MASK_WIDTH);
    }

    #[test]
    fn test_apply_reference_copies_verbatim() {
        let mut node = node_with_geometry(Size::new(1.0, 2.0), 3.0, 4.0);
        node.reference = ReferenceGeometry {
            width: 100.0,
            height: 200.0,
            x: 30.0,
            y: 40.0,
        };
        node.apply_reference();

        assert_eq!(node.size, Size::new(100.0, 200.0));
        assert_eq!((node.x, node.y), (30.0, 40.0));
        assert_eq!(node.error_mask(), 0);
    }

    #[test]
    fn test_capture_reference_then_total_mask_is_zero() {
        let mut tree = LayoutTree::new();
        let a = tree.push(node_with_geometry(Size::new(5.0, 6.0), 1.0, 2.0));
        tree.capture_reference();

        assert_eq!(tree.total_error_mask(), 0);

        tree.node_mut(a).size.width = 7.0;
        assert_eq!(tree.total_error_mask(), MASK_WIDTH);
    }
}

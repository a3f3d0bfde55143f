use parlay_traits::MeasureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(
        "Flex distribution in node {node:?} ran out of extent: {available:.2} left after fixed children."
    )]
    ConstraintInfeasible { node: NodeId, available: f32 },
    #[error("Node {node:?} entered its flex phase with zero total flex weight.")]
    NoFlexibleChildren { node: NodeId },
    #[error(transparent)]
    Measure(#[from] MeasureError),
}

pub mod env;
pub mod fonts;
pub mod images;
pub mod output;
mod passes;
pub mod text;
pub mod tree;
pub mod validate;

pub use env::LayoutEnvironment;
pub use fonts::{FontData, FontInstance, FontLibrary};
pub use images::FsImageProbe;
pub use output::NodeRepr;
pub use text::ShapedTextMeasurer;
pub use tree::{BoxKind, BoxNode, LayoutTree, NodeId, ReferenceGeometry, StackChild};
pub use validate::{MASK_HEIGHT, MASK_WIDTH, MASK_X, MASK_Y};

pub use parlay_types::geometry::{BoxConstraints, EdgeInsets, Point, Size};

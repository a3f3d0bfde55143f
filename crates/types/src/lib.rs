pub mod geometry;

pub use geometry::{BoxConstraints, EdgeInsets, Point, Size};

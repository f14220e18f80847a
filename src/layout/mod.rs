pub mod bounds;
pub mod geometry;
pub mod matrix;

pub use bounds::{GlobalBounds, compute_global_bounds};
pub use geometry::{GridGeometry, PlotTransform, Rect, SlotContent};
pub use matrix::{Cell, LayoutMatrix, build_matrix};

#[cfg(test)]
#[path = "../../tests/src_inline/layout/tests.rs"]
mod tests;

//! Voronoi diagrams of planar point sets.
//!
//! Cells are built with Fortune's sweep line into a doubly-connected edge
//! list, then clipped to a rectangle. [`operations::creation::MakeVoronoi`]
//! runs the whole pipeline; [`sweep::Fortune`] and
//! [`operations::ClipDiagram`] expose the individual passes.

pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod sweep;
pub mod topology;

#[cfg(test)]
mod test_support;

pub use error::{Result, VoronoiError};

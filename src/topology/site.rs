use crate::math::Point2;

use super::face::FaceId;

/// An input point of the diagram.
///
/// Sites are created once, in input order, and never change.
#[derive(Debug, Clone)]
pub struct Site {
    /// Position of the site in the input sequence.
    pub index: usize,
    /// The input point.
    pub point: Point2,
    /// The Voronoi cell of this site.
    pub face: FaceId,
}

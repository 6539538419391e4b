use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a diagram.
    pub struct VertexId;
}

/// Data associated with a diagram vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The position of the vertex.
    pub point: Point2,
}

impl VertexData {
    /// Creates a new vertex at the given point.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self { point }
    }
}

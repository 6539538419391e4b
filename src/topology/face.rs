use super::half_edge::HalfEdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a face in a diagram.
    pub struct FaceId;
}

/// Data associated with a Voronoi cell.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Index of the site owning this cell.
    pub site: usize,
    /// Any half-edge of the boundary cycle, if the cell has one.
    pub boundary: Option<HalfEdgeId>,
}

impl FaceData {
    /// Creates a cell for `site` with no boundary yet.
    #[must_use]
    pub fn new(site: usize) -> Self {
        Self {
            site,
            boundary: None,
        }
    }
}
